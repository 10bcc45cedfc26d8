//! Map type
use super::*;
use crate::diag::Diagnostics;
use crate::error::{Error, Kind};
use crate::parse::measure::{parse_measure, Unit};
use crate::parse::string::parse_string;
use crate::parse::CommandParameter;
use crate::token::{Token, TokenList};
use quill_stdext::algorithms::spellcheck;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Aliases can point at other aliases, up to this many times.
pub const MAX_ALIAS_DEPTH: usize = 8;

/// Map is the parse-time registry of commands.
///
/// The keys are command roots and the values are [Descriptor]s.
/// The map is the sole owner of its descriptors: an alias refers to its canonical
///     command by root and the canonical command is looked up when the alias is used.
///
/// Roots that contain a `|` implicitly register their family prefix,
///     so that compound commands like `[font|size:12pt|face:Arial]` can be parsed.
#[derive(Debug, Default, Clone)]
pub struct Map {
    descriptors: HashMap<String, Descriptor>,
    families: HashSet<String>,
}

/// Error returned when a descriptor cannot be added to a [Map].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRoot {
    pub root: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid command root `{}`: {}", self.root, self.reason)
    }
}

impl std::error::Error for InvalidRoot {}

/// Error returned when a command table entry cannot be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAttributes {
    pub root: String,
    pub attributes: String,
    pub reason: String,
}

impl fmt::Display for InvalidAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid command table entry `{} = {}`: {}",
            self.root, self.attributes, self.reason
        )
    }
}

impl std::error::Error for InvalidAttributes {}

impl Map {
    /// Adds a command to the map.
    pub fn insert(&mut self, descriptor: Descriptor) -> Result<(), InvalidRoot> {
        let root = descriptor.root();
        let invalid = |reason| {
            Err(InvalidRoot {
                root: root.to_string(),
                reason,
            })
        };
        if !root.starts_with('[') || root.chars().count() < 3 {
            return invalid("a root starts with `[` and has a name");
        }
        if root.chars().any(char::is_whitespace) {
            return invalid("a root cannot contain whitespace");
        }
        let family = root.find('|').map(|i| &root[..=i]);
        match descriptor.command() {
            Command::NoParam | Command::Symbol => {
                if !root.ends_with(']') {
                    return invalid("the root of a command without a parameter ends with `]`");
                }
                if family.is_some() {
                    return invalid("the members of a family take a parameter");
                }
            }
            Command::ValueParam | Command::StringParam => {
                if !root.ends_with(':') {
                    return invalid("the root of a command with a parameter ends with `:`");
                }
            }
            Command::Replacement {
                replacement_root, ..
            } => {
                if !(root.ends_with(':') || root.ends_with(']')) {
                    return invalid("the root of an alias ends with `:` or `]`");
                }
                if root.chars().last() != replacement_root.chars().last() {
                    return invalid("an alias and its canonical command must end the same way");
                }
                if family.is_some() {
                    return invalid("an alias cannot be a member of a family");
                }
            }
        }
        if family == Some("[|") {
            return invalid("a family prefix has a name");
        }
        if self.descriptors.contains_key(root) {
            return invalid("the root is already registered");
        }
        if let Some(family) = family {
            self.families.insert(family.to_string());
        }
        self.descriptors.insert(root.to_string(), descriptor);
        Ok(())
    }

    /// Adds a family of commands.
    ///
    /// The roots of the members are relative to the family prefix.
    ///
    /// ```
    /// # use quill::command::{Descriptor, Map};
    /// let mut map = Map::default();
    /// map.insert_family("[font|", vec![
    ///     Descriptor::new_value("size:"),
    ///     Descriptor::new_string("face:"),
    /// ]).unwrap();
    /// assert!(map.get("[font|size:").is_some());
    /// assert_eq!(map.family_of("[font|face:"), Some("[font|"));
    /// ```
    pub fn insert_family<I>(&mut self, prefix: &str, members: I) -> Result<(), InvalidRoot>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        if !prefix.starts_with('[') || !prefix.ends_with('|') || prefix.matches('|').count() != 1
        {
            return Err(InvalidRoot {
                root: prefix.to_string(),
                reason: "a family prefix starts with `[` and ends with its only `|`",
            });
        }
        for mut member in members {
            member.set_root(format!["{prefix}{}", member.root()]);
            self.insert(member)?;
        }
        Ok(())
    }

    /// Adds an alias.
    ///
    /// The parameter type of the alias is taken from its canonical command if it is
    ///     already registered.
    pub fn insert_alias(&mut self, root: &str, replacement_root: &str) -> Result<(), InvalidRoot> {
        let param_type = match self.get(replacement_root) {
            Some(canonical) => canonical.param_type(),
            None if replacement_root.ends_with(':') => ParamType::String,
            None => ParamType::None,
        };
        self.insert(Descriptor::new_alias(root, replacement_root, param_type))
    }

    /// Adds the commands in a command table.
    ///
    /// See [parse_command_table] for the format. Returns the number of commands added.
    pub fn insert_from_table(&mut self, text: &str) -> Result<usize, InvalidAttributes> {
        let entries = parse_command_table(text)?;
        let n = entries.len();
        for (root, attributes) in entries {
            let descriptor = descriptor_from_attributes(&root, &attributes)?;
            self.insert(descriptor).map_err(|err| InvalidAttributes {
                root,
                attributes,
                reason: err.reason.to_string(),
            })?;
        }
        Ok(n)
    }

    pub fn get(&self, root: &str) -> Option<&Descriptor> {
        self.descriptors.get(root)
    }

    pub fn contains_family(&self, prefix: &str) -> bool {
        self.families.contains(prefix)
    }

    /// Returns the family prefix of a member root.
    pub fn family_of(&self, root: &str) -> Option<&str> {
        let i = root.find('|')?;
        self.families.get(&root[..=i]).map(String::as_str)
    }

    /// Returns the registered root of the command starting at `pos`.
    ///
    /// For a compound command this is the family prefix.
    pub fn root_at(&self, chars: &[char], pos: usize) -> Option<&str> {
        if let Some(prefix) = self.family_prefix_at(chars, pos) {
            return Some(prefix);
        }
        let end = candidate_end(chars, pos)?;
        let candidate: String = chars[pos..end].iter().collect();
        self.descriptors
            .get_key_value(&candidate)
            .map(|(k, _)| k.as_str())
    }

    /// Returns whether the command or family with the root is honored inside code sections.
    ///
    /// A family is allowed only if all of its members are.
    pub fn is_allowed_in_code(&self, root: &str) -> bool {
        if let Some(descriptor) = self.descriptors.get(root) {
            return descriptor.allowed_in_code();
        }
        if self.families.contains(root) {
            return self
                .descriptors
                .values()
                .filter(|d| d.root().starts_with(root))
                .all(Descriptor::allowed_in_code);
        }
        false
    }

    /// Returns the registered roots that are close to the provided root,
    ///     closest first.
    pub fn close_roots(&self, root: &str) -> Vec<String> {
        spellcheck::find_close_words(self.descriptors.keys().map(String::as_str), root, 2)
            .into_iter()
            .map(|suggestion| suggestion.word)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.values()
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Processes the command at the context's start position.
    ///
    /// On success the tokens of the command are appended to `out` and the number of
    ///     characters of the command is returned.
    /// On failure nothing is appended;
    ///     the caller is responsible for recovering, normally by emitting the command as text.
    ///
    /// Problems that don't stop the command from being processed, like an alias that
    ///     points at an unknown command, are recorded in the diagnostics.
    pub fn process(
        &self,
        ctx: &ParseContext,
        out: &mut TokenList,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize, Error> {
        self.process_with_depth(ctx, out, diagnostics, 0)
    }

    fn process_with_depth(
        &self,
        ctx: &ParseContext,
        out: &mut TokenList,
        diagnostics: &mut Diagnostics,
        depth: usize,
    ) -> Result<usize, Error> {
        let (chars, pos) = (ctx.chars, ctx.start);
        if let Some(prefix) = self.family_prefix_at(chars, pos) {
            return family::process(self, ctx, prefix, out);
        }
        let end = match candidate_end(chars, pos) {
            None => {
                return Err(Error::new(Kind::InvalidCommand, ctx.source, ctx.text(1))
                    .with_note("the command has no root"))
            }
            Some(end) => end,
        };
        let root: String = chars[pos..end].iter().collect();
        let descriptor = match self.descriptors.get(&root) {
            None => {
                return Err(Error::new(Kind::InvalidCommand, ctx.source, root)
                    .with_note("the root is not a registered command"))
            }
            Some(descriptor) => descriptor,
        };
        let root_len = end - pos;
        match descriptor.command() {
            Command::NoParam => {
                out.push(Token::new_command(
                    ctx.source,
                    root.clone(),
                    root,
                    CommandParameter::None,
                ));
                Ok(root_len)
            }
            Command::Symbol => {
                out.push(Token::new_symbol(ctx.source, root));
                Ok(root_len)
            }
            Command::ValueParam | Command::StringParam => {
                let (parameter, n) = parse_parameter(descriptor, ctx, end, &[']'])?;
                let consumed = root_len + n + 1;
                out.push(Token::new_command(
                    ctx.source,
                    root,
                    ctx.text(consumed),
                    parameter,
                ));
                Ok(consumed)
            }
            Command::Replacement {
                replacement_root, ..
            } => self.resolve_alias(ctx, &root, replacement_root, out, diagnostics, depth),
        }
    }

    fn resolve_alias(
        &self,
        ctx: &ParseContext,
        alias_root: &str,
        replacement_root: &str,
        out: &mut TokenList,
        diagnostics: &mut Diagnostics,
        depth: usize,
    ) -> Result<usize, Error> {
        let alias_len = alias_root.chars().count();
        if depth >= MAX_ALIAS_DEPTH || !self.descriptors.contains_key(replacement_root) {
            diagnostics.warn(
                Error::new(Kind::UnresolvedReplacementRoot, ctx.source, alias_root)
                    .with_note(format!["`{alias_root}` is an alias for `{replacement_root}`"])
                    .with_columns(ctx.start..ctx.start + alias_len),
            );
            out.push(Token::new_text(ctx.source, alias_root));
            return Ok(alias_len);
        }
        let canonical: Vec<char> = replacement_root.chars().collect();
        let mut rewritten = Vec::with_capacity(ctx.chars.len() + canonical.len());
        rewritten.extend_from_slice(&ctx.chars[..ctx.start]);
        rewritten.extend_from_slice(&canonical);
        rewritten.extend_from_slice(&ctx.chars[ctx.start + alias_len..]);
        let canonical_ctx = ctx.with_chars(&rewritten);
        let mut produced = TokenList::default();
        let canonical_consumed =
            self.process_with_depth(&canonical_ctx, &mut produced, diagnostics, depth + 1)?;
        let consumed = canonical_consumed + alias_len - canonical.len();
        let original = ctx.text(consumed);
        if let Some(first) = produced.get_mut(0) {
            first.restore_original_spelling(original.clone());
        }
        if ctx.options.emit_replaced_commands {
            out.push(Token::new_replaced_command(ctx.source, alias_root, original));
        }
        out.extend(produced);
        Ok(consumed)
    }

    fn family_prefix_at(&self, chars: &[char], pos: usize) -> Option<&str> {
        if chars.get(pos) != Some(&'[') || self.families.is_empty() {
            return None;
        }
        let mut i = pos + 1;
        while let Some(&c) = chars.get(i) {
            match c {
                '|' => {
                    let prefix: String = chars[pos..=i].iter().collect();
                    return self.families.get(&prefix).map(String::as_str);
                }
                ':' | ']' | '[' => return None,
                c if c.is_whitespace() => return None,
                _ => i += 1,
            }
        }
        None
    }
}

/// Returns the index just past the candidate root starting at `pos`.
///
/// The candidate runs up to and including the first `:` or `]`.
fn candidate_end(chars: &[char], pos: usize) -> Option<usize> {
    let mut i = pos + 1;
    while let Some(&c) = chars.get(i) {
        match c {
            ':' | ']' => return Some(i + 1),
            '[' => return None,
            c if c.is_whitespace() => return None,
            _ => i += 1,
        }
    }
    None
}

/// Parses the parameter of a value or string command starting at `pos`.
///
/// The parameter must be followed by one of the terminators, which is not consumed.
pub(crate) fn parse_parameter(
    descriptor: &Descriptor,
    ctx: &ParseContext,
    pos: usize,
    terminators: &[char],
) -> Result<(CommandParameter, usize), Error> {
    let invalid = |note: String| {
        Error::new(
            Kind::InvalidCommandParameter,
            ctx.source,
            descriptor.root(),
        )
        .with_note(note)
    };
    match descriptor.command() {
        Command::ValueParam => {
            let (measure, n) = match parse_measure(ctx.chars, pos) {
                None => return Err(invalid("expected a number".into())),
                Some(t) => t,
            };
            if measure.unit == Unit::Error {
                return Err(invalid(
                    "unknown unit; the units are pt, in, cm, li and px".into(),
                ));
            }
            match ctx.chars.get(pos + n) {
                Some(c) if terminators.contains(c) => Ok((CommandParameter::Measure(measure), n)),
                _ => Err(invalid("unexpected characters after the value".into())),
            }
        }
        Command::StringParam => match parse_string(ctx.chars, pos, terminators) {
            Ok((s, n)) => Ok((CommandParameter::String(s), n)),
            Err(err) => Err(invalid(err.to_string())),
        },
        _ => Ok((CommandParameter::None, 0)),
    }
}

/// Reads a command table.
///
/// Each non-empty line that doesn't start with `#` has the form `root = attributes`.
/// The attributes are a parameter type character (`0` none, `v` value, `s` string, `y` symbol),
///     an in-code flag (`y` or `n`), and for aliases a space and the canonical root.
///
/// ```
/// # use quill::command::map::parse_command_table;
/// let table = "# shorthands\n[ff: = sn [font|face:\n[b] = 0n\n";
/// assert_eq!(
///     parse_command_table(table).unwrap(),
///     vec![
///         ("[ff:".to_string(), "sn [font|face:".to_string()),
///         ("[b]".to_string(), "0n".to_string()),
///     ]
/// );
/// ```
pub fn parse_command_table(text: &str) -> Result<Vec<(String, String)>, InvalidAttributes> {
    let mut entries = vec![];
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            None => {
                return Err(InvalidAttributes {
                    root: line.to_string(),
                    attributes: String::new(),
                    reason: "expected `root = attributes`".into(),
                })
            }
            Some((root, attributes)) => {
                entries.push((root.trim().to_string(), attributes.trim().to_string()));
            }
        }
    }
    Ok(entries)
}

/// Builds a descriptor from a command table entry.
pub fn descriptor_from_attributes(
    root: &str,
    attributes: &str,
) -> Result<Descriptor, InvalidAttributes> {
    let invalid = |reason: &str| InvalidAttributes {
        root: root.to_string(),
        attributes: attributes.to_string(),
        reason: reason.to_string(),
    };
    let mut chars = attributes.chars();
    let param_type = chars
        .next()
        .and_then(ParamType::from_char)
        .ok_or_else(|| invalid("the parameter type must be one of `0`, `v`, `s` or `y`"))?;
    let allowed_in_code = match chars.next() {
        Some('y') => true,
        Some('n') => false,
        _ => return Err(invalid("the in-code flag must be `y` or `n`")),
    };
    let rest = chars.as_str();
    let descriptor = if rest.is_empty() {
        match param_type {
            ParamType::None => Descriptor::new_no_param(root),
            ParamType::Value => Descriptor::new_value(root),
            ParamType::String => Descriptor::new_string(root),
            ParamType::Symbol => Descriptor::new_symbol(root),
        }
    } else {
        let replacement_root = match rest.strip_prefix(' ') {
            Some(r) if !r.trim().is_empty() => r.trim(),
            _ => return Err(invalid("expected a space and then the replacement root")),
        };
        Descriptor::new_alias(root, replacement_root, param_type)
    };
    Ok(descriptor.with_allowed_in_code(allowed_in_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::parse::Measure;
    use crate::source::Source;
    use crate::token::TokenType;

    fn font_map() -> Map {
        let mut map = Map::default();
        map.insert_family(
            "[font|",
            vec![Descriptor::new_value("size:"), Descriptor::new_string("face:")],
        )
        .unwrap();
        map.insert(Descriptor::new_no_param("[b]")).unwrap();
        map.insert(Descriptor::new_symbol("[copyright]")).unwrap();
        map.insert(Descriptor::new_value("[leading:")).unwrap();
        map.insert_alias("[ff:", "[font|face:").unwrap();
        map.insert_alias("[fsize:", "[font|size:").unwrap();
        map
    }

    struct Run {
        result: Result<usize, Error>,
        tokens: TokenList,
        diagnostics: Diagnostics,
    }

    fn run(map: &Map, options: &Options, input: &str, start: usize) -> Run {
        let chars: Vec<char> = input.chars().collect();
        let ctx = ParseContext::new(Source::new(0, 1), &chars, start, map, options);
        let mut tokens = TokenList::default();
        let mut diagnostics = Diagnostics::default();
        let result = map.process(&ctx, &mut tokens, &mut diagnostics);
        Run {
            result,
            tokens,
            diagnostics,
        }
    }

    #[test]
    fn no_param_command() {
        let run = run(&font_map(), &Options::default(), "[b]bold", 0);
        assert_eq!(run.result, Ok(3));
        assert_eq!(run.tokens.len(), 1);
        assert_eq!(run.tokens.as_slice()[0].root(), "[b]");
    }

    #[test]
    fn symbol_command() {
        let run = run(&font_map(), &Options::default(), "(c) [copyright] 2024", 4);
        assert_eq!(run.result, Ok(11));
        assert_eq!(run.tokens.as_slice()[0].token_type(), TokenType::Symbol);
    }

    #[test]
    fn value_command() {
        let run = run(&font_map(), &Options::default(), "[leading:14pt] x", 0);
        assert_eq!(run.result, Ok(14));
        let token = &run.tokens.as_slice()[0];
        assert_eq!(token.content(), "[leading:14pt]");
        assert_eq!(
            token.parameter().measure(),
            Some(Measure::new(14.0, Unit::Point))
        );
    }

    #[test]
    fn unknown_root() {
        let run = run(&font_map(), &Options::default(), "[bogus:] x", 0);
        let err = run.result.unwrap_err();
        assert_eq!(err.kind, Kind::InvalidCommand);
        assert_eq!(err.detail, "[bogus:");
        assert!(run.tokens.is_empty());
    }

    #[test]
    fn unclosed_root() {
        let run = run(&font_map(), &Options::default(), "[b and more", 0);
        assert_eq!(run.result.unwrap_err().kind, Kind::InvalidCommand);
    }

    #[test]
    fn bad_unit() {
        let run = run(&font_map(), &Options::default(), "[leading:12qq]", 0);
        assert_eq!(run.result.unwrap_err().kind, Kind::InvalidCommandParameter);
    }

    #[test]
    fn missing_value() {
        let run = run(&font_map(), &Options::default(), "[leading:]", 0);
        assert_eq!(run.result.unwrap_err().kind, Kind::InvalidCommandParameter);
    }

    #[test]
    fn alias_consumed_count_matches_original_text() {
        let run = run(&font_map(), &Options::default(), "12345[ff:Arial]678", 5);
        assert_eq!(run.result, Ok("[ff:Arial]".len()));
        assert_eq!(run.tokens.len(), 1);
        let token = &run.tokens.as_slice()[0];
        assert_eq!(token.root(), "[font|face:");
        assert_eq!(token.content(), "[ff:Arial]");
        assert_eq!(token.parameter().string(), Some("Arial"));
    }

    #[test]
    fn alias_to_direct_command() {
        let mut map = font_map();
        map.insert_alias("[lead:", "[leading:").unwrap();
        let run = run(&map, &Options::default(), "[lead:2li]", 0);
        assert_eq!(run.result, Ok(10));
        assert_eq!(run.tokens.as_slice()[0].root(), "[leading:");
        assert_eq!(
            map.get("[lead:").map(Descriptor::param_type),
            Some(ParamType::Value)
        );
    }

    #[test]
    fn alias_emits_replaced_command_when_requested() {
        let options = Options {
            emit_replaced_commands: true,
            ..Default::default()
        };
        let run = run(&font_map(), &options, "[fsize:10pt]", 0);
        assert_eq!(run.result, Ok(12));
        let types: Vec<TokenType> = run.tokens.iter().map(Token::token_type).collect();
        assert_eq!(types, vec![TokenType::ReplacedCommand, TokenType::Command]);
        assert_eq!(run.tokens.as_slice()[0].content(), "[fsize:10pt]");
        assert_eq!(run.tokens.as_slice()[0].root(), "[fsize:");
    }

    #[test]
    fn alias_with_unknown_target() {
        let mut map = Map::default();
        map.insert_alias("[ff:", "[font|face:").unwrap();
        let run = run(&map, &Options::default(), "[ff:Arial]", 0);
        assert_eq!(run.result, Ok(4));
        assert_eq!(run.tokens.as_slice(), &[Token::new_text(Source::new(0, 1), "[ff:")]);
        assert_eq!(
            run.diagnostics.warnings()[0].kind,
            Kind::UnresolvedReplacementRoot
        );
    }

    #[test]
    fn alias_cycle_terminates() {
        let mut map = Map::default();
        map.insert_alias("[a:", "[b:").unwrap();
        map.insert_alias("[b:", "[a:").unwrap();
        let run = run(&map, &Options::default(), "[a:x]", 0);
        assert_eq!(run.result, Ok(3));
        assert_eq!(run.tokens.as_slice()[0].content(), "[a:");
        assert_eq!(run.diagnostics.warnings().len(), 1);
    }

    #[test]
    fn alias_into_compound_command() {
        let run = run(&font_map(), &Options::default(), "[ff:Arial|size:9pt]", 0);
        assert_eq!(run.result, Ok(19));
        let types: Vec<TokenType> = run.tokens.iter().map(Token::token_type).collect();
        assert_eq!(
            types,
            vec![
                TokenType::CompoundCommand,
                TokenType::Command,
                TokenType::Command,
                TokenType::CompoundCommandEnd
            ]
        );
        assert_eq!(run.tokens.as_slice()[0].content(), "[ff:Arial|size:9pt]");
    }

    macro_rules! invalid_root_tests {
        ( $( ($name: ident, $descriptor: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let mut map = font_map();
                    assert!(map.insert($descriptor).is_err());
                }
            )+
        };
    }

    invalid_root_tests!(
        (no_opening_bracket, Descriptor::new_no_param("b]")),
        (no_name, Descriptor::new_no_param("[]")),
        (no_param_ends_with_colon, Descriptor::new_no_param("[b:")),
        (value_ends_with_bracket, Descriptor::new_value("[leading]")),
        (string_with_whitespace, Descriptor::new_string("[a b:")),
        (duplicate, Descriptor::new_no_param("[b]")),
        (family_symbol, Descriptor::new_symbol("[font|bold]")),
        (
            alias_ending_mismatch,
            Descriptor::new_alias("[x]", "[font|face:", ParamType::String)
        ),
        (
            alias_in_family,
            Descriptor::new_alias("[font|f:", "[font|face:", ParamType::String)
        ),
    );

    #[test]
    fn invalid_family_prefix() {
        let mut map = Map::default();
        assert!(map.insert_family("[font", vec![]).is_err());
        assert!(map.insert_family("[a|b|", vec![]).is_err());
    }

    #[test]
    fn root_at() {
        let map = font_map();
        let chars: Vec<char> = "[font|size:1pt] [leading:1pt] [nope:]".chars().collect();
        assert_eq!(map.root_at(&chars, 0), Some("[font|"));
        assert_eq!(map.root_at(&chars, 16), Some("[leading:"));
        assert_eq!(map.root_at(&chars, 30), None);
    }

    #[test]
    fn allowed_in_code() {
        let mut map = Map::default();
        map.insert(Descriptor::new_symbol("[bullet]").with_allowed_in_code(true))
            .unwrap();
        map.insert(Descriptor::new_no_param("[b]")).unwrap();
        map.insert_family(
            "[font|",
            vec![
                Descriptor::new_value("size:").with_allowed_in_code(true),
                Descriptor::new_string("face:"),
            ],
        )
        .unwrap();
        assert!(map.is_allowed_in_code("[bullet]"));
        assert!(!map.is_allowed_in_code("[b]"));
        assert!(map.is_allowed_in_code("[font|size:"));
        assert!(!map.is_allowed_in_code("[font|"));
        assert!(!map.is_allowed_in_code("[unknown]"));
    }

    #[test]
    fn close_roots() {
        let map = font_map();
        assert_eq!(map.close_roots("[leadin:"), vec!["[leading:".to_string()]);
        assert!(map.close_roots("[zzzzzzzz]").is_empty());
    }

    #[test]
    fn command_table() {
        let mut map = Map::default();
        let table = "
            # base commands
            [font|face: = sn
            [font|size: = vy
            [copyright] = yy
            [ff: = sn [font|face:
        ";
        assert_eq!(map.insert_from_table(table), Ok(4));
        assert_eq!(map.get("[copyright]").map(Descriptor::command), Some(&Command::Symbol));
        assert!(map.is_allowed_in_code("[font|size:"));
        assert!(map.contains_family("[font|"));
        assert_eq!(
            map.get("[ff:").map(Descriptor::command),
            Some(&Command::Replacement {
                replacement_root: "[font|face:".into(),
                param_type: ParamType::String
            })
        );
    }

    macro_rules! invalid_table_tests {
        ( $( ($name: ident, $table: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let mut map = Map::default();
                    assert!(map.insert_from_table($table).is_err());
                }
            )+
        };
    }

    invalid_table_tests!(
        (table_missing_equals, "[b] 0n"),
        (table_bad_param_type, "[b] = qn"),
        (table_bad_in_code_flag, "[b] = 0x"),
        (table_missing_flag, "[b] = 0"),
        (table_alias_without_space, "[ff: = sn[font|face:"),
        (table_root_mismatch, "[b] = vn"),
    );
}
