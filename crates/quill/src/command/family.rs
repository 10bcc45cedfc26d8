//! Compound commands.
//!
//! A compound command sets several attributes of one family at once:
//!
//! ```text
//! [font|size:12pt|face:Arial]
//! ```
//!
//! Each `name:value` segment is matched against the member of the family whose root is
//!     the family prefix followed by `name:`, here `[font|size:` and `[font|face:`.
//! Segments are separated by `|` and the command ends with `]`.
//!
//! A compound command with more than one segment produces a
//!     [CompoundCommand](crate::token::TokenType::CompoundCommand) token holding the whole
//!     command text, one command token per segment, and a
//!     [CompoundCommandEnd](crate::token::TokenType::CompoundCommandEnd) token.
//! A compound command with one segment, like `[font|size:12pt]`, is an ordinary command
//!     and produces a single command token.
//!
//! If any segment fails to parse the whole command fails and no tokens are produced.

use super::map::parse_parameter;
use super::*;
use crate::error::{Error, Kind};
use crate::token::{Token, TokenList};

/// Processes the compound command of the family with the prefix at the context's start position.
pub(crate) fn process(
    map: &Map,
    ctx: &ParseContext,
    prefix: &str,
    out: &mut TokenList,
) -> Result<usize, Error> {
    let chars = ctx.chars;
    let mut p = ctx.start + prefix.chars().count();
    let mut segments: Vec<Token> = vec![];
    let end = loop {
        let name_end = segment_name_end(chars, p).ok_or_else(|| {
            Error::new(Kind::InvalidCommand, ctx.source, prefix)
                .with_note("expected an attribute like `name:value`")
        })?;
        let root = format!["{prefix}{}", chars[p..name_end].iter().collect::<String>()];
        let descriptor = match map.get(&root) {
            Some(descriptor)
                if matches!(
                    descriptor.command(),
                    Command::ValueParam | Command::StringParam
                ) =>
            {
                descriptor
            }
            _ => {
                return Err(Error::new(Kind::InvalidCommand, ctx.source, root)
                    .with_note(format!["`{prefix}` has no attribute with this name"]))
            }
        };
        let (parameter, n) = parse_parameter(descriptor, ctx, name_end, &['|', ']'])?;
        let segment_end = name_end + n;
        let content: String = chars[p..segment_end].iter().collect();
        segments.push(Token::new_command(ctx.source, root, content, parameter));
        match chars.get(segment_end) {
            Some('|') => p = segment_end + 1,
            _ => break segment_end + 1,
        }
    };
    let consumed = end - ctx.start;
    let text = ctx.text(consumed);
    if segments.len() == 1 {
        if let Some(token) = segments.pop() {
            out.push(Token::new_command(
                ctx.source,
                token.root(),
                text,
                token.parameter().clone(),
            ));
        }
        return Ok(consumed);
    }
    out.push(Token::new_compound_command(ctx.source, prefix, text));
    out.extend(segments);
    out.push(Token::new_compound_command_end(ctx.source, prefix));
    Ok(consumed)
}

/// Returns the index just past the `:` ending the attribute name starting at `pos`.
fn segment_name_end(chars: &[char], pos: usize) -> Option<usize> {
    let mut i = pos;
    while let Some(&c) = chars.get(i) {
        match c {
            ':' if i > pos => return Some(i + 1),
            ':' | '|' | ']' | '[' => return None,
            c if c.is_whitespace() => return None,
            _ => i += 1,
        }
    }
    None
}
