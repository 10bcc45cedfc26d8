//! The Quill tokenizer.
//!
//! The tokenizer reads source code one line at a time and appends tokens to a [TokenList].
//! For each line it:
//!
//! - skips the line entirely if it is a [line comment](crate::lexer::comment),
//! - skips block comments, which may span several lines,
//! - replaces `/[` with a literal `[`,
//! - expands [system macros](crate::lexer::macros),
//! - processes commands against the parse-time [command map](Map),
//! - coalesces consecutive text into single text tokens,
//! - and appends an end-of-line token, unless every character of the line was
//!     inside a comment.
//!
//! A malformed command never stops tokenization.
//! The tokenizer finds the rough end of the command, emits that span as text,
//!     and records a warning in its [Diagnostics].
//!
//! Inside a code section, opened by `[code]` and closed by `[/code]` by default,
//!     commands that are not allowed in code are emitted as text with a warning.

use crate::command::{Map, ParseContext};
use crate::diag::Diagnostics;
use crate::error::{Error, Kind};
use crate::lexer::comment::{self, BlockComment};
use crate::lexer::macros::MacroExpander;
use crate::lexer::{self, ESCAPE};
use crate::options::Options;
use crate::source::Source;
use crate::token::{Token, TokenList, TokenType};

/// Tokenizer for Quill source code.
///
/// The tokenizer keeps state between lines: whether a block comment is open
///     and whether a code section is open.
pub struct Tokenizer<'a> {
    map: &'a Map,
    options: Options,
    macros: MacroExpander,
    diagnostics: Diagnostics,
    block_comment: Option<BlockComment>,
    in_code: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(map: &'a Map, options: Options) -> Tokenizer<'a> {
        Tokenizer {
            map,
            options,
            macros: Default::default(),
            diagnostics: Default::default(),
            block_comment: None,
            in_code: false,
        }
    }

    /// Use the provided diagnostics, for example to use a different message catalog.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Tokenizer<'a> {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_macro_expander(mut self, macros: MacroExpander) -> Tokenizer<'a> {
        self.macros = macros;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn in_code(&self) -> bool {
        self.in_code
    }

    pub fn in_block_comment(&self) -> bool {
        self.block_comment.is_some()
    }

    /// Tokenizes a whole document and then calls [finish](Tokenizer::finish).
    pub fn tokenize_document(&mut self, file_number: u32, text: &str) -> TokenList {
        let mut out = TokenList::default();
        for (i, line) in text.lines().enumerate() {
            self.tokenize_line(Source::new(file_number, i as u32 + 1), line, &mut out);
        }
        self.finish();
        out
    }

    /// Tokenizes a whole document using the file number in the options.
    pub fn tokenize(&mut self, text: &str) -> TokenList {
        self.tokenize_document(self.options.file_number, text)
    }

    /// Tokenizes one line of source code. The line must not contain a line terminator.
    pub fn tokenize_line(&mut self, source: Source, line: &str, out: &mut TokenList) {
        let chars: Vec<char> = line.chars().collect();
        if comment::is_line_comment(&chars, self.block_comment.as_ref()) {
            return;
        }
        let mut visible = chars.is_empty() && self.block_comment.is_none();
        let mut run = String::new();
        let mut i = 0;
        while i < chars.len() {
            if let Some(block) = &self.block_comment {
                match comment::find_closing_marker(&chars, i, &block.closer) {
                    None => break,
                    Some(j) => {
                        i = j + block.closer.chars().count();
                        self.block_comment = None;
                        continue;
                    }
                }
            }
            if let Some(closer) = comment::compute_closing_marker(&chars, i) {
                // The opener is `[` followed by the `%` run of the closer.
                i += closer.chars().count();
                self.block_comment = Some(BlockComment {
                    closer,
                    opened_at: source,
                });
                continue;
            }
            visible = true;
            let c = chars[i];
            if c == ESCAPE && chars.get(i + 1) == Some(&'[') {
                run.push('[');
                i += 2;
                continue;
            }
            if c == '$' || c == '[' {
                if let Some((expansion, n)) = self.macros.expand_at(&chars, i, source) {
                    run.push_str(&expansion);
                    i += n;
                    continue;
                }
            }
            if lexer::is_command(&chars, i) {
                i += self.command(source, &chars, i, &mut run, out);
                continue;
            }
            run.push(c);
            i += 1;
        }
        flush(source, &mut run, out);
        if visible {
            out.push(Token::new_end_of_line(source));
        }
    }

    /// Ends the document.
    ///
    /// A block comment that is still open is reported. The tokenizer is reset so that
    ///     it can be used for another document.
    pub fn finish(&mut self) {
        if let Some(block) = self.block_comment.take() {
            self.diagnostics.warn(
                Error::new(Kind::UnterminatedBlockComment, block.opened_at, "")
                    .with_note(format!["the comment is closed by `{}`", block.closer]),
            );
        }
        self.in_code = false;
    }

    /// Processes the command at `pos` and returns the number of characters consumed.
    fn command(
        &mut self,
        source: Source,
        chars: &[char],
        pos: usize,
        run: &mut String,
        out: &mut TokenList,
    ) -> usize {
        let root = self.map.root_at(chars, pos).map(str::to_string);
        let ctx = ParseContext::new(source, chars, pos, self.map, &self.options);
        let mut produced = TokenList::default();
        let consumed = match self.map.process(&ctx, &mut produced, &mut self.diagnostics) {
            Ok(consumed) => consumed,
            Err(err) => {
                let end = rough_command_end(chars, pos);
                let span: String = chars[pos..end].iter().collect();
                let warning = self.recovery_warning(err, source, span.clone(), pos..end);
                self.diagnostics.warn(warning);
                run.push_str(&span);
                return end - pos;
            }
        };
        let root = root.unwrap_or_default();
        if self.in_code
            && root != self.options.code_close_root
            && !self.map.is_allowed_in_code(&root)
        {
            let text = ctx.text(consumed);
            self.diagnostics.warn(
                Error::new(Kind::CommandNotAllowedInCode, source, text.clone())
                    .with_columns(pos..pos + consumed),
            );
            run.push_str(&text);
            return consumed;
        }
        if root == self.options.code_open_root && !self.in_code {
            self.in_code = true;
            self.diagnostics.info(source, "info.code_section_opened");
        } else if root == self.options.code_close_root && self.in_code {
            self.in_code = false;
            self.diagnostics.info(source, "info.code_section_closed");
        }
        for token in produced {
            if token.token_type() == TokenType::Text {
                run.push_str(token.content());
            } else {
                flush(source, run, out);
                out.push(token);
            }
        }
        consumed
    }

    fn recovery_warning(
        &self,
        err: Error,
        source: Source,
        span: String,
        columns: std::ops::Range<usize>,
    ) -> Error {
        let mut warning = Error::new(err.kind, source, span).with_columns(columns);
        if !err.detail.is_empty() {
            warning = warning.with_note(format!["at `{}`", err.detail]);
        }
        for note in err.notes {
            warning = warning.with_note(note);
        }
        if err.kind == Kind::InvalidCommand {
            if let Some(suggestion) = self.map.close_roots(&err.detail).first() {
                warning = warning.with_note(format!["did you mean `{suggestion}`?"]);
            }
        }
        warning
    }
}

fn flush(source: Source, run: &mut String, out: &mut TokenList) {
    if !run.is_empty() {
        out.push(Token::new_text(source, std::mem::take(run)));
    }
}

/// Returns the index just past the rough end of the command starting at `pos`.
///
/// The rough end is the next `]` (included), the next whitespace (excluded)
///     or the end of the line, whichever comes first.
/// At least one character is always included.
pub fn rough_command_end(chars: &[char], pos: usize) -> usize {
    let mut i = pos + 1;
    while let Some(&c) = chars.get(i) {
        if c == ']' {
            return i + 1;
        }
        if c.is_whitespace() {
            return i;
        }
        i += 1;
    }
    chars.len().max(pos + 1)
}
