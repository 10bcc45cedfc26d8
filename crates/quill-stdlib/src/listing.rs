//! HTML listing backend
//!
//! The listing shows the source of a document as a web page, one numbered line per source line,
//!     with the commands highlighted.
//! Commands are not applied;
//!     the listing is built from the content of the tokens, which is the text the author wrote.
//!
//! When the tokenizer is configured to emit replaced commands,
//!     aliases are highlighted differently from the commands they stand for.

use crate::layout::link_text;
use quill::dispatch::{self, Handler, Input};
use quill::error::Error;
use quill::format::FormatStack;
use quill::source::Source;
use quill::token::{Token, TokenType};
use quill::traits::*;

/// Document state of the listing backend.
#[derive(Debug, Default)]
pub struct ListingState {
    pub formats: FormatStack,
    body: String,
    line: Option<u32>,
    pending_alias: bool,
}

impl State for ListingState {
    fn formats(&self) -> &FormatStack {
        &self.formats
    }

    fn formats_mut(&mut self) -> &mut FormatStack {
        &mut self.formats
    }

    fn is_output_open(&self) -> bool {
        !self.body.is_empty()
    }
}

impl ListingState {
    /// The body of the listing: the numbered lines without the surrounding page.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the complete HTML page.
    pub fn into_html(self, title: &str) -> String {
        format![
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n<pre>\n{}</pre>\n</body>\n</html>\n",
            escape(title),
            STYLE,
            self.body
        ]
    }

    /// Clears the alias flag, returning true if the alias text has already been written.
    fn take_pending_alias(&mut self) -> bool {
        std::mem::take(&mut self.pending_alias)
    }

    fn open_line(&mut self, source: Source) {
        if self.line != Some(source.line_number) {
            self.line = Some(source.line_number);
            self.body
                .push_str(&format!["<span class=\"ln\">{:>5}</span>  ", source.line_number]);
        }
    }

    fn write(&mut self, source: Source, text: &str) {
        self.open_line(source);
        self.body.push_str(&escape(text));
    }

    fn write_span(&mut self, source: Source, class: &str, text: &str) {
        self.open_line(source);
        self.body
            .push_str(&format!["<span class=\"{class}\">{}</span>", escape(text)]);
    }
}

const STYLE: &str = "\
.ln { color: #999; }
.cmd { color: #1a5fb4; }
.alias { color: #a51d2d; }
.family { font-weight: bold; }
";

/// Escapes the HTML special characters.
pub fn escape(text: &str) -> String {
    let mut s = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            c => s.push(c),
        }
    }
    s
}

/// Returns the handlers of the listing backend.
///
/// Only multi-token constructs need handlers.
/// Every other command is highlighted by [ListingHandlers].
pub fn handlers() -> dispatch::Map<ListingState> {
    let mut map = dispatch::Map::new();
    map.insert("[font|", get_family());
    map.insert("[cover|", get_family());
    map.insert("[url:", get_url());
    map
}

/// Get the handler for compound commands.
///
/// The whole command is highlighted and its attribute tokens are skipped.
pub fn get_family() -> Handler<ListingState> {
    Handler::new(family_fn).with_doc("Highlight a compound command")
}

fn family_fn(token: &Token, input: &mut Input<ListingState>) -> Result<usize, Error> {
    let skip = input
        .following()
        .iter()
        .position(|t| t.token_type() == TokenType::CompoundCommandEnd)
        .map(|i| i + 1)
        .unwrap_or(0);
    let state = input.state_mut();
    if !state.take_pending_alias() {
        state.write_span(token.source(), "cmd family", token.content());
    }
    Ok(skip)
}

/// Get the `[url:` handler, which turns the link text into a link.
pub fn get_url() -> Handler<ListingState> {
    Handler::new(url_fn).with_doc("Highlight a hyperlink")
}

fn url_fn(token: &Token, input: &mut Input<ListingState>) -> Result<usize, Error> {
    let url = token.parameter().string().unwrap_or_default().trim().to_string();
    let following = input.following();
    let state = input.state_mut();
    if !state.take_pending_alias() {
        state.write_span(token.source(), "cmd", token.content());
    }
    match link_text(following) {
        None => Ok(0),
        Some((text, consumed)) => {
            state.body.push_str(&format![
                "<a href=\"{}\">{}</a>",
                escape(&url),
                escape(&text)
            ]);
            let end = &following[consumed - 1];
            state.write_span(end.source(), "cmd", end.content());
            Ok(consumed)
        }
    }
}

/// Handlers of the listing backend for text, ends of line and commands without a handler.
pub struct ListingHandlers;

impl Handlers<ListingState> for ListingHandlers {
    fn text_handler(token: &Token, input: &mut Input<ListingState>) -> Result<(), Error> {
        input.state_mut().write(token.source(), token.content());
        Ok(())
    }

    fn undefined_command_handler(
        token: &Token,
        input: &mut Input<ListingState>,
    ) -> Result<(), Error> {
        let state = input.state_mut();
        if state.take_pending_alias() {
            return Ok(());
        }
        state.write_span(token.source(), "cmd", token.content());
        Ok(())
    }

    fn end_of_line_handler(token: &Token, input: &mut Input<ListingState>) -> Result<(), Error> {
        let state = input.state_mut();
        state.open_line(token.source());
        state.body.push('\n');
        Ok(())
    }

    fn replaced_command_handler(
        token: &Token,
        input: &mut Input<ListingState>,
    ) -> Result<(), Error> {
        let state = input.state_mut();
        state.write_span(token.source(), "alias", token.content());
        state.pending_alias = true;
        Ok(())
    }
}
