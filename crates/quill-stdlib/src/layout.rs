//! Commands that write to the output: line breaks, vertical skips, symbols, links and the cover

use crate::format::{invalid_parameter, points, string};
use crate::Output;
use quill::dispatch::{Handler, Input};
use quill::error::Error;
use quill::token::{Token, TokenType};

/// Get the `[cr]` handler.
pub fn get_line_break<S: Output>() -> Handler<S> {
    Handler::new(line_break_fn).with_doc("Line break")
}

fn line_break_fn<S: Output>(_: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    input.state_mut().line_break();
    Ok(0)
}

/// Get the `[skip:` handler.
pub fn get_skip<S: Output>() -> Handler<S> {
    Handler::new(skip_fn).with_doc("Add vertical space; must not be negative")
}

fn skip_fn<S: Output>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let skip = points(token, input)?;
    if skip < 0.0 {
        return Err(invalid_parameter(token, "a skip cannot be negative"));
    }
    input.state_mut().vertical_skip(skip);
    Ok(0)
}

/// Returns the text of a symbol command, or `None` if the root is not a symbol.
pub fn symbol_text<S: Output>(root: &str, state: &S) -> Option<String> {
    let symbol = match root {
        "[copyright]" => "\u{00A9}",
        "[trademark]" => "\u{2122}",
        "[bullet]" => "\u{2022}",
        "[emdash]" => "\u{2014}",
        "[pg#]" => return Some(state.page_number().to_string()),
        _ => return None,
    };
    Some(symbol.to_string())
}

/// Get the handler for the symbol commands.
///
/// The symbol that is written is chosen by the root of the command.
pub fn get_symbol<S: Output>() -> Handler<S> {
    Handler::new(symbol_fn).with_doc("Write a symbol")
}

fn symbol_fn<S: Output>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let text = symbol_text(token.root(), input.state()).ok_or_else(|| {
        invalid_parameter(token, format!["`{}` is not a symbol", token.root()])
    })?;
    input.state_mut().write_text(&text);
    Ok(0)
}

/// Get the `[url:` handler.
///
/// The link text is the text up to the next `[/url]` command.
/// The handler consumes the link text and the `[/url]` command.
/// If there is no `[/url]` command on the same line, the URL itself is used as the link text.
pub fn get_url<S: Output>() -> Handler<S> {
    Handler::new(url_fn).with_doc("Begin a hyperlink; the link text ends at [/url]")
}

/// The root of the command ending a link.
pub const URL_END_ROOT: &str = "[/url]";

fn url_fn<S: Output>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let url = string(token)?.trim();
    if url.is_empty() {
        return Err(invalid_parameter(token, "the URL is empty"));
    }
    let (text, consumed) = match link_text(input.following()) {
        Some((text, consumed)) => (text, consumed),
        None => (url.to_string(), 0),
    };
    input.state_mut().write_link(url, &text);
    Ok(consumed)
}

/// Returns the text of the text tokens before the first `[/url]` command,
///     and the number of tokens up to and including that command.
pub fn link_text(tokens: &[Token]) -> Option<(String, usize)> {
    let mut text = String::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.token_type() {
            TokenType::Text => text.push_str(token.content()),
            TokenType::Command if token.root() == URL_END_ROOT => return Some((text, i + 1)),
            _ => return None,
        }
    }
    None
}

/// Get the `[cover|text:` handler.
pub fn get_cover_text<S: Output>() -> Handler<S> {
    Handler::new(cover_text_fn).with_doc("Set the text of the cover page")
}

fn cover_text_fn<S: Output>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let text = string(token)?;
    input.state_mut().set_cover_text(text);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handlers, registry, StdHandlers, StdState};
    use quill::error::Kind;
    use quill_testing::*;

    test_suite![
        state(StdState),
        handlers(StdHandlers),
        options(TestOption::Registry(registry), TestOption::Handlers(handlers)),
        dispatch_tests(
            (line_break, "a[cr]b", |state: &StdState| assert_eq!(state.text, "a\nb ")),
            (skip, "[skip:1in][skip:6pt]", |state: &StdState| assert_eq!(
                state.vertical_space,
                78.0
            )),
            (symbols, "[copyright][trademark][bullet][emdash]", |state: &StdState| assert_eq!(
                state.text,
                "\u{00A9}\u{2122}\u{2022}\u{2014} "
            )),
            (page_number, "page [pg#]", |state: &StdState| assert_eq!(
                state.text,
                "page 1 "
            )),
            (url, "see [url:https://example.com]the site[/url].", |state: &StdState| {
                assert_eq!(state.text, "see the site. ");
                assert_eq!(
                    state.links,
                    vec![("https://example.com".to_string(), "the site".to_string())]
                );
            }),
            (url_without_end, "[url:https://example.com]\nmore", |state: &StdState| {
                assert_eq!(state.text, "https://example.com more ");
            }),
            (url_end_alone, "a[/url]b", |state: &StdState| assert_eq!(state.text, "ab ")),
            (cover, "[cover|text:{Annual [Report]}]", |state: &StdState| assert_eq!(
                state.cover_text.as_deref(),
                Some("Annual [Report]")
            )),
        ),
        dispatch_warning_tests(
            (negative_skip, "[skip:-1pt]", vec![Kind::InvalidCommandParameter]),
            (empty_url, "[url:{ }]x[/url]", vec![Kind::InvalidCommandParameter]),
        ),
    ];

    #[test]
    fn link_text_stops_at_other_tokens() {
        let s = quill::source::Source::new(0, 1);
        let tokens = vec![
            Token::new_text(s, "a"),
            Token::new_end_of_line(s),
            Token::new_text(s, "b"),
        ];
        assert_eq!(link_text(&tokens), None);
        let tokens = vec![
            Token::new_text(s, "a"),
            Token::new_command(s, URL_END_ROOT, URL_END_ROOT, Default::default()),
        ];
        assert_eq!(link_text(&tokens), Some(("a".to_string(), 2)));
    }
}
