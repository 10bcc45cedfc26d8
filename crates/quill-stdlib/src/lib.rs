//! # The Quill standard library
//!
//! This crate contains the built-in Quill commands:
//!     the parse-time [registry] of every command, family and alias,
//!     and the output-side handlers that apply them to document state.
//!
//! The handlers are generic over the [Output] trait,
//!     which is the surface a backend exposes to the standard library.
//! Two backends are provided:
//!     [StdState], which tracks format state and keeps a plain text rendition of the document,
//!     and the HTML [listing] backend.

extern crate quill;

use quill::dispatch;
use quill::dispatch::Handler;
use quill::error::Error;
use quill::format::{Attribute, EolTreatment, FormatStack};
use quill::options::Options;
use quill::source::Source;
use quill::token::{Token, TokenType};
use quill::traits::*;
use std::collections::HashMap;

pub mod font;
pub mod format;
pub mod layout;
pub mod listing;
pub mod registry;
pub mod scope;

pub use registry::registry;

/// Output operations a backend must provide to use the standard library handlers.
pub trait Output: State {
    /// Writes running text.
    fn write_text(&mut self, text: &str);

    /// Ends the current line.
    fn line_break(&mut self);

    /// Ends the current paragraph.
    fn paragraph_break(&mut self);

    /// Adds vertical space, in points.
    fn vertical_skip(&mut self, points: f32);

    /// Writes a hyperlink.
    fn write_link(&mut self, url: &str, text: &str);

    /// Sets the text of the cover page.
    fn set_cover_text(&mut self, text: &str);

    /// The current page number.
    fn page_number(&self) -> u32 {
        1
    }
}

/// Returns the output-side handlers of every standard library command.
pub fn handlers<S: Output>() -> dispatch::Map<S> {
    let mut map = dispatch::Map::new();
    for (root, handler) in [
        ("[b]", font::get_bold_on()),
        ("[/b]", font::get_bold_off()),
        ("[i]", font::get_italic_on()),
        ("[/i]", font::get_italic_off()),
        ("[u]", font::get_underline_on()),
        ("[/u]", font::get_underline_off()),
        ("[x]", font::get_strikethrough_on()),
        ("[/x]", font::get_strikethrough_off()),
        ("[code]", font::get_code_on()),
        ("[/code]", font::get_code_off()),
        ("[font|size:", font::get_font_size()),
        ("[font|face:", font::get_font_face()),
        ("[font|style:", font::get_font_style()),
        ("[leading:", format::get_leading()),
        ("[indent:", format::get_indent()),
        ("[paraskip:", format::get_paragraph_skip()),
        ("[lmargin:", format::get_margin()),
        ("[rmargin:", format::get_margin()),
        ("[tmargin:", format::get_margin()),
        ("[bmargin:", format::get_margin()),
        ("[align:", format::get_align()),
        ("[eol:", format::get_eol()),
        ("[savefmt]", scope::get_save_format()),
        ("[restorefmt]", scope::get_restore_format()),
        ("[cr]", layout::get_line_break()),
        ("[skip:", layout::get_skip()),
        ("[copyright]", layout::get_symbol()),
        ("[trademark]", layout::get_symbol()),
        ("[bullet]", layout::get_symbol()),
        ("[emdash]", layout::get_symbol()),
        ("[pg#]", layout::get_symbol()),
        ("[url:", layout::get_url()),
        ("[/url]", get_noop()),
        ("[cover|text:", layout::get_cover_text()),
    ] {
        map.insert(root, handler);
    }
    map
}

/// Handlers for text and ends of line that write to an [Output].
pub struct StdHandlers;

impl<S: Output> Handlers<S> for StdHandlers {
    fn text_handler(token: &Token, input: &mut dispatch::Input<S>) -> Result<(), Error> {
        input.state_mut().write_text(token.content());
        Ok(())
    }

    /// With soft ends of line a single end of line is a space and an empty line ends the paragraph.
    fn end_of_line_handler(_: &Token, input: &mut dispatch::Input<S>) -> Result<(), Error> {
        match input.formats().current().eol_treatment {
            EolTreatment::Hard => input.state_mut().line_break(),
            // Soft ends of line before the first text are dropped.
            EolTreatment::Soft if !input.state().is_output_open() => {}
            EolTreatment::Soft => {
                let blank_line = input
                    .previous()
                    .map(|token| token.token_type() == TokenType::EndOfLine)
                    .unwrap_or(false);
                if blank_line {
                    input.state_mut().paragraph_break();
                } else {
                    input.state_mut().write_text(" ");
                }
            }
        }
        Ok(())
    }
}

/// A state struct that is compatible with every handler in the Quill standard library.
///
/// It keeps the format state and a plain text rendition of the document.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StdState {
    pub formats: FormatStack,
    /// The text written so far.
    pub text: String,
    /// Total vertical space added by skips, in points.
    pub vertical_space: f32,
    pub cover_text: Option<String>,
    /// The `(url, text)` pairs of the links written so far.
    pub links: Vec<(String, String)>,
    output_open: bool,
    pixels_per_inch: f32,
    last_changed: HashMap<Attribute, Source>,
}

impl Default for StdState {
    fn default() -> Self {
        StdState::new(&Default::default())
    }
}

impl StdState {
    pub fn new(options: &Options) -> StdState {
        StdState {
            formats: Default::default(),
            text: String::new(),
            vertical_space: 0.0,
            cover_text: None,
            links: vec![],
            output_open: false,
            pixels_per_inch: options.pixels_per_inch,
            last_changed: HashMap::new(),
        }
    }
}

impl State for StdState {
    fn formats(&self) -> &FormatStack {
        &self.formats
    }

    fn formats_mut(&mut self) -> &mut FormatStack {
        &mut self.formats
    }

    /// Output opens with the first text that is not whitespace.
    fn is_output_open(&self) -> bool {
        self.output_open
    }

    fn mark_changed(&mut self, attribute: Attribute, source: Source) {
        self.last_changed.insert(attribute, source);
    }

    fn last_changed(&self, attribute: Attribute) -> Option<Source> {
        self.last_changed.get(&attribute).copied()
    }

    fn pixels_per_inch(&self) -> f32 {
        self.pixels_per_inch
    }
}

impl Output for StdState {
    fn write_text(&mut self, text: &str) {
        if !self.output_open && text.chars().any(|c| !c.is_whitespace()) {
            tracing::debug!("output opened");
            self.output_open = true;
        }
        self.text.push_str(text);
    }

    fn line_break(&mut self) {
        self.text.push('\n');
    }

    fn paragraph_break(&mut self) {
        if self.text.ends_with("\n\n") {
            return;
        }
        while self.text.ends_with(' ') {
            self.text.pop();
        }
        self.text.push_str("\n\n");
    }

    fn vertical_skip(&mut self, points: f32) {
        self.vertical_space += points;
    }

    fn write_link(&mut self, url: &str, text: &str) {
        self.write_text(text);
        self.links.push((url.to_string(), text.to_string()));
    }

    fn set_cover_text(&mut self, text: &str) {
        self.cover_text = Some(text.to_string());
    }
}

/// Handler that does nothing, for commands that only matter to the tokenizer.
pub fn get_noop<S>() -> Handler<S> {
    Handler::new(noop_fn).with_doc("Does nothing")
}

fn noop_fn<S>(_: &Token, _: &mut dispatch::Input<S>) -> Result<usize, Error> {
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill::error::Kind;
    use quill::traits::State;
    use quill_testing::*;

    fn handlers() -> dispatch::Map<StdState> {
        super::handlers()
    }

    #[test]
    fn every_handler_is_registered() {
        let registry = registry();
        for root in super::handlers::<StdState>().roots() {
            assert!(registry.get(root).is_some(), "{root} is not in the registry");
        }
    }

    #[test]
    fn every_registered_command_has_a_handler() {
        let handlers = super::handlers::<StdState>();
        for descriptor in registry().iter() {
            if matches!(descriptor.command(), quill::command::Command::Replacement { .. }) {
                continue;
            }
            assert!(
                handlers.contains(descriptor.root()),
                "{} has no handler",
                descriptor.root()
            );
        }
    }

    #[test]
    fn unknown_command_is_text() {
        let options = vec![TestOption::Registry(registry), TestOption::Handlers(handlers)];
        let (state, diagnostics) =
            tokenize_and_dispatch::<StdState, StdHandlers>("a[bogus:12]b", &options);
        assert_eq!(state.text, "a[bogus:12]b ");
        assert_eq!(diagnostics.warnings()[0].detail, "[bogus:12]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn state_serde_round_trip() {
        let options = vec![TestOption::Registry(registry), TestOption::Handlers(handlers)];
        let (state, _) = tokenize_and_dispatch::<StdState, StdHandlers>(
            "[leading:20pt][url:http://a.b]x[/url]",
            &options,
        );
        let serialized = serde_json::to_string(&state).unwrap();
        let got: StdState = serde_json::from_str(&serialized).unwrap();
        assert_eq!(got.text, state.text);
        assert_eq!(got.links, state.links);
        assert_eq!(
            got.last_changed(Attribute::Leading),
            Some(Source::new(0, 1))
        );
    }

    test_suite![
        state(StdState),
        handlers(StdHandlers),
        options(TestOption::Registry(registry), TestOption::Handlers(handlers)),
        dispatch_tests(
            (soft_eol_is_a_space, "one\ntwo", |state: &StdState| assert_eq!(
                state.text,
                "one two "
            )),
            (blank_line_ends_paragraph, "one\n\ntwo", |state: &StdState| assert_eq!(
                state.text,
                "one\n\ntwo "
            )),
            (leading_blank_lines, "\n\none", |state: &StdState| assert_eq!(
                state.text,
                "one "
            )),
            (many_blank_lines, "one\n\n\n\ntwo", |state: &StdState| assert_eq!(
                state.text,
                "one\n\ntwo "
            )),
            (hard_eol, "[eol:hard]\none\ntwo", |state: &StdState| assert_eq!(
                state.text,
                "\none\ntwo\n"
            )),
            (last_changed, "x\n[leading:20pt]", |state: &StdState| {
                assert_eq!(
                    state.last_changed(Attribute::Leading),
                    Some(Source::new(0, 2))
                );
                assert_eq!(state.last_changed(Attribute::FontFace), None);
            }),
        ),
        dispatch_warning_tests(
            (unknown_command, "a[bogus:12]b", vec![Kind::InvalidCommand]),
            (bad_parameter, "[leading:big]", vec![Kind::InvalidCommandParameter]),
        ),
    ];
}
