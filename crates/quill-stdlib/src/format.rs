//! Paragraph and page attributes
//!
//! Every handler validates its parameter before changing the format,
//!     so a rejected command leaves the document state unchanged.

use quill::dispatch::{Handler, Input};
use quill::error::{Error, Kind};
use quill::format::{Alignment, Attribute, EolTreatment};
use quill::token::Token;
use quill::traits::*;

pub const LEADING_DOC: &str = "Set the distance between baselines; must be positive";
pub const INDENT_DOC: &str = "Set the first line indent; must be smaller than the text width";
pub const PARAGRAPH_SKIP_DOC: &str = "Set the space between paragraphs; must not be negative";
pub const MARGIN_DOC: &str = "Set a page margin; margins cannot change once output has begun";
pub const ALIGN_DOC: &str = "Set the alignment: left, center, right or justify";
pub const EOL_DOC: &str = "Set the end-of-line treatment: soft or hard";

/// Returns an invalid parameter error for the token.
pub(crate) fn invalid_parameter<T: Into<String>>(token: &Token, note: T) -> Error {
    Error::new(Kind::InvalidCommandParameter, token.source(), token.content()).with_note(note)
}

/// Returns the token's measure in points, converted using the live format.
pub(crate) fn points<S: State>(token: &Token, input: &Input<S>) -> Result<f32, Error> {
    let conversion = input.state().conversion();
    token
        .parameter()
        .measure()
        .and_then(|measure| measure.to_points(&conversion))
        .ok_or_else(|| invalid_parameter(token, "expected a measure like `12pt`"))
}

/// Returns the token's string parameter.
pub(crate) fn string(token: &Token) -> Result<&str, Error> {
    token
        .parameter()
        .string()
        .ok_or_else(|| invalid_parameter(token, "expected a string"))
}

/// Get the `[leading:` handler.
pub fn get_leading<S: State>() -> Handler<S> {
    Handler::new(leading_fn).with_doc(LEADING_DOC)
}

fn leading_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let leading = points(token, input)?;
    if leading <= 0.0 {
        return Err(invalid_parameter(token, "the leading must be positive"));
    }
    input.formats_mut().current_mut().leading = leading;
    input.state_mut().mark_changed(Attribute::Leading, token.source());
    Ok(0)
}

/// Get the `[indent:` handler.
pub fn get_indent<S: State>() -> Handler<S> {
    Handler::new(indent_fn).with_doc(INDENT_DOC)
}

fn indent_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let indent = points(token, input)?;
    let text_width = input.formats().current().text_width();
    if indent.abs() >= text_width {
        return Err(invalid_parameter(
            token,
            format!["the indent must be smaller than the text width of {text_width}pt"],
        ));
    }
    input.formats_mut().current_mut().first_line_indent = indent;
    input
        .state_mut()
        .mark_changed(Attribute::FirstLineIndent, token.source());
    Ok(0)
}

/// Get the `[paraskip:` handler.
pub fn get_paragraph_skip<S: State>() -> Handler<S> {
    Handler::new(paragraph_skip_fn).with_doc(PARAGRAPH_SKIP_DOC)
}

fn paragraph_skip_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let skip = points(token, input)?;
    if skip < 0.0 {
        return Err(invalid_parameter(token, "the paragraph skip cannot be negative"));
    }
    input.formats_mut().current_mut().paragraph_skip = skip;
    input
        .state_mut()
        .mark_changed(Attribute::ParagraphSkip, token.source());
    Ok(0)
}

/// Get the handler for the `[lmargin:`, `[rmargin:`, `[tmargin:` and `[bmargin:` commands.
///
/// The margin that is set is chosen by the root of the command.
pub fn get_margin<S: State>() -> Handler<S> {
    Handler::new(margin_fn).with_doc(MARGIN_DOC)
}

fn margin_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let attribute = match token.root() {
        "[lmargin:" => Attribute::LeftMargin,
        "[rmargin:" => Attribute::RightMargin,
        "[tmargin:" => Attribute::TopMargin,
        "[bmargin:" => Attribute::BottomMargin,
        _ => {
            return Err(Error::new(Kind::InvalidCommand, token.source(), token.root())
                .with_note("not a margin command"))
        }
    };
    let margin = points(token, input)?;
    if margin < 0.0 {
        return Err(invalid_parameter(token, "a margin cannot be negative"));
    }
    let format = input.formats().current();
    let (page, other) = match attribute {
        Attribute::LeftMargin => (format.page.width, format.margins.right),
        Attribute::RightMargin => (format.page.width, format.margins.left),
        Attribute::TopMargin => (format.page.height, format.margins.bottom),
        _ => (format.page.height, format.margins.top),
    };
    if margin + other >= page {
        return Err(invalid_parameter(
            token,
            format!["the margins must fit inside the {page}pt page"],
        ));
    }
    if input.state().is_output_open() {
        let mut err = Error::new(Kind::AttributeFrozen, token.source(), token.content())
            .with_note(format!["the {attribute} cannot change after output has begun"]);
        if let Some(source) = input.state().last_changed(attribute) {
            err = err.with_note(format!["the {attribute} was last set at {source}"]);
        }
        return Err(err);
    }
    let margins = &mut input.formats_mut().current_mut().margins;
    match attribute {
        Attribute::LeftMargin => margins.left = margin,
        Attribute::RightMargin => margins.right = margin,
        Attribute::TopMargin => margins.top = margin,
        _ => margins.bottom = margin,
    }
    input.state_mut().mark_changed(attribute, token.source());
    Ok(0)
}

/// Get the `[align:` handler.
pub fn get_align<S: State>() -> Handler<S> {
    Handler::new(align_fn).with_doc(ALIGN_DOC)
}

fn align_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let alignment = Alignment::parse(string(token)?.trim()).ok_or_else(|| {
        invalid_parameter(token, "the alignments are left, center, right and justify")
    })?;
    input.formats_mut().current_mut().alignment = alignment;
    input
        .state_mut()
        .mark_changed(Attribute::Alignment, token.source());
    Ok(0)
}

/// Get the `[eol:` handler.
pub fn get_eol<S: State>() -> Handler<S> {
    Handler::new(eol_fn).with_doc(EOL_DOC)
}

fn eol_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let treatment = EolTreatment::parse(string(token)?.trim()).ok_or_else(|| {
        Error::new(Kind::InvalidEolTreatment, token.source(), token.content())
            .with_note("the treatments are soft and hard")
    })?;
    input.formats_mut().current_mut().eol_treatment = treatment;
    input
        .state_mut()
        .mark_changed(Attribute::EolTreatment, token.source());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handlers, registry, StdHandlers, StdState};
    use quill::format::Format;
    use quill_testing::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    test_suite![
        state(StdState),
        handlers(StdHandlers),
        options(TestOption::Registry(registry), TestOption::Handlers(handlers)),
        dispatch_tests(
            (leading_points, "[leading:20pt]", |state: &StdState| assert_eq!(
                state.formats.current().leading,
                20.0
            )),
            (leading_inches, "[leading:0.5in]", |state: &StdState| assert_eq!(
                state.formats.current().leading,
                36.0
            )),
            (leading_lines_use_current_leading, "[leading:10pt][leading:2li]", |state: &StdState| {
                assert_eq!(state.formats.current().leading, 20.0)
            }),
            (leading_lines_follow_changes, "[leading:2li][leading:2li]", |state: &StdState| {
                assert!(approx(state.formats.current().leading, 57.6))
            }),
            (leading_pixels, "[leading:96px]", |state: &StdState| assert_eq!(
                state.formats.current().leading,
                72.0
            )),
            (indent, "[indent:2.54cm]", |state: &StdState| assert!(approx(
                state.formats.current().first_line_indent,
                72.0
            ))),
            (negative_indent, "[indent:-10pt]", |state: &StdState| assert_eq!(
                state.formats.current().first_line_indent,
                -10.0
            )),
            (paragraph_skip, "[paraskip:6pt]", |state: &StdState| assert_eq!(
                state.formats.current().paragraph_skip,
                6.0
            )),
            (margins, "[lmargin:1in][rmargin:36pt][tmargin:0pt][bmargin:2in]", |state: &StdState| {
                let margins = state.formats.current().margins;
                assert_eq!((margins.left, margins.right), (72.0, 36.0));
                assert_eq!((margins.top, margins.bottom), (0.0, 144.0));
            }),
            (align, "[align:Center]", |state: &StdState| assert_eq!(
                state.formats.current().alignment,
                Alignment::Center
            )),
            (eol, "[eol:hard]", |state: &StdState| assert_eq!(
                state.formats.current().eol_treatment,
                EolTreatment::Hard
            )),
        ),
        dispatch_warning_tests(
            (leading_zero, "[leading:0pt]", vec![Kind::InvalidCommandParameter]),
            (leading_negative, "[leading:-1pt]", vec![Kind::InvalidCommandParameter]),
            (indent_too_wide, "[indent:7in]", vec![Kind::InvalidCommandParameter]),
            (paragraph_skip_negative, "[paraskip:-2pt]", vec![Kind::InvalidCommandParameter]),
            (margin_negative, "[lmargin:-1pt]", vec![Kind::InvalidCommandParameter]),
            (margins_overlap, "[lmargin:4in][rmargin:4.5in]", vec![Kind::InvalidCommandParameter]),
            (margin_frozen, "text\n[lmargin:1pt]", vec![Kind::AttributeFrozen]),
            (align_unknown, "[align:middle]", vec![Kind::InvalidCommandParameter]),
            (eol_unknown, "[eol:wrap]", vec![Kind::InvalidEolTreatment]),
        ),
    ];

    macro_rules! unchanged_tests {
        ( $( ($name: ident, $input: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let options = vec![TestOption::Registry(registry), TestOption::Handlers(handlers)];
                    let (state, diagnostics) = tokenize_and_dispatch::<StdState, StdHandlers>($input, &options);
                    assert_eq!(diagnostics.warnings().len(), 1);
                    assert_eq!(state.formats.current(), &Format::default());
                }
            )+
        };
    }

    unchanged_tests!(
        (rejected_leading_leaves_format, "[leading:-5pt]"),
        (rejected_margin_leaves_format, "[tmargin:12in]"),
        (rejected_eol_leaves_format, "[eol:sometimes]"),
    );

    #[test]
    fn frozen_margin_names_last_change() {
        let options = vec![TestOption::Registry(registry), TestOption::Handlers(handlers)];
        let (state, diagnostics) = tokenize_and_dispatch::<StdState, StdHandlers>(
            "[lmargin:1pt]\ntext\n[lmargin:2pt]",
            &options,
        );
        assert_eq!(state.formats.current().margins.left, 1.0);
        let warning = &diagnostics.warnings()[0];
        assert_eq!(warning.kind, Kind::AttributeFrozen);
        assert_eq!(warning.source.line_number, 3);
        assert!(warning.notes[1].contains("line 1"));
    }
}
