//! Font commands: the `[font|` family, the style toggles and code sections

use crate::format::{invalid_parameter, points, string};
use quill::dispatch::{Handler, Input};
use quill::error::Error;
use quill::format::{Attribute, Format};
use quill::token::Token;
use quill::traits::*;

/// Face used inside code sections.
pub const CODE_FACE: &str = "Courier";

/// Smallest font size in points.
pub const MIN_FONT_SIZE: f32 = 1.0;

/// Largest font size in points.
pub const MAX_FONT_SIZE: f32 = 1000.0;

/// Get the `[font|size:` handler.
pub fn get_font_size<S: State>() -> Handler<S> {
    Handler::new(font_size_fn).with_doc("Set the font size, between 1pt and 1000pt")
}

fn font_size_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let size = points(token, input)?;
    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
        return Err(invalid_parameter(
            token,
            format!["the font size must be between {MIN_FONT_SIZE}pt and {MAX_FONT_SIZE}pt"],
        ));
    }
    input.formats_mut().current_mut().font.size = size;
    input.state_mut().mark_changed(Attribute::FontSize, token.source());
    Ok(0)
}

/// Get the `[font|face:` handler.
pub fn get_font_face<S: State>() -> Handler<S> {
    Handler::new(font_face_fn).with_doc("Set the typeface")
}

fn font_face_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let face = string(token)?.trim();
    if face.is_empty() {
        return Err(invalid_parameter(token, "the typeface name is empty"));
    }
    input.formats_mut().current_mut().font.face = face.to_string();
    input.state_mut().mark_changed(Attribute::FontFace, token.source());
    Ok(0)
}

/// Get the `[font|style:` handler.
pub fn get_font_style<S: State>() -> Handler<S> {
    Handler::new(font_style_fn).with_doc("Set the font style: plain, bold, italic or bolditalic")
}

fn font_style_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let (bold, italic) = match string(token)?.trim().to_ascii_lowercase().as_str() {
        "plain" | "normal" => (false, false),
        "bold" => (true, false),
        "italic" => (false, true),
        "bolditalic" | "bold-italic" => (true, true),
        _ => {
            return Err(invalid_parameter(
                token,
                "the styles are plain, bold, italic and bolditalic",
            ))
        }
    };
    let font = &mut input.formats_mut().current_mut().font;
    font.bold = bold;
    font.italic = italic;
    input.state_mut().mark_changed(Attribute::FontStyle, token.source());
    Ok(0)
}

fn set<S: State>(
    token: &Token,
    input: &mut Input<S>,
    attribute: Attribute,
    f: fn(&mut Format),
) -> Result<usize, Error> {
    f(input.formats_mut().current_mut());
    input.state_mut().mark_changed(attribute, token.source());
    Ok(0)
}

macro_rules! toggle {
    ( $( ($getter: ident, $func: ident, $doc: expr, $attribute: expr, $set: expr), )+ ) => {
        $(
            pub fn $getter<S: State>() -> Handler<S> {
                Handler::new($func).with_doc($doc)
            }

            fn $func<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
                set(token, input, $attribute, $set)
            }
        )+
    };
}

toggle!(
    (get_bold_on, bold_on_fn, "Begin bold text", Attribute::FontStyle, |f| f.font.bold = true),
    (get_bold_off, bold_off_fn, "End bold text", Attribute::FontStyle, |f| f.font.bold = false),
    (get_italic_on, italic_on_fn, "Begin italic text", Attribute::FontStyle, |f| f.font.italic = true),
    (get_italic_off, italic_off_fn, "End italic text", Attribute::FontStyle, |f| f.font.italic = false),
    (get_underline_on, underline_on_fn, "Begin underlined text", Attribute::Underline, |f| f.underline = true),
    (get_underline_off, underline_off_fn, "End underlined text", Attribute::Underline, |f| f.underline = false),
    (get_strikethrough_on, strikethrough_on_fn, "Begin struck through text", Attribute::Strikethrough, |f| f.strikethrough = true),
    (get_strikethrough_off, strikethrough_off_fn, "End struck through text", Attribute::Strikethrough, |f| f.strikethrough = false),
);

/// Get the `[code]` handler.
///
/// A code section saves the current format and switches to the [CODE_FACE].
/// The tokenizer handles the other effect of a code section: most commands inside it are text.
pub fn get_code_on<S: State>() -> Handler<S> {
    Handler::new(code_on_fn).with_doc("Begin a code section")
}

fn code_on_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    let formats = input.formats_mut();
    formats.save_current_format();
    formats.current_mut().font.face = CODE_FACE.to_string();
    input.state_mut().mark_changed(Attribute::FontFace, token.source());
    Ok(0)
}

/// Get the `[/code]` handler, which restores the format saved by `[code]`.
pub fn get_code_off<S: State>() -> Handler<S> {
    Handler::new(code_off_fn).with_doc("End a code section")
}

fn code_off_fn<S: State>(token: &Token, input: &mut Input<S>) -> Result<usize, Error> {
    crate::scope::restore(token, input);
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
            (bold, "[b]", |state: &StdState| assert!(state.formats.current().font.bold)),
            (bold_off, "[b]x[/b]", |state: &StdState| assert!(!state.formats.current().font.bold)),
            (italic, "[i]", |state: &StdState| assert!(state.formats.current().font.italic)),
            (underline, "[u]", |state: &StdState| assert!(state.formats.current().underline)),
            (strikethrough, "[x]", |state: &StdState| assert!(
                state.formats.current().strikethrough
            )),
            (strikethrough_off, "[x][/x]", |state: &StdState| assert!(
                !state.formats.current().strikethrough
            )),
            (size, "[font|size:18pt]", |state: &StdState| assert_eq!(
                state.formats.current().font.size,
                18.0
            )),
            (size_alias, "[fsize:1in]", |state: &StdState| assert_eq!(
                state.formats.current().font.size,
                72.0
            )),
            (size_bounds, "[fsize:1pt][fsize:1000pt]", |state: &StdState| assert_eq!(
                state.formats.current().font.size,
                1000.0
            )),
            (face, "[font|face:Helvetica]", |state: &StdState| assert_eq!(
                state.formats.current().font.face,
                "Helvetica"
            )),
            (face_alias, "[ff:{Times New Roman}]", |state: &StdState| assert_eq!(
                state.formats.current().font.face,
                "Times New Roman"
            )),
            (style, "[font|style:BoldItalic]", |state: &StdState| {
                let font = &state.formats.current().font;
                assert!(font.bold && font.italic);
            }),
            (compound, "[font|size:9pt|face:Arial|style:italic]", |state: &StdState| {
                let font = &state.formats.current().font;
                assert_eq!((font.size, font.face.as_str()), (9.0, "Arial"));
                assert!(font.italic && !font.bold);
            }),
            (code_section, "[b][code]x = 1;", |state: &StdState| {
                let font = &state.formats.current().font;
                assert_eq!(font.face, CODE_FACE);
                assert!(font.bold);
                assert_eq!(state.formats.size(), 2);
            }),
            (code_section_restores, "[code]x[/code]", |state: &StdState| {
                assert_eq!(state.formats.current().font.face, "Times-Roman");
                assert_eq!(state.formats.size(), 1);
            }),
        ),
        dispatch_warning_tests(
            (size_too_small, "[fsize:0.5pt]", vec![Kind::InvalidCommandParameter]),
            (size_too_large, "[fsize:1001pt]", vec![Kind::InvalidCommandParameter]),
            (empty_face, "[ff:{ }]", vec![Kind::InvalidCommandParameter]),
            (unknown_style, "[font|style:oblique]", vec![Kind::InvalidCommandParameter]),
            (bold_inside_code, "[code][b][/code]", vec![Kind::CommandNotAllowedInCode]),
        ),
    ];

    #[test]
    fn bad_compound_changes_nothing() {
        let options = vec![TestOption::Registry(registry), TestOption::Handlers(handlers)];
        let (state, diagnostics) = tokenize_and_dispatch::<StdState, StdHandlers>(
            "[font|size:9pt|face:Arial|style:oblique]",
            &options,
        );
        // The style is rejected when dispatching, after the other attributes are set.
        assert_eq!(state.formats.current().font.size, 9.0);
        assert_eq!(diagnostics.warnings().len(), 1);

        let (state, diagnostics) = tokenize_and_dispatch::<StdState, StdHandlers>(
            "[font|size:9pt|shade:dark]",
            &options,
        );
        // An unknown attribute is rejected when tokenizing, so no attribute is set.
        assert_eq!(state.formats.current().font.size, 12.0);
        assert_eq!(state.text, "[font|size:9pt|shade:dark] ");
        assert_eq!(diagnostics.warnings()[0].kind, Kind::InvalidCommand);
    }
}
