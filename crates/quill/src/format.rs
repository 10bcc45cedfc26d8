//! Formatting state.
//!
//! A [Format] is the complete set of formatting attributes in effect at a point of the document.
//! The [FormatStack] holds the live format together with the formats saved by scoped commands.
//! Its bottom element is the document defaults and can never be popped,
//!     so restoring more formats than were saved is always safe.

use crate::parse::Conversion;
use quill_stdext::collections::floorstack::FloorStack;
use std::fmt;

/// A font.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub face: String,
    /// Size in points.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            face: "Times-Roman".into(),
            size: 12.0,
            bold: false,
            italic: false,
        }
    }
}

/// Horizontal alignment of paragraphs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parses an alignment name. Case is ignored.
    pub fn parse(s: &str) -> Option<Alignment> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" | "centre" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" | "justified" => Some(Alignment::Justify),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// What an end of line in the source means.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EolTreatment {
    /// A single end of line is a space; a blank line ends the paragraph.
    #[default]
    Soft,
    /// Every end of line is a line break.
    Hard,
}

impl EolTreatment {
    /// Parses a treatment name. Case is ignored.
    pub fn parse(s: &str) -> Option<EolTreatment> {
        match s.to_ascii_lowercase().as_str() {
            "soft" => Some(EolTreatment::Soft),
            "hard" => Some(EolTreatment::Hard),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EolTreatment::Soft => "soft",
            EolTreatment::Hard => "hard",
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            left: 72.0,
            right: 72.0,
            top: 72.0,
            bottom: 72.0,
        }
    }
}

/// Page size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };
    /// ISO A4.
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::LETTER
    }
}

/// The formatting attributes in effect.
///
/// Lengths are in points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Format {
    pub font: Font,
    /// Distance between baselines.
    pub leading: f32,
    pub alignment: Alignment,
    pub underline: bool,
    pub strikethrough: bool,
    pub margins: Margins,
    pub first_line_indent: f32,
    /// Extra space between paragraphs.
    pub paragraph_skip: f32,
    pub eol_treatment: EolTreatment,
    pub page: PageSize,
}

impl Default for Format {
    /// The document defaults: 12pt Times-Roman on 14.4pt leading, left aligned,
    ///     with one inch margins on a Letter page and soft ends of lines.
    fn default() -> Self {
        Format {
            font: Default::default(),
            leading: 14.4,
            alignment: Default::default(),
            underline: false,
            strikethrough: false,
            margins: Default::default(),
            first_line_indent: 0.0,
            paragraph_skip: 0.0,
            eol_treatment: Default::default(),
            page: Default::default(),
        }
    }
}

impl Format {
    /// Returns the unit conversion for this format at the provided resolution.
    pub fn conversion(&self, pixels_per_inch: f32) -> Conversion {
        Conversion {
            pixels_per_inch,
            leading: self.leading,
        }
    }

    /// Width of the text area: the page width less the left and right margins.
    pub fn text_width(&self) -> f32 {
        self.page.width - self.margins.left - self.margins.right
    }
}

/// A formatting attribute, used to record where each attribute was last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    FontFace,
    FontSize,
    FontStyle,
    Leading,
    Alignment,
    Underline,
    Strikethrough,
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    FirstLineIndent,
    ParagraphSkip,
    EolTreatment,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Attribute::FontFace => "font face",
            Attribute::FontSize => "font size",
            Attribute::FontStyle => "font style",
            Attribute::Leading => "leading",
            Attribute::Alignment => "alignment",
            Attribute::Underline => "underline",
            Attribute::Strikethrough => "strikethrough",
            Attribute::LeftMargin => "left margin",
            Attribute::RightMargin => "right margin",
            Attribute::TopMargin => "top margin",
            Attribute::BottomMargin => "bottom margin",
            Attribute::FirstLineIndent => "first line indent",
            Attribute::ParagraphSkip => "paragraph skip",
            Attribute::EolTreatment => "end-of-line treatment",
        };
        write!(f, "{s}")
    }
}

/// The live format together with the saved formats.
///
/// ```
/// # use quill::format::*;
/// let mut stack = FormatStack::default();
/// stack.current_mut().font.bold = true;
/// stack.save_current_format();
/// stack.current_mut().font.italic = true;
/// assert!(stack.restore_last_format().font.bold);
/// assert!(!stack.current().font.italic);
/// // Restoring with nothing saved returns the defaults.
/// assert_eq!(stack.restore_last_format(), &Format::default());
/// assert_eq!(stack.size(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatStack {
    live: Format,
    saved: FloorStack<Format>,
}

impl Default for FormatStack {
    fn default() -> Self {
        FormatStack::new(Format::default())
    }
}

impl FormatStack {
    /// Creates a new stack whose bottom element, and live format, are the provided defaults.
    pub fn new(defaults: Format) -> FormatStack {
        FormatStack {
            live: defaults.clone(),
            saved: FloorStack::new(defaults),
        }
    }

    /// Pushes a copy of the live format.
    pub fn save_current_format(&mut self) {
        self.saved.push(self.live.clone());
    }

    /// Pops the last saved format into the live format and returns it.
    ///
    /// If no format is saved the live format is reset to the defaults.
    pub fn restore_last_format(&mut self) -> &Format {
        self.live = match self.saved.pop() {
            Some(format) => format,
            None => self.saved.floor().clone(),
        };
        &self.live
    }

    /// Returns true if there is a saved format above the defaults.
    pub fn has_saved_format(&self) -> bool {
        !self.saved.is_floor_only()
    }

    /// The number of formats in the stack, including the defaults. Always at least 1.
    pub fn size(&self) -> usize {
        self.saved.len()
    }

    pub fn current(&self) -> &Format {
        &self.live
    }

    pub fn current_mut(&mut self) -> &mut Format {
        &mut self.live
    }

    pub fn defaults(&self) -> &Format {
        self.saved.floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_defaults() {
        let format = Format::default();
        assert_eq!(format.font.face, "Times-Roman");
        assert_eq!(format.font.size, 12.0);
        assert_eq!(format.leading, 14.4);
        assert_eq!(format.alignment, Alignment::Left);
        assert_eq!(format.margins.left, 72.0);
        assert_eq!(format.page, PageSize::LETTER);
        assert_eq!(format.eol_treatment, EolTreatment::Soft);
        assert_eq!(format.text_width(), 468.0);
    }

    #[test]
    fn never_underflows() {
        // 1 is save, 0 is restore.
        let ops = [1, 0, 0, 0, 1, 1, 0, 1, 0, 0, 0, 0, 1, 0];
        let mut stack = FormatStack::default();
        for (i, op) in ops.into_iter().enumerate() {
            stack.current_mut().leading = i as f32;
            if op == 1 {
                stack.save_current_format();
            } else {
                stack.restore_last_format();
            }
            assert!(stack.size() >= 1);
            assert_eq!(stack.defaults(), &Format::default());
        }
    }

    #[test]
    fn nested_restore() {
        let mut stack = FormatStack::default();
        stack.current_mut().leading = 20.0;
        stack.save_current_format();
        stack.current_mut().leading = 30.0;
        stack.save_current_format();
        stack.current_mut().leading = 40.0;
        assert_eq!(stack.size(), 3);
        assert_eq!(stack.restore_last_format().leading, 30.0);
        assert_eq!(stack.restore_last_format().leading, 20.0);
        assert_eq!(stack.restore_last_format().leading, 14.4);
        assert!(!stack.has_saved_format());
    }

    #[test]
    fn saved_format_is_a_copy() {
        let mut stack = FormatStack::default();
        stack.save_current_format();
        stack.current_mut().font.face = "Courier".into();
        assert_eq!(stack.restore_last_format().font.face, "Times-Roman");
    }

    #[test]
    fn custom_defaults() {
        let defaults = Format {
            page: PageSize::A4,
            ..Default::default()
        };
        let mut stack = FormatStack::new(defaults.clone());
        stack.current_mut().page = PageSize::LETTER;
        assert_eq!(stack.restore_last_format(), &defaults);
    }

    macro_rules! parse_tests {
        ( $( ($name: ident, $parse: expr, $input: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($parse($input), $want);
                }
            )+
        };
    }

    parse_tests!(
        (alignment_center, Alignment::parse, "Center", Some(Alignment::Center)),
        (alignment_justify, Alignment::parse, "justify", Some(Alignment::Justify)),
        (alignment_unknown, Alignment::parse, "middle", None),
        (eol_hard, EolTreatment::parse, "HARD", Some(EolTreatment::Hard)),
        (eol_unknown, EolTreatment::parse, "wrap", None),
    );
}
