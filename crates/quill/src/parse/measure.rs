//! Numeric parameters with units, like `12pt` or `2.5cm`.

use std::fmt;

/// Unit of a [Measure].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    /// `pt`: 1/72 of an inch.
    Point,
    /// `in`
    Inch,
    /// `cm`
    Cm,
    /// `li`: the current leading.
    Line,
    /// `px`: one pixel at the configured resolution.
    Pixel,
    /// No abbreviation followed the number.
    None,
    /// An abbreviation followed the number but it is not a known unit.
    Error,
}

impl Unit {
    /// Returns the unit for a two letter abbreviation.
    ///
    /// Unknown abbreviations map to [Unit::Error].
    pub fn from_abbreviation(abbreviation: &str) -> Unit {
        match abbreviation {
            "pt" => Unit::Point,
            "in" => Unit::Inch,
            "cm" => Unit::Cm,
            "li" => Unit::Line,
            "px" => Unit::Pixel,
            _ => Unit::Error,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Unit::Point => "pt",
            Unit::Inch => "in",
            Unit::Cm => "cm",
            Unit::Line => "li",
            Unit::Pixel => "px",
            Unit::None => "",
            Unit::Error => "??",
        }
    }
}

/// A number together with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure {
    pub amount: f32,
    pub unit: Unit,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.abbreviation())
    }
}

/// Document values that unit conversion depends on.
///
/// The `li` unit is relative to the *current* leading,
///     so a conversion must be built from live document state and not cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub pixels_per_inch: f32,
    pub leading: f32,
}

impl Measure {
    pub fn new(amount: f32, unit: Unit) -> Measure {
        Measure { amount, unit }
    }

    /// Converts the measure to points.
    ///
    /// A measure without a unit is read as points.
    /// Returns `None` for [Unit::Error] or if the pixel resolution is not positive.
    pub fn to_points(&self, conversion: &Conversion) -> Option<f32> {
        match self.unit {
            Unit::Point | Unit::None => Some(self.amount),
            Unit::Inch => Some(self.amount * 72.0),
            Unit::Cm => Some(self.amount * 72.0 / 2.54),
            Unit::Line => Some(self.amount * conversion.leading),
            Unit::Pixel => {
                if conversion.pixels_per_inch > 0.0 {
                    Some(self.amount * 72.0 / conversion.pixels_per_inch)
                } else {
                    None
                }
            }
            Unit::Error => None,
        }
    }
}

/// Parses a measure starting at `pos`.
///
/// The grammar is an optional sign, digits, an optional fractional part, and then
///     an optional two letter unit abbreviation.
/// At least one digit is required.
/// Returns the measure and the number of characters consumed,
///     or `None` if there is no number at `pos`.
///
/// ```
/// # use quill::parse::measure::*;
/// let chars: Vec<char> = "-2.5cm]".chars().collect();
/// assert_eq!(parse_measure(&chars, 0), Some((Measure::new(-2.5, Unit::Cm), 6)));
/// ```
pub fn parse_measure(chars: &[char], pos: usize) -> Option<(Measure, usize)> {
    let mut i = pos;
    let mut literal = String::new();
    if let Some(c @ ('+' | '-')) = chars.get(i) {
        literal.push(*c);
        i += 1;
    }
    let mut num_digits = 0_usize;
    let mut seen_point = false;
    while let Some(&c) = chars.get(i) {
        match c {
            '0'..='9' => num_digits += 1,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
        literal.push(c);
        i += 1;
    }
    if num_digits == 0 {
        return None;
    }
    // A trailing point like `12.` is accepted by the float parser.
    let amount: f32 = literal.parse().ok()?;
    let unit = match (chars.get(i), chars.get(i + 1)) {
        (Some(a), Some(b)) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
            let abbreviation: String = [*a, *b].iter().collect();
            i += 2;
            Unit::from_abbreviation(&abbreviation.to_ascii_lowercase())
        }
        (Some(a), _) if a.is_ascii_alphabetic() => {
            i += 1;
            Unit::Error
        }
        _ => Unit::None,
    };
    Some((Measure { amount, unit }, i - pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<(Measure, usize)> {
        let chars: Vec<char> = s.chars().collect();
        parse_measure(&chars, 0)
    }

    macro_rules! measure_tests {
        ( $( ($name: ident, $input: expr, $amount: expr, $unit: expr, $consumed: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(parse($input), Some((Measure::new($amount, $unit), $consumed)));
                }
            )+
        };
    }

    measure_tests!(
        (points, "12pt]", 12.0, Unit::Point, 4),
        (inches, "1in", 1.0, Unit::Inch, 3),
        (centimeters, "2.54cm|", 2.54, Unit::Cm, 6),
        (lines, "2li", 2.0, Unit::Line, 3),
        (pixels, "96px", 96.0, Unit::Pixel, 4),
        (no_unit, "14]", 14.0, Unit::None, 2),
        (unknown_unit, "3zz]", 3.0, Unit::Error, 3),
        (single_letter_unit, "3p]", 3.0, Unit::Error, 2),
        (upper_case_unit, "12PT", 12.0, Unit::Point, 4),
        (negative, "-4pt", -4.0, Unit::Point, 4),
        (positive_sign, "+4pt", 4.0, Unit::Point, 4),
        (leading_point, ".5in", 0.5, Unit::Inch, 4),
        (trailing_point, "5.pt", 5.0, Unit::Point, 4),
    );

    #[test]
    fn no_digits() {
        assert_eq!(parse("pt"), None);
        assert_eq!(parse("-"), None);
        assert_eq!(parse("."), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn starts_mid_buffer() {
        let chars: Vec<char> = "[leading:12pt]".chars().collect();
        assert_eq!(
            parse_measure(&chars, 9),
            Some((Measure::new(12.0, Unit::Point), 4))
        );
    }

    const CONVERSION: Conversion = Conversion {
        pixels_per_inch: 96.0,
        leading: 14.0,
    };

    #[test]
    fn conversions_to_points() {
        assert_eq!(Measure::new(1.0, Unit::Inch).to_points(&CONVERSION), Some(72.0));
        let cm = Measure::new(2.54, Unit::Cm).to_points(&CONVERSION).unwrap();
        assert!((cm - 72.0).abs() < 1e-4);
        assert_eq!(Measure::new(96.0, Unit::Pixel).to_points(&CONVERSION), Some(72.0));
        assert_eq!(Measure::new(7.0, Unit::None).to_points(&CONVERSION), Some(7.0));
        assert_eq!(Measure::new(7.0, Unit::Error).to_points(&CONVERSION), None);
    }

    #[test]
    fn line_unit_follows_current_leading() {
        let one_line = Measure::new(1.0, Unit::Line);
        assert_eq!(one_line.to_points(&CONVERSION), Some(14.0));
        let wider = Conversion {
            leading: 20.0,
            ..CONVERSION
        };
        assert_eq!(one_line.to_points(&wider), Some(20.0));
    }
}
