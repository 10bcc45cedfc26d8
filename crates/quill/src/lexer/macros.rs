//! System macros.
//!
//! Quill has a small, closed set of system macros that expand to text while tokenizing.
//! A macro is referenced either as `$name` or as `[name]`:
//!
//! | name       | expansion |
//! |------------|-----------|
//! | `_version` | the Quill version |
//! | `_date`    | the date the document was compiled, like `2024-03-01` |
//! | `_time`    | the time the document was compiled, like `14:05` |
//! | `_file`    | the name of the file being compiled |
//! | `_line`    | the current line number |
//!
//! Expansions are never rescanned, so macros cannot produce further macros or commands.
//! There are no user defined macros.

#[cfg(feature = "time")]
use chrono::prelude::*;

use crate::source::Source;

/// Names of all the system macros.
pub const NAMES: [&str; 5] = ["_version", "_date", "_time", "_file", "_line"];

/// Expander for the system macros.
///
/// The date and time are captured when the expander is created,
///     so every reference in one compilation expands to the same value.
#[derive(Debug, Clone)]
pub struct MacroExpander {
    date: String,
    time: String,
    file_name: Option<String>,
}

impl MacroExpander {
    /// Create a new expander with the date and time initialized to the current time.
    #[cfg(feature = "time")]
    pub fn new() -> MacroExpander {
        let dt: DateTime<Local> = Local::now();
        MacroExpander::new_with_values(
            dt.format("%Y-%m-%d").to_string(),
            dt.format("%H:%M").to_string(),
        )
    }

    #[cfg(not(feature = "time"))]
    pub fn new() -> MacroExpander {
        MacroExpander::new_with_values("0000-00-00".into(), "00:00".into())
    }

    /// Create a new expander with the provided date and time.
    ///
    /// This is useful when output must be reproducible, e.g. in tests.
    pub fn new_with_values(date: String, time: String) -> MacroExpander {
        MacroExpander {
            date,
            time,
            file_name: None,
        }
    }

    /// Sets the name that `_file` expands to.
    ///
    /// If no name is set, `_file` expands to the file number.
    pub fn set_file_name<T: Into<String>>(&mut self, file_name: T) {
        self.file_name = Some(file_name.into());
    }

    /// Returns the expansion of the named macro, or `None` if the name is not a system macro.
    pub fn expand(&self, name: &str, source: Source) -> Option<String> {
        Some(match name {
            "_version" => crate::VERSION.to_string(),
            "_date" => self.date.clone(),
            "_time" => self.time.clone(),
            "_file" => match &self.file_name {
                None => source.file_number.to_string(),
                Some(file_name) => file_name.clone(),
            },
            "_line" => source.line_number.to_string(),
            _ => return None,
        })
    }

    /// Expands a macro reference starting at `pos`.
    ///
    /// Returns the expansion and the number of characters the reference occupies,
    ///     or `None` if there is no system macro reference at the position.
    ///
    /// ```
    /// # use quill::lexer::macros::MacroExpander;
    /// # use quill::source::Source;
    /// let expander = MacroExpander::new_with_values("2024-03-01".into(), "09:30".into());
    /// let chars: Vec<char> = "on [_date] at $_time".chars().collect();
    /// let source = Source::new(0, 1);
    /// assert_eq!(expander.expand_at(&chars, 3, source), Some(("2024-03-01".to_string(), 7)));
    /// assert_eq!(expander.expand_at(&chars, 14, source), Some(("09:30".to_string(), 6)));
    /// assert_eq!(expander.expand_at(&chars, 0, source), None);
    /// ```
    pub fn expand_at(&self, chars: &[char], pos: usize, source: Source) -> Option<(String, usize)> {
        let (name, consumed) = match chars.get(pos)? {
            '$' => {
                let name = read_name(chars, pos + 1);
                let consumed = 1 + name.chars().count();
                (name, consumed)
            }
            '[' => {
                let name = read_name(chars, pos + 1);
                let len = name.chars().count();
                if chars.get(pos + 1 + len) != Some(&']') {
                    return None;
                }
                (name, len + 2)
            }
            _ => return None,
        };
        self.expand(&name, source).map(|expansion| (expansion, consumed))
    }
}

impl Default for MacroExpander {
    fn default() -> Self {
        Self::new()
    }
}

fn read_name(chars: &[char], start: usize) -> String {
    if chars.get(start) != Some(&'_') {
        return String::new();
    }
    chars[start..]
        .iter()
        .take_while(|c| **c == '_' || c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander() -> MacroExpander {
        MacroExpander::new_with_values("2001-02-03".into(), "04:05".into())
    }

    macro_rules! expand_tests {
        ( $( ($name: ident, $input: expr, $pos: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let chars: Vec<char> = $input.chars().collect();
                    let got = expander().expand_at(&chars, $pos, Source::new(3, 17));
                    let want: Option<(&str, usize)> = $want;
                    assert_eq!(got, want.map(|(s, n)| (s.to_string(), n)));
                }
            )+
        };
    }

    expand_tests!(
        (dollar_date, "$_date", 0, Some(("2001-02-03", 6))),
        (bracket_time, "[_time]", 0, Some(("04:05", 7))),
        (line_number, "x $_line y", 2, Some(("17", 6))),
        (file_number_without_name, "[_file]", 0, Some(("3", 7))),
        (bracket_unclosed, "[_date", 0, None),
        (bracket_with_parameter, "[_date:x]", 0, None),
        (unknown_name, "$_nope", 0, None),
        (dollar_alone, "$ 5", 0, None),
        (dollar_without_underscore, "$date", 0, None),
        (not_a_reference, "date", 0, None),
        (followed_by_punctuation, "$_line.", 0, Some(("17", 6))),
    );

    #[test]
    fn version_is_crate_version() {
        let chars: Vec<char> = "$_version".chars().collect();
        assert_eq!(
            expander().expand_at(&chars, 0, Source::default()),
            Some((crate::VERSION.to_string(), 9))
        );
    }

    #[test]
    fn file_name_when_set() {
        let mut expander = expander();
        expander.set_file_name("chapter1.qd");
        assert_eq!(
            expander.expand("_file", Source::new(0, 1)),
            Some("chapter1.qd".to_string())
        );
    }

    #[test]
    fn every_name_expands() {
        for name in NAMES {
            assert!(expander().expand(name, Source::default()).is_some(), "{name}");
        }
    }
}
