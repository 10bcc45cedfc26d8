//! String parameters, like the `Arial` in `[font|face:Arial]`.
//!
//! A string parameter is either *bare* or *braced*.
//! A bare string runs up to the first terminator character (normally `]`).
//! A braced string starts with a run of `n` opening braces and ends at the
//!     first run of `n` closing braces that is not closing a brace opened inside the string:
//!
//! ```
//! # use quill::parse::string::parse_string;
//! let chars: Vec<char> = "{{a}b}}]".chars().collect();
//! assert_eq!(parse_string(&chars, 0, &[']']), Ok(("a}b".to_string(), 7)));
//! ```
//!
//! Braced strings are needed because font names and cover text may themselves
//!     contain brackets or braces.

use std::fmt;

/// Error returned when a string parameter cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringError {
    /// The input ended before a terminator.
    Unterminated,
    /// The string between the delimiters is empty.
    Empty,
    /// A braced string was followed by a character other than a terminator.
    TrailingCharacters,
}

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringError::Unterminated => write!(f, "the string parameter is not terminated"),
            StringError::Empty => write!(f, "the string parameter is empty"),
            StringError::TrailingCharacters => {
                write!(f, "unexpected characters after the closing braces")
            }
        }
    }
}

impl std::error::Error for StringError {}

/// Parses a string parameter starting at `pos`.
///
/// On success, returns the string and the number of characters consumed.
/// The terminator itself is not consumed;
///     for braced strings the caller can rely on the next character being a terminator.
pub fn parse_string(
    chars: &[char],
    pos: usize,
    terminators: &[char],
) -> Result<(String, usize), StringError> {
    match chars.get(pos) {
        Some('{') => parse_braced(chars, pos, terminators),
        _ => parse_bare(chars, pos, terminators),
    }
}

fn parse_bare(
    chars: &[char],
    pos: usize,
    terminators: &[char],
) -> Result<(String, usize), StringError> {
    let end = chars[pos.min(chars.len())..]
        .iter()
        .position(|c| terminators.contains(c))
        .map(|offset| pos + offset)
        .ok_or(StringError::Unterminated)?;
    if end == pos {
        return Err(StringError::Empty);
    }
    Ok((chars[pos..end].iter().collect(), end - pos))
}

fn parse_braced(
    chars: &[char],
    pos: usize,
    terminators: &[char],
) -> Result<(String, usize), StringError> {
    let n = chars[pos..].iter().take_while(|c| **c == '{').count();
    let start = pos + n;
    let mut depth = 0_usize;
    let mut i = start;
    while let Some(&c) = chars.get(i) {
        match c {
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            '}' if is_closing_run(chars, i, n) => {
                let value: String = chars[start..i].iter().collect();
                let end = i + n;
                return match chars.get(end) {
                    Some(t) if terminators.contains(t) => Ok((value, end - pos)),
                    None => Err(StringError::Unterminated),
                    Some(_) => Err(StringError::TrailingCharacters),
                };
            }
            _ => {}
        }
        i += 1;
    }
    Err(StringError::Unterminated)
}

fn is_closing_run(chars: &[char], i: usize, n: usize) -> bool {
    chars.len() >= i + n && chars[i..i + n].iter().all(|c| *c == '}')
}
