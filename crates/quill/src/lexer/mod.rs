//! Lexical recognizers used by the tokenizer.
//!
//! This module contains the command-start detector [is_command].
//! The submodules recognize [comments](comment) and [system macros](macros).

pub mod comment;
pub mod macros;

/// The escape character. A `[` immediately after it never starts a command.
pub const ESCAPE: char = '/';

/// Returns true if the `[` at `pos` starts a command.
///
/// A `[` does not start a command if:
///
/// - it is the last character of the line,
/// - the next character is whitespace, a digit or a control character, or
/// - it is immediately preceded by the [ESCAPE] character.
///
/// The function is total: out of range positions and characters other than `[` return false.
///
/// ```
/// # use quill::lexer::is_command;
/// let chars: Vec<char> = "[x] [ ] /[y] [2]".chars().collect();
/// assert!(is_command(&chars, 0));
/// assert!(!is_command(&chars, 4));
/// assert!(!is_command(&chars, 9));
/// assert!(!is_command(&chars, 13));
/// ```
pub fn is_command(chars: &[char], pos: usize) -> bool {
    if chars.get(pos) != Some(&'[') {
        return false;
    }
    let next = match chars.get(pos + 1) {
        None => return false,
        Some(next) => *next,
    };
    if next.is_whitespace() || next.is_ascii_digit() || next.is_control() {
        return false;
    }
    !(pos > 0 && chars[pos - 1] == ESCAPE)
}
