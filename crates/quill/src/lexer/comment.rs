//! Comment recognition.
//!
//! Quill has two kinds of comments.
//!
//! A *line comment* is a line whose first non-whitespace characters are `%%`.
//! The whole line is ignored.
//!
//! A *block comment* opens with `[` followed by a run of one or more `%` characters,
//!     and closes with a run of the same number of `%` characters followed by `]`.
//! Block comments can span many lines.
//! Because the closer must have exactly as many `%` characters as the opener,
//!     differently sized block comments can be nested:
//!
//! ```text
//! [%%
//!   [% this inner comment does not end the outer one %]
//! %%]
//! ```

use crate::source::Source;

/// Marker that starts a line comment.
pub const LINE_COMMENT_MARKER: &str = "%%";

/// State of an open block comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment {
    /// The marker that closes this comment, like `%%]`.
    pub closer: String,
    /// Where the comment was opened.
    pub opened_at: Source,
}

/// Returns true if the line is a line comment.
///
/// If a block comment is open, a line that contains the block's closer
///     is not a line comment even though it starts with `%%`.
pub fn is_line_comment(line: &[char], open_block: Option<&BlockComment>) -> bool {
    let first = match line.iter().position(|c| !c.is_whitespace()) {
        None => return false,
        Some(first) => first,
    };
    let trimmed = &line[first..];
    if !starts_with(trimmed, LINE_COMMENT_MARKER) {
        return false;
    }
    match open_block {
        None => true,
        Some(block) => find_closing_marker(trimmed, 0, &block.closer).is_none(),
    }
}

/// Returns true if the characters at `pos` open a block comment.
pub fn is_block_comment_start(chars: &[char], pos: usize) -> bool {
    chars.get(pos) == Some(&'[') && chars.get(pos + 1) == Some(&'%')
}

/// Computes the marker that closes the block comment opened at `open_pos`.
///
/// Returns `None` if there is no block comment opener at the position.
///
/// ```
/// # use quill::lexer::comment::compute_closing_marker;
/// let chars: Vec<char> = "[%%% comment".chars().collect();
/// assert_eq!(compute_closing_marker(&chars, 0), Some("%%%]".to_string()));
/// ```
pub fn compute_closing_marker(chars: &[char], open_pos: usize) -> Option<String> {
    if !is_block_comment_start(chars, open_pos) {
        return None;
    }
    let count = chars[open_pos + 1..]
        .iter()
        .take_while(|c| **c == '%')
        .count();
    let mut closer = "%".repeat(count);
    closer.push(']');
    Some(closer)
}

/// Finds the first occurrence of the closer at or after `from`.
///
/// The `%` run of the occurrence must have exactly the closer's length;
///     for example `%%]` does not close a `%]` comment.
/// Returns the index of the first character of the occurrence.
pub fn find_closing_marker(chars: &[char], from: usize, closer: &str) -> Option<usize> {
    let closer: Vec<char> = closer.chars().collect();
    if closer.is_empty() {
        return None;
    }
    let mut i = from;
    while i + closer.len() <= chars.len() {
        if chars[i..i + closer.len()] == closer[..] && (i == 0 || chars[i - 1] != '%') {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn starts_with(chars: &[char], prefix: &str) -> bool {
    let mut i = 0;
    for p in prefix.chars() {
        if chars.get(i) != Some(&p) {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn block(closer: &str) -> BlockComment {
        BlockComment {
            closer: closer.to_string(),
            opened_at: Source::new(0, 1),
        }
    }

    #[test]
    fn line_comments() {
        assert!(is_line_comment(&chars("%% a comment"), None));
        assert!(is_line_comment(&chars("   %%indented"), None));
        assert!(!is_line_comment(&chars("% single"), None));
        assert!(!is_line_comment(&chars("text %% later"), None));
        assert!(!is_line_comment(&chars(""), None));
        assert!(!is_line_comment(&chars("   "), None));
    }

    #[test]
    fn block_closer_is_not_a_line_comment() {
        let open = block("%%]");
        assert!(!is_line_comment(&chars("%%] text"), Some(&open)));
        assert!(is_line_comment(&chars("%% text"), Some(&open)));
        let open = block("%]");
        assert!(is_line_comment(&chars("%%] text"), Some(&open)));
    }

    #[test]
    fn closer_later_in_line_is_not_a_line_comment() {
        let open = block("%%]");
        assert!(!is_line_comment(&chars("%% note %%] text"), Some(&open)));
        assert!(is_line_comment(&chars("%% note %%%] text"), Some(&open)));
        assert!(is_line_comment(&chars("%% note %%] text"), None));
    }

    #[test]
    fn closing_marker_has_matching_count() {
        for k in 1..6 {
            let opener = format!["[{} text", "%".repeat(k)];
            let want = format!["{}]", "%".repeat(k)];
            assert_eq!(compute_closing_marker(&chars(&opener), 0), Some(want));
        }
    }

    #[test]
    fn closing_marker_mid_line() {
        assert_eq!(
            compute_closing_marker(&chars("abc [%% x"), 4),
            Some("%%]".to_string())
        );
        assert_eq!(compute_closing_marker(&chars("abc [x"), 4), None);
        assert_eq!(compute_closing_marker(&chars("["), 0), None);
    }

    #[test]
    fn shorter_closer_does_not_close() {
        let line = chars("text %%] more");
        assert_eq!(find_closing_marker(&line, 0, "%%%%]"), None);
        assert_eq!(find_closing_marker(&line, 0, "%%]"), Some(5));
    }

    #[test]
    fn longer_run_does_not_close() {
        let line = chars("a %%%] b %] c");
        assert_eq!(find_closing_marker(&line, 0, "%]"), Some(9));
        assert_eq!(find_closing_marker(&line, 0, "%%]"), None);
        assert_eq!(find_closing_marker(&line, 0, "%%%]"), Some(2));
    }

    #[test]
    fn search_starts_at_from() {
        let line = chars("%] x %]");
        assert_eq!(find_closing_marker(&line, 1, "%]"), Some(5));
    }
}
