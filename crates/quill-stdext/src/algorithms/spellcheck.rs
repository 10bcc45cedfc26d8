//! Spell checking using Levenshtein distance
//!
//! The [find_close_words] function ranks the words in a dictionary by their
//!     [Levenshtein distance](https://en.wikipedia.org/wiki/Levenshtein_distance)
//!     to a search word.
//! It is used to suggest a registered command when a document contains a misspelled one.
//!
//! The distance is computed with the standard dynamic programming recurrence,
//!     keeping only two rows of the matrix in memory.

/// A dictionary word together with its distance to the search word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub distance: usize,
}

/// Find words in the provided dictionary that are close to the search word.
///
/// Only words at distance at most `max_distance` are returned.
/// The result is sorted with the closest words first; ties are broken alphabetically.
///
/// ```
/// # use quill_stdext::algorithms::spellcheck::find_close_words;
/// let dictionary = ["[font|face:", "[font|size:", "[align:"];
/// let close = find_close_words(dictionary, "[font|fase:", 2);
/// assert_eq!(close[0].word, "[font|face:");
/// assert_eq!(close[0].distance, 1);
/// ```
pub fn find_close_words<'a, I>(dictionary: I, word: &str, max_distance: usize) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut suggestions: Vec<Suggestion> = dictionary
        .into_iter()
        .map(|candidate| Suggestion {
            word: candidate.to_string(),
            distance: levenshtein_distance(word, candidate),
        })
        .filter(|suggestion| suggestion.distance <= max_distance)
        .collect();
    suggestions.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.word.cmp(&b.word)));
    suggestions
}

/// Returns the Levenshtein distance between two strings, measured in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current: Vec<usize> = vec![0; b.len() + 1];
    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! distance_tests {
        ( $( ($name: ident, $a: expr, $b: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(levenshtein_distance($a, $b), $want);
                    assert_eq!(levenshtein_distance($b, $a), $want);
                }
            )+
        };
    }

    distance_tests!(
        (both_empty, "", "", 0),
        (one_empty, "", "abc", 3),
        (identical, "[align:", "[align:", 0),
        (one_substitution, "[fsize:", "[fsixe:", 1),
        (one_insertion, "[leading:", "[leadding:", 1),
        (kitten_sitting, "kitten", "sitting", 3),
        (non_ascii, "ü", "u", 1),
    );

    #[test]
    fn far_words_are_filtered() {
        let close = find_close_words(["[b]", "[leading:"], "[bogus:", 2);
        assert!(close.is_empty());
    }

    #[test]
    fn ties_are_sorted_alphabetically() {
        let close = find_close_words(["[u]", "[i]", "[b]"], "[x]", 1);
        let words: Vec<&str> = close.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["[b]", "[i]", "[u]"]);
    }
}
