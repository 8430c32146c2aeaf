//! Most-common-word ranking

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::table::NoteTable;

// A whitespace-free run trimmed to its first and last word characters
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\S+\b").expect("word pattern is valid"));

/// Lower-cased word tokens of `text`, in order
///
/// Each whitespace-delimited token loses its leading and trailing non-word
/// characters; tokens without any word character are dropped.
pub fn tokenize_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The `n` most frequent words across all notes
///
/// Ties keep the order in which the words were first seen.
pub fn most_common<'a>(notes: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    let text = notes.into_iter().collect::<Vec<_>>().join(" ");

    let mut ranking: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for word in tokenize_words(&text) {
        match positions.get(&word) {
            Some(&index) => ranking[index].1 += 1,
            None => {
                positions.insert(word.clone(), ranking.len());
                ranking.push((word, 1));
            }
        }
    }

    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking.truncate(n);
    ranking
}

impl NoteTable {
    /// The `n` most frequent words in the `note` column
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        most_common(self.notes(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words_trims_punctuation() {
        assert_eq!(
            tokenize_words("Hello, World! (W&L.) -- a.b"),
            vec!["hello", "world", "w&l", "a.b"]
        );
    }

    #[test]
    fn test_most_common_counts_across_notes() {
        let notes = ["The campus. the Library", "library hours", "The end"];
        let ranking = most_common(notes, 2);

        assert_eq!(
            ranking,
            vec![("the".to_string(), 3), ("library".to_string(), 2)]
        );
    }

    #[test]
    fn test_most_common_ties_keep_first_seen_order() {
        let ranking = most_common(["beta alpha gamma alpha beta"], 10);

        assert_eq!(
            ranking,
            vec![
                ("beta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_most_common_empty() {
        assert!(most_common(Vec::<&str>::new(), 5).is_empty());
        assert!(most_common(["words here"], 0).is_empty());
    }
}
