//! Length and keyword filtering, and export of the filtered corpus

use std::path::Path;

use tracing::info;

use super::table::{NoteRow, NoteTable};
use crate::corpus::{CorpusError, write_corpus};

/// Criteria a row must meet to survive filtering
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Rows with fewer words are dropped
    pub min_word_count: usize,

    /// Rows with more words are dropped
    pub max_word_count: usize,

    /// When non-empty, a row must contain at least one of these as a substring
    pub keywords: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_word_count: 0,
            max_word_count: 1000,
            keywords: Vec::new(),
        }
    }
}

impl FilterOptions {
    /// Set the minimum word count
    pub fn min_word_count(mut self, min_word_count: usize) -> Self {
        self.min_word_count = min_word_count;
        self
    }

    /// Set the maximum word count
    pub fn max_word_count(mut self, max_word_count: usize) -> Self {
        self.max_word_count = max_word_count;
        self
    }

    /// Set the keywords; an empty list disables the keyword filter
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a row passes the word-count range and the keyword filter
    pub fn matches(&self, row: &NoteRow) -> bool {
        row.word_count >= self.min_word_count
            && row.word_count <= self.max_word_count
            && (self.keywords.is_empty()
                || self.keywords.iter().any(|k| row.note.contains(k.as_str())))
    }
}

impl NoteTable {
    /// Keep the rows that match `options`, in order
    pub fn filter(self, options: &FilterOptions) -> NoteTable {
        let before = self.len();
        let rows: Vec<NoteRow> = self
            .into_rows()
            .into_iter()
            .filter(|row| options.matches(row))
            .collect();
        info!("Filter kept {} of {} rows", rows.len(), before);
        NoteTable::from_rows(rows)
    }
}

/// Write a table as `{"note", "url"}` JSON Lines, replacing any previous file
pub async fn export_table(path: impl AsRef<Path>, table: &NoteTable) -> Result<(), CorpusError> {
    write_corpus(path, &table.to_records()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{LoadOptions, SentenceRecord, load_corpus};

    fn table(notes: &[&str]) -> NoteTable {
        NoteTable::from_records(notes.iter().enumerate().map(|(i, note)| SentenceRecord {
            note: note.to_string(),
            url: format!("https://x/{}", i),
        }))
    }

    fn sample() -> NoteTable {
        let long = "word ".repeat(45);
        let notes = vec![
            "one",
            "two words",
            "three words here",
            "the library is open late",
            "financial aid deadlines are in january",
            long.as_str(),
            "  ",
            "athletics teams compete in the odac conference",
            "w&l was founded in 1749",
            "a b c d e f g h i j k l m n o p q r s t u v w x y z a b c d e f g h i j k l m n",
        ];
        table(&notes)
    }

    #[test]
    fn test_filter_word_count_range() {
        let original = sample();
        let options = FilterOptions::default()
            .min_word_count(3)
            .max_word_count(40);
        let filtered = original.clone().filter(&options);

        assert!(
            filtered
                .rows()
                .iter()
                .all(|r| r.word_count >= 3 && r.word_count <= 40)
        );
        assert_eq!(filtered.len(), 6);

        for row in filtered.rows() {
            assert!(original.rows().contains(row));
        }
        let dropped: Vec<usize> = original
            .rows()
            .iter()
            .filter(|r| !filtered.rows().contains(r))
            .map(|r| r.word_count)
            .collect();
        assert!(dropped.iter().all(|&c| c < 3 || c > 40));
    }

    #[test]
    fn test_filter_keywords() {
        let options = FilterOptions::default().keywords(["library", "odac"]);
        let filtered = sample().filter(&options);

        let notes: Vec<&str> = filtered.notes().collect();
        assert_eq!(
            notes,
            vec![
                "the library is open late",
                "athletics teams compete in the odac conference"
            ]
        );
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        let options = FilterOptions::default().keywords(["Library"]);
        assert!(sample().filter(&options).is_empty());
    }

    #[test]
    fn test_filter_is_monotonic_for_nested_ranges() {
        let ranges = [(0, 1000), (1, 45), (3, 40), (3, 10), (5, 5)];
        for (i, &(outer_min, outer_max)) in ranges.iter().enumerate() {
            let outer = sample().filter(
                &FilterOptions::default()
                    .min_word_count(outer_min)
                    .max_word_count(outer_max),
            );
            for &(inner_min, inner_max) in &ranges[i..] {
                let inner = outer.clone().filter(
                    &FilterOptions::default()
                        .min_word_count(inner_min)
                        .max_word_count(inner_max),
                );
                assert!(inner.rows().iter().all(|r| outer.rows().contains(r)));
            }
        }
    }

    #[tokio::test]
    async fn test_export_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_notes.jsonl");

        let filtered = sample().filter(&FilterOptions::default().keywords(["1749"]));
        export_table(&path, &filtered).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            content,
            "{\"note\":\"w&l was founded in 1749\",\"url\":\"https://x/8\"}\n"
        );

        let reloaded = load_corpus(&path, &LoadOptions::default()).await.unwrap();
        assert_eq!(NoteTable::from_records(reloaded), filtered);
    }
}
