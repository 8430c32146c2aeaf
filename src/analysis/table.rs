//! In-memory note table with derived word counts

use serde::Serialize;

use crate::corpus::SentenceRecord;

/// Number of whitespace-delimited tokens in `text`
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// One row of the note table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRow {
    /// Sentence or whole note
    pub note: String,

    /// URL of the page the note came from
    pub url: String,

    /// Whitespace-delimited token count of `note`
    pub word_count: usize,
}

impl From<SentenceRecord> for NoteRow {
    fn from(record: SentenceRecord) -> Self {
        let word_count = word_count(&record.note);
        NoteRow {
            note: record.note,
            url: record.url,
            word_count,
        }
    }
}

/// Rows of a loaded corpus, in corpus order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteTable {
    rows: Vec<NoteRow>,
}

impl FromIterator<SentenceRecord> for NoteTable {
    fn from_iter<I: IntoIterator<Item = SentenceRecord>>(iter: I) -> Self {
        NoteTable {
            rows: iter.into_iter().map(NoteRow::from).collect(),
        }
    }
}

impl NoteTable {
    /// Build a table from loaded records
    pub fn from_records(records: impl IntoIterator<Item = SentenceRecord>) -> Self {
        records.into_iter().collect()
    }

    pub(crate) fn from_rows(rows: Vec<NoteRow>) -> Self {
        NoteTable { rows }
    }

    pub fn rows(&self) -> &[NoteRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> &[NoteRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn word_counts(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.word_count).collect()
    }

    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.note.as_str())
    }

    /// Rows in the stored record shape, without the derived column
    pub fn to_records(&self) -> Vec<SentenceRecord> {
        self.rows
            .iter()
            .map(|r| SentenceRecord {
                note: r.note.clone(),
                url: r.url.clone(),
            })
            .collect()
    }

    pub(crate) fn into_rows(self) -> Vec<NoteRow> {
        self.rows
    }
}
