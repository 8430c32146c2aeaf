//! Sentence segmentation for corpus loading
//!
//! A sentence ends at a whitespace character that directly follows `.` or `?`.
//! Two look-behind rules suppress a split:
//!
//! - word char, `.`, word char, any char (acronyms and decimals such as `U.S.` or `3.5.`)
//! - uppercase, lowercase, `.` (abbreviations such as `Dr.` or `Mr.`)
//!
//! The whitespace character at a split is consumed, fragments are trimmed and
//! empty fragments are dropped. Casing is never changed here.

use crate::corpus::{PageRecord, SentenceRecord};

/// How records are turned into table rows on load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// One row per record, carrying the full note
    #[default]
    WholeNote,

    /// One row per sentence of the note
    Sentences,
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_boundary(chars: &[(usize, char)], index: usize) -> bool {
    let before = |n: usize| index.checked_sub(n).map(|i| chars[i].1);

    let terminal = match before(1) {
        Some(c @ ('.' | '?')) => c,
        _ => return false,
    };

    if let (Some(a), Some('.'), Some(b)) = (before(4), before(3), before(2)) {
        if is_word(a) && is_word(b) {
            return false;
        }
    }

    if terminal == '.' {
        if let (Some(a), Some(b)) = (before(3), before(2)) {
            if a.is_ascii_uppercase() && b.is_ascii_lowercase() {
                return false;
            }
        }
    }

    true
}

fn push_fragment(fragments: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
}

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut fragments = Vec::new();
    let mut start = 0;

    for (index, &(offset, c)) in chars.iter().enumerate() {
        if c.is_whitespace() && is_boundary(&chars, index) {
            push_fragment(&mut fragments, &text[start..offset]);
            start = offset + c.len_utf8();
        }
    }
    push_fragment(&mut fragments, &text[start..]);

    fragments
}

/// Turn one page record into rows according to the load mode
pub fn segment(record: PageRecord, mode: LoadMode) -> Vec<SentenceRecord> {
    match mode {
        LoadMode::WholeNote => {
            if record.note.trim().is_empty() {
                Vec::new()
            } else {
                vec![record.into()]
            }
        }
        LoadMode::Sentences => split_sentences(&record.note)
            .into_iter()
            .map(|note| SentenceRecord {
                note,
                url: record.url.clone(),
            })
            .collect(),
    }
}
