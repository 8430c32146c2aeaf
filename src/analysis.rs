//! # Corpus Analysis Module
//!
//! Exploratory analysis over a loaded corpus: word counts, summary statistics,
//! the most common words, word-count histograms, and the length/keyword filter
//! used to prepare a cleaner corpus for fine-tuning.
//!
//! All reporting operations are read-only. Filtering consumes a table and
//! returns a new one, which can then be exported with `export_table`.

mod filter;
mod frequency;
mod histogram;
mod stats;
mod table;

pub use filter::{FilterOptions, export_table};
pub use frequency::{most_common, tokenize_words};
pub use histogram::{DEFAULT_BINS, Histogram, histogram};
pub use stats::{WordCountSummary, describe};
pub use table::{NoteRow, NoteTable, word_count};
