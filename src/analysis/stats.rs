//! Summary statistics of word counts

use serde::Serialize;

use super::table::NoteTable;

/// Count, mean, spread and quartiles of a word-count column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCountSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q1: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q3: f64,
    pub max: f64,
}

/// Quantile of sorted values, interpolating linearly between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// Summarize a column of word counts; `None` when it is empty
pub fn describe(values: &[usize]) -> Option<WordCountSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let variance =
            sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    Some(WordCountSummary {
        count,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

impl NoteTable {
    /// Summary statistics of the `word_count` column
    pub fn describe(&self) -> Option<WordCountSummary> {
        describe(&self.word_counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let summary = describe(&[1, 2, 3, 4]).unwrap();

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert!((summary.std.unwrap() - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q3, 3.25);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn test_describe_unsorted_input() {
        let summary = describe(&[10, 0, 5]).unwrap();
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.max, 10.0);
    }

    #[test]
    fn test_describe_single_and_empty() {
        let summary = describe(&[7]).unwrap();
        assert_eq!(summary.std, None);
        assert_eq!(summary.q1, 7.0);
        assert_eq!(summary.q3, 7.0);

        assert!(describe(&[]).is_none());
    }

    #[test]
    fn test_summary_json_keys() {
        let json = serde_json::to_value(describe(&[1, 2]).unwrap()).unwrap();
        assert_eq!(json["50%"], 1.5);
        assert_eq!(json["count"], 2);
    }
}
