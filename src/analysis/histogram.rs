//! Word-count histograms rendered as text bars

use std::fmt::Write as _;

use serde::Serialize;

use super::table::NoteTable;

/// Bin count used when none is given
pub const DEFAULT_BINS: usize = 50;

/// Equal-width bins over the range of the data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges; every bin is half-open except the last
    pub edges: Vec<f64>,

    /// Number of values in each bin
    pub counts: Vec<usize>,
}

/// Bin `values` into `bins` equal-width bins between their minimum and maximum
///
/// When every value is equal the range is widened by one half on each side.
pub fn histogram(values: &[usize], bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let min = *values.iter().min()? as f64;
    let max = *values.iter().max()? as f64;
    let (low, high) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = (high - low) / bins as f64;
    let edges = (0..=bins).map(|i| low + width * i as f64).collect();

    let mut counts = vec![0; bins];
    for &value in values {
        let index = ((value as f64 - low) / width) as usize;
        counts[index.min(bins - 1)] += 1;
    }

    Some(Histogram { edges, counts })
}

impl Histogram {
    /// Render one line per bin with a bar scaled to `width` characters
    ///
    /// With `log_scale` the bar length follows `ln(1 + count)`, which keeps
    /// sparse bins visible next to dominant ones.
    pub fn render(&self, width: usize, log_scale: bool) -> String {
        let scale = |count: usize| {
            if log_scale {
                (count as f64).ln_1p()
            } else {
                count as f64
            }
        };
        let peak = self.counts.iter().copied().map(scale).fold(0.0, f64::max);

        let mut out = String::new();
        for (i, &count) in self.counts.iter().enumerate() {
            let length = if peak > 0.0 {
                (scale(count) / peak * width as f64).round() as usize
            } else {
                0
            };
            let _ = writeln!(
                out,
                "{:>9.1} - {:<9.1} | {:<width$} {}",
                self.edges[i],
                self.edges[i + 1],
                "#".repeat(length),
                count,
                width = width
            );
        }
        out
    }
}

impl NoteTable {
    /// Histogram of the `word_count` column
    pub fn histogram(&self, bins: usize) -> Option<Histogram> {
        histogram(&self.word_counts(), bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bins() {
        let hist = histogram(&[0, 1, 2, 3, 4, 10], 5).unwrap();

        assert_eq!(hist.edges, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(hist.counts, vec![2, 2, 1, 0, 1]);
        assert_eq!(hist.counts.iter().sum::<usize>(), 6);
    }

    #[test]
    fn test_histogram_constant_values() {
        let hist = histogram(&[3, 3, 3], 2).unwrap();

        assert_eq!(hist.edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(hist.counts, vec![0, 3]);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram(&[], DEFAULT_BINS).is_none());
        assert!(histogram(&[1, 2], 0).is_none());
    }

    #[test]
    fn test_render() {
        let hist = histogram(&[1, 1, 1, 1, 2], 2).unwrap();

        let linear = hist.render(8, false);
        let lines: Vec<&str> = linear.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("| ######## 4"));
        assert!(lines[1].contains("| ##       1"));

        let log = hist.render(8, true);
        assert!(log.lines().nth(1).unwrap().contains("| ###      1"));
    }
}
