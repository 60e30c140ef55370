//! Classification tally for generated inputs.
//!
//! Tags come from an arbitrary's classifier and are for reporting only; they
//! never influence the outcome of a run.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Occurrence count per classification tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl Distribution {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `tag`
    pub fn record(&mut self, tag: impl Into<String>) {
        *self.counts.entry(tag.into()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Occurrences of `tag`
    pub fn get(&self, tag: &str) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// Total number of recorded tags
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Tags in lexicographic order with their counts
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    /// Tags ordered by decreasing count, ties broken by tag
    pub fn by_frequency(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        entries
    }

    /// Share of `tag` among all recorded tags, in `[0, 1]`
    pub fn ratio(&self, tag: &str) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.get(tag) as f64 / self.total as f64
        }
    }

    /// Render one line per tag: `tag: count (percent%)`
    pub fn report(&self) -> String {
        let mut report = String::new();
        for (tag, count) in self.by_frequency() {
            let _ = writeln!(
                report,
                "{}: {} ({:.1}%)",
                tag,
                count,
                self.ratio(tag) * 100.0
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let mut dist = Distribution::new();
        assert!(dist.is_empty());

        dist.record("even");
        dist.record("odd");
        dist.record("even");

        assert_eq!(dist.get("even"), 2);
        assert_eq!(dist.get("odd"), 1);
        assert_eq!(dist.get("missing"), 0);
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.len(), 2);
    }

    #[test]
    fn test_by_frequency_ordering() {
        let mut dist = Distribution::new();
        for tag in ["b", "a", "c", "c", "b"] {
            dist.record(tag);
        }
        assert_eq!(dist.by_frequency(), vec![("b", 2), ("c", 2), ("a", 1)]);
    }

    #[test]
    fn test_report() {
        let mut dist = Distribution::new();
        dist.record("small");
        dist.record("small");
        dist.record("small");
        dist.record("large");

        assert_eq!(dist.report(), "small: 3 (75.0%)\nlarge: 1 (25.0%)\n");
        assert_eq!(Distribution::new().report(), "");
    }
}
