/// Fold the flat record list into the final per-hero summary.
use crate::extract::MatchRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Terminal artifact of a run. BTreeMap keeps the JSON key order
/// stable across runs.
#[derive(Debug, Serialize, PartialEq, Default)]
pub struct Summary {
    /// Cumulative seconds per hero name.
    pub heroes: BTreeMap<String, f64>,
    /// Total seconds across all matches.
    pub duration: f64,
    /// Number of records processed, failed extractions included.
    pub matches: usize,
}

/// Single pass over the records. Order-insensitive: the result is a sum
/// over a multiset, so any batch-induced reordering gives the same
/// summary.
pub fn summarize(records: &[MatchRecord]) -> Summary {
    let mut heroes: BTreeMap<String, f64> = BTreeMap::new();
    let mut duration = 0.0;

    for record in records {
        duration += record.duration;
        *heroes.entry(record.hero.clone()).or_insert(0.0) += record.duration;
    }

    Summary {
        heroes,
        duration,
        matches: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UNKNOWN_HERO;

    fn record(duration: f64, hero: &str) -> MatchRecord {
        MatchRecord {
            duration,
            hero: hero.to_string(),
        }
    }

    #[test]
    fn empty_input_gives_the_zero_summary() {
        let summary = summarize(&[]);
        assert!(summary.heroes.is_empty());
        assert_eq!(summary.duration, 0.0);
        assert_eq!(summary.matches, 0);
    }

    #[test]
    fn sums_per_hero_and_overall() {
        let records = vec![
            record(120.0, "Raynor"),
            record(80.0, "Raynor"),
            MatchRecord::sentinel(),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.heroes["Raynor"], 200.0);
        assert_eq!(summary.heroes[UNKNOWN_HERO], 0.0);
        assert_eq!(summary.duration, 200.0);
        assert_eq!(summary.matches, 3);
    }

    #[test]
    fn sentinel_records_are_counted_not_dropped() {
        let summary = summarize(&[MatchRecord::sentinel(), MatchRecord::sentinel()]);
        assert_eq!(summary.matches, 2);
        assert_eq!(summary.heroes[UNKNOWN_HERO], 0.0);
        assert_eq!(summary.heroes.len(), 1);
    }

    #[test]
    fn invariant_under_permutation() {
        let records = vec![
            record(10.0, "Abathur"),
            record(25.5, "Raynor"),
            record(3.25, "Abathur"),
            MatchRecord::sentinel(),
            record(0.5, "Tracer"),
        ];
        let baseline = summarize(&records);

        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(summarize(&reversed), baseline);

        let mut rotated = records.clone();
        rotated.rotate_left(2);
        assert_eq!(summarize(&rotated), baseline);
    }

    #[test]
    fn unknown_bucket_mixes_failed_and_unmatched_durations() {
        // A real duration with an unresolved hero still lands in Unknown.
        let records = vec![record(60.0, UNKNOWN_HERO), MatchRecord::sentinel()];
        let summary = summarize(&records);
        assert_eq!(summary.heroes[UNKNOWN_HERO], 60.0);
        assert_eq!(summary.duration, 60.0);
        assert_eq!(summary.matches, 2);
    }
}
