//! Correct-guess timing histogram and percentiles.
//!
//! Buckets are 500 ms wide and dense from 0 up to the largest correct time,
//! capped at 10 seconds. A time lands in `floor(time / 500) * 500` and is only
//! counted when that key does not exceed the cap, so slow guesses past the
//! cap drop out of the histogram instead of piling into the last bucket.
//! Times so far below zero that their key is not representable are skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Width of one histogram bucket in milliseconds.
pub const BUCKET_WIDTH_MS: i64 = 500;

/// Upper bound on the histogram range in milliseconds.
pub const MAX_HISTOGRAM_TIME_MS: i64 = 10_000;

/// One histogram bucket: its lower bound and how many guesses fell in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub time: i64,
    pub count: u64,
}

/// Nearest-rank percentiles over correct-guess times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: i64,
    pub p25: i64,
    pub p50: i64,
    pub p75: i64,
    pub p90: i64,
}

impl Percentiles {
    /// Compute from times sorted ascending. `None` when there are no times.
    ///
    /// A rank that lands on a zero time reports the minimum instead, matching
    /// the browser client's `sorted[i] || sorted[0]`.
    pub fn from_sorted(sorted: &[i64]) -> Option<Self> {
        let first = *sorted.first()?;
        let rank = |p: f64| -> i64 {
            let index = (sorted.len() as f64 * p).floor() as usize;
            sorted
                .get(index)
                .copied()
                .filter(|&time| time != 0)
                .unwrap_or(first)
        };

        Some(Self {
            p10: rank(0.10),
            p25: rank(0.25),
            p50: rank(0.50),
            p75: rank(0.75),
            p90: rank(0.90),
        })
    }
}

/// Bucket key for a time, `None` when the key would overflow `i64`.
pub fn bucket_of(time: i64) -> Option<i64> {
    time.div_euclid(BUCKET_WIDTH_MS).checked_mul(BUCKET_WIDTH_MS)
}

/// Build the dense histogram for a set of correct-guess times.
///
/// Returns an empty vector when `times` is empty. Keys run ascending. Negative
/// times are accepted as recorded and get their own buckets below zero.
pub fn time_distribution(times: &[i64]) -> Vec<Bucket> {
    let Some(max_seen) = times.iter().copied().max() else {
        return Vec::new();
    };
    let max_time = max_seen.min(MAX_HISTOGRAM_TIME_MS);

    let mut buckets: BTreeMap<i64, u64> = BTreeMap::new();
    let mut key = 0;
    while key <= max_time {
        buckets.insert(key, 0);
        key += BUCKET_WIDTH_MS;
    }

    for key in times.iter().filter_map(|&time| bucket_of(time)) {
        if key <= max_time {
            *buckets.entry(key).or_insert(0) += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(time, count)| Bucket { time, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(buckets: &[Bucket]) -> Vec<(i64, u64)> {
        buckets.iter().map(|b| (b.time, b.count)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(time_distribution(&[]).is_empty());
    }

    #[test]
    fn test_populated_buckets() {
        let dist = time_distribution(&[100, 600, 600, 1200]);
        assert_eq!(pairs(&dist), vec![(0, 1), (500, 2), (1000, 1)]);
    }

    #[test]
    fn test_dense_zero_buckets() {
        let dist = time_distribution(&[100, 2200]);
        assert_eq!(
            pairs(&dist),
            vec![(0, 1), (500, 0), (1000, 0), (1500, 0), (2000, 1)]
        );
    }

    #[test]
    fn test_max_time_on_bucket_boundary() {
        let dist = time_distribution(&[1000]);
        assert_eq!(pairs(&dist), vec![(0, 0), (500, 0), (1000, 1)]);
    }

    #[test]
    fn test_time_beyond_cap_is_dropped() {
        let dist = time_distribution(&[300, 9000, 15000]);
        assert_eq!(dist.len(), 21);
        assert_eq!(dist.iter().map(|b| b.count).sum::<u64>(), 2);
        assert_eq!(dist.last(), Some(&Bucket { time: 10_000, count: 0 }));
    }

    #[test]
    fn test_sole_time_beyond_cap_counts_nothing() {
        let dist = time_distribution(&[15000]);
        assert_eq!(dist.len(), 21);
        assert_eq!(dist.last().map(|b| b.time), Some(MAX_HISTOGRAM_TIME_MS));
        assert!(dist.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_time_just_past_cap_lands_in_top_bucket() {
        let dist = time_distribution(&[10_400]);
        assert_eq!(dist.last(), Some(&Bucket { time: 10_000, count: 1 }));
    }

    #[test]
    fn test_negative_times() {
        let dist = time_distribution(&[-700, -100]);
        assert_eq!(pairs(&dist), vec![(-1000, 1), (-500, 1)]);

        let dist = time_distribution(&[-100, 700]);
        assert_eq!(pairs(&dist), vec![(-500, 1), (0, 0), (500, 1)]);
    }

    #[test]
    fn test_extreme_times_do_not_overflow() {
        assert_eq!(bucket_of(i64::MIN), None);
        assert_eq!(bucket_of(i64::MAX), Some(i64::MAX - i64::MAX % 500));

        assert!(time_distribution(&[i64::MIN]).is_empty());

        let dist = time_distribution(&[i64::MIN, 1000]);
        assert_eq!(pairs(&dist), vec![(0, 0), (500, 0), (1000, 1)]);

        let dist = time_distribution(&[i64::MAX]);
        assert_eq!(dist.len(), 21);
        assert!(dist.iter().all(|b| b.count == 0));

        let dist = time_distribution(&[i64::MIN, 200, i64::MAX]);
        assert_eq!(dist.len(), 21);
        assert_eq!(dist.first(), Some(&Bucket { time: 0, count: 1 }));
        assert_eq!(dist.iter().map(|b| b.count).sum::<u64>(), 1);
    }

    #[test]
    fn test_percentile_on_zero_falls_back_to_minimum() {
        let p = Percentiles::from_sorted(&[-300, 0, 0, 0]).unwrap();
        assert_eq!(p.p10, -300);
        assert_eq!(p.p50, -300);
        assert_eq!(p.p90, -300);

        let p = Percentiles::from_sorted(&[i64::MIN, 5]).unwrap();
        assert_eq!(p.p10, i64::MIN);
        assert_eq!(p.p50, 5);
    }

    #[test]
    fn test_percentiles() {
        assert_eq!(Percentiles::from_sorted(&[]), None);

        let single = Percentiles::from_sorted(&[700]).unwrap();
        assert_eq!(single.p10, 700);
        assert_eq!(single.p90, 700);

        let times: Vec<i64> = (1..=10).map(|i| i * 100).collect();
        let p = Percentiles::from_sorted(&times).unwrap();
        assert_eq!(p.p10, 200);
        assert_eq!(p.p25, 300);
        assert_eq!(p.p50, 600);
        assert_eq!(p.p75, 800);
        assert_eq!(p.p90, 1000);
    }
}
