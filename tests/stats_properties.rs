//! Property-based tests for ingest invariants and histogram bounds.

use proptest::prelude::*;
use songguess::stats::{
    BUCKET_WIDTH_MS, MAX_HISTOGRAM_TIME_MS, NewGuess, Store, apply_guess, bucket_of, global_stats,
    song_stats, time_distribution,
};
use songguess::{MemoryBackend, StatsService};

/// A guess against one of a handful of songs.
fn guess_strategy() -> impl Strategy<Value = (u8, i64, bool)> {
    (0u8..5, -1_000i64..20_000, any::<bool>())
}

fn song_id(index: u8) -> String {
    format!("song-{}", index)
}

fn rounded_mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let sum: i64 = values.iter().sum();
    (sum as f64 / values.len() as f64 + 0.5).floor() as i64
}

proptest! {
    #[test]
    fn counters_track_guess_sequence(guesses in prop::collection::vec(guess_strategy(), 0..60)) {
        let mut store = Store::new();

        for (index, time, correct) in guesses {
            apply_guess(&mut store, NewGuess::new(song_id(index), time, correct)).unwrap();

            let record = store.song(&song_id(index)).unwrap();
            prop_assert_eq!(record.total_guesses, record.guesses.len() as u64);
            prop_assert_eq!(
                record.correct_guesses,
                record.guesses.iter().filter(|g| g.correct).count() as u64
            );

            let sum: u64 = store.songs.values().map(|s| s.total_guesses).sum();
            prop_assert_eq!(store.total_guesses, sum);
        }
    }

    #[test]
    fn average_time_is_mean_of_correct_times(guesses in prop::collection::vec(guess_strategy(), 1..60)) {
        let mut store = Store::new();
        for (index, time, correct) in guesses {
            apply_guess(&mut store, NewGuess::new(song_id(index), time, correct)).unwrap();
        }

        for record in store.songs.values() {
            let correct: Vec<i64> = record.correct_times().collect();
            prop_assert_eq!(record.average_time, rounded_mean(&correct));
            prop_assert_eq!(record.average_time, record.computed_average_time());
        }
    }

    #[test]
    fn histogram_is_dense_and_bounded(times in prop::collection::vec(0i64..30_000, 1..40)) {
        let dist = time_distribution(&times);
        let max_time = times.iter().copied().max().unwrap_or(0).min(MAX_HISTOGRAM_TIME_MS);

        // Dense, ascending, one bucket per multiple of the width up to the cap.
        prop_assert_eq!(dist.len() as i64, max_time / BUCKET_WIDTH_MS + 1);
        for (i, bucket) in dist.iter().enumerate() {
            prop_assert_eq!(bucket.time, i as i64 * BUCKET_WIDTH_MS);
        }

        let counted = times
            .iter()
            .filter(|&&t| bucket_of(t).is_some_and(|key| key <= max_time))
            .count() as u64;
        prop_assert_eq!(dist.iter().map(|b| b.count).sum::<u64>(), counted);
    }

    #[test]
    fn reports_do_not_mutate(guesses in prop::collection::vec(guess_strategy(), 0..30)) {
        let service = StatsService::new(MemoryBackend::new());
        for (index, time, correct) in guesses {
            service.record_guess(NewGuess::new(song_id(index), time, correct)).unwrap();
        }

        let global = service.global_stats().unwrap();
        prop_assert_eq!(&global, &service.global_stats().unwrap());
        prop_assert!(global.top_songs.len() <= 10);
        prop_assert!(global.top_songs.windows(2).all(|w| w[0].total_guesses >= w[1].total_guesses));

        for index in 0..5 {
            let first = service.song_stats(&song_id(index));
            let second = service.song_stats(&song_id(index));
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(a), Err(b)) => prop_assert!(a.is_not_found() && b.is_not_found()),
                _ => prop_assert!(false, "reports disagree"),
            }
        }
    }

    #[test]
    fn rates_are_percentages(guesses in prop::collection::vec(guess_strategy(), 0..40)) {
        let mut store = Store::new();
        for (index, time, correct) in guesses {
            apply_guess(&mut store, NewGuess::new(song_id(index), time, correct)).unwrap();
        }

        let global = global_stats(&store);
        prop_assert!((0..=100).contains(&global.global_accuracy_rate));
        for id in store.songs.keys() {
            let report = song_stats(&store, id).unwrap();
            prop_assert!((0..=100).contains(&report.stats.accuracy_rate));
        }
    }
}
