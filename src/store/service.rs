//! Statistics operations over a storage backend.

use std::sync::Mutex;

use crate::error::Result;
use crate::logging::debug;
use crate::stats::{self, GlobalStatsReport, GuessSummary, NewGuess, SongStatsReport, Store};

use super::{Backend, StoreError};

/// Records guesses and produces reports against a [`Backend`].
///
/// Every write is "load snapshot, apply, save snapshot" inside a single
/// store-wide gate. Reports load a fresh snapshot and never take the gate.
pub struct StatsService<B> {
    backend: B,
    write_gate: Mutex<()>,
}

impl<B: Backend> StatsService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            write_gate: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Record one guess and persist the store before returning.
    pub fn record_guess(&self, guess: NewGuess) -> Result<GuessSummary> {
        debug!(song_id = %guess.song_id, correct = guess.correct, time = guess.time, "recording guess");
        let summary = self.mutate(|store| stats::apply_guess(store, guess))?;
        debug!(
            total_guesses = summary.total_guesses,
            correct_guesses = summary.correct_guesses,
            average_time = summary.average_time,
            "recorded guess"
        );
        Ok(summary)
    }

    /// Report on one song.
    pub fn song_stats(&self, song_id: &str) -> Result<SongStatsReport> {
        let store = self.backend.load()?;
        stats::song_stats(&store, song_id)
    }

    /// Report across all songs.
    pub fn global_stats(&self) -> Result<GlobalStatsReport> {
        let store = self.backend.load()?;
        Ok(stats::global_stats(&store))
    }

    /// Replace the store with an empty one.
    pub fn reset(&self) -> Result<()> {
        self.mutate(|store| {
            *store = Store::new();
            Ok(())
        })
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut Store) -> Result<T>) -> Result<T> {
        let _guard = self.write_gate.lock().map_err(|_| StoreError::Poisoned)?;
        let mut store = self.backend.load()?;
        let output = apply(&mut store)?;
        self.backend.save(&store)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use std::sync::Arc;

    /// Backend whose writes always fail.
    struct ReadOnlyBackend(MemoryBackend);

    impl Backend for ReadOnlyBackend {
        fn load(&self) -> std::result::Result<Store, StoreError> {
            self.0.load()
        }

        fn save(&self, _store: &Store) -> std::result::Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn test_record_then_report() {
        let service = StatsService::new(MemoryBackend::new());
        service
            .record_guess(NewGuess::new("abc", 800, true).with_metadata("Song", "Band"))
            .unwrap();
        let summary = service.record_guess(NewGuess::new("abc", 1200, true)).unwrap();
        assert_eq!(summary.average_time, 1000);

        let report = service.song_stats("abc").unwrap();
        assert_eq!(report.stats.total_guesses, 2);
        assert_eq!(report.name.as_deref(), Some("Song"));

        let global = service.global_stats().unwrap();
        assert_eq!(global.total_guesses, 2);
    }

    #[test]
    fn test_reports_are_idempotent() {
        let service = StatsService::new(MemoryBackend::new());
        service.record_guess(NewGuess::new("abc", 800, true)).unwrap();
        service.record_guess(NewGuess::new("def", 200, false)).unwrap();

        assert_eq!(service.song_stats("abc").unwrap(), service.song_stats("abc").unwrap());
        assert_eq!(service.global_stats().unwrap(), service.global_stats().unwrap());
    }

    #[test]
    fn test_failed_save_is_reported_and_not_applied() {
        let service = StatsService::new(ReadOnlyBackend(MemoryBackend::new()));
        let err = service.record_guess(NewGuess::new("abc", 800, true)).unwrap_err();
        assert!(err.is_persistence());
        assert!(service.song_stats("abc").unwrap_err().is_not_found());
    }

    #[test]
    fn test_validation_error_leaves_store_untouched() {
        let service = StatsService::new(MemoryBackend::new());
        let err = service.record_guess(NewGuess::new("", 800, true)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.global_stats().unwrap().total_guesses, 0);
    }

    #[test]
    fn test_reset() {
        let service = StatsService::new(MemoryBackend::new());
        service.record_guess(NewGuess::new("abc", 800, true)).unwrap();
        service.reset().unwrap();
        assert_eq!(service.global_stats().unwrap().total_songs, 0);
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        let service = Arc::new(StatsService::new(MemoryBackend::new()));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let id = format!("song{}", (t + i) % 3);
                        service.record_guess(NewGuess::new(id, i, i % 2 == 0)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let global = service.global_stats().unwrap();
        assert_eq!(global.total_guesses, 200);
        let per_song: u64 = global.top_songs.iter().map(|s| s.total_guesses).sum();
        assert_eq!(per_song, 200);
    }
}
