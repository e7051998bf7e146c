//! Hand-off point between the updater (single writer) and the display loop
//! (single reader).
//!
//! Both feeds live behind one mutex. Publishing swaps in freshly allocated
//! `Arc<[T]>` slices and reading clones those handles, so every critical
//! section is a pointer copy and a reader can keep rendering from a list the
//! updater has already replaced.

use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::models::{MatchRecord, StandingsEntry};

/// Immutable view of the latest published data.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub matches: Arc<[MatchRecord]>,
    /// The day `matches` were found on; `None` before the first publish.
    pub match_date: Option<NaiveDate>,
    pub standings: Arc<[StandingsEntry]>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            matches: Arc::from(Vec::new()),
            match_date: None,
            standings: Arc::from(Vec::new()),
        }
    }
}

#[derive(Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<Mutex<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every write is a plain assignment, so a poisoned lock still guards a
    // whole snapshot.
    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the match list and its date together.
    pub fn publish_matches(&self, matches: Vec<MatchRecord>, date: NaiveDate) {
        let matches: Arc<[MatchRecord]> = matches.into();
        let count = matches.len();
        {
            let mut snap = self.lock();
            snap.matches = matches;
            snap.match_date = Some(date);
        }
        debug!("Published {} match(es) for {}", count, date);
    }

    pub fn publish_standings(&self, standings: Vec<StandingsEntry>) {
        let standings: Arc<[StandingsEntry]> = standings.into();
        let count = standings.len();
        self.lock().standings = standings;
        debug!("Published standings with {} team(s)", count);
    }

    /// Both feeds as of one instant.
    pub fn read(&self) -> Snapshot {
        self.lock().clone()
    }

    /// Latest matches and standings; empty until the first publish.
    pub fn latest(&self) -> (Arc<[MatchRecord]>, Arc<[StandingsEntry]>) {
        let snap = self.lock();
        (Arc::clone(&snap.matches), Arc::clone(&snap.standings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{day, matches, table};
    use std::thread;

    #[test]
    fn test_empty_before_first_publish() {
        let store = SnapshotStore::new();
        let (m, s) = store.latest();
        assert!(m.is_empty());
        assert!(s.is_empty());
        assert_eq!(store.read().match_date, None);
    }

    #[test]
    fn test_feeds_publish_independently() {
        let store = SnapshotStore::new();
        store.publish_matches(matches(3), day(2026, 10, 18));
        store.publish_standings(table(18));
        store.publish_matches(matches(1), day(2026, 10, 19));

        let snap = store.read();
        assert_eq!(snap.matches.len(), 1);
        assert_eq!(snap.match_date, Some(day(2026, 10, 19)));
        assert_eq!(snap.standings.len(), 18);
    }

    #[test]
    fn test_reader_copy_survives_republish() {
        let store = SnapshotStore::new();
        store.publish_matches(matches(3), day(2026, 10, 18));
        let (held, _) = store.latest();

        store.publish_matches(matches(2), day(2026, 10, 19));
        assert_eq!(held.len(), 3);
        assert_eq!(store.latest().0.len(), 2);
    }

    #[test]
    fn test_concurrent_reads_see_old_or_new_list() {
        let store = SnapshotStore::new();
        store.publish_matches(matches(3), day(2026, 10, 18));

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let (n, d) = if i % 2 == 0 { (5, 19) } else { (3, 18) };
                    store.publish_matches(matches(n), day(2026, 10, d));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snap = store.read();
                        match snap.match_date {
                            Some(d) if d == day(2026, 10, 18) => assert_eq!(snap.matches.len(), 3),
                            Some(d) if d == day(2026, 10, 19) => assert_eq!(snap.matches.len(), 5),
                            other => panic!("unexpected match date {:?}", other),
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
    }
}
