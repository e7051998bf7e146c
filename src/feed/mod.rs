pub mod espn;
pub mod provider;

pub use espn::EspnClient;
pub use provider::MatchSource;

use chrono::{Days, NaiveDate};
use tracing::{debug, info, warn};

use crate::dates::short_label;
use crate::models::{MatchRecord, StandingsEntry};

/// Why a single request produced no data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// The first day of a forward scan that had fixtures.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDay {
    pub date: NaiveDate,
    pub matches: Vec<MatchRecord>,
}

/// Probe `start`, `start + 1`, ... for at most `max_days` days and return the
/// first day with a non-empty match list.
///
/// A failing day is logged and skipped; it never ends the scan. With `quiet`
/// the per-day chatter drops to debug level (used for lock refreshes).
pub async fn scan(
    source: &dyn MatchSource,
    league: &str,
    start: NaiveDate,
    max_days: u32,
    quiet: bool,
) -> Option<MatchDay> {
    for offset in 0..max_days {
        let Some(date) = start.checked_add_days(Days::new(offset.into())) else {
            break;
        };
        let label = short_label(date);
        if quiet {
            debug!("Checking for {} matches on {}", league, label);
        } else {
            info!("Checking for {} matches on {}...", league, label);
        }

        match source.fetch_day(league, date).await {
            Ok(matches) if !matches.is_empty() => {
                if quiet {
                    debug!("Found {} match(es) on {}", matches.len(), label);
                } else {
                    info!("Found {} match(es) on {}", matches.len(), label);
                }
                return Some(MatchDay { date, matches });
            }
            Ok(_) => {
                if quiet {
                    debug!("No {} matches on {}", league, label);
                } else {
                    info!("No {} matches on {}, checking next day...", league, label);
                }
            }
            Err(FetchError::Timeout) => {
                warn!("{}: timeout for {} on {}, skipping", source.name(), league, label);
            }
            Err(e) => {
                warn!("{}: {} for {} on {}, skipping", source.name(), e, league, label);
            }
        }
    }

    if !quiet {
        info!(
            "No matches found in {} within {} day(s) from {}",
            league,
            max_days,
            short_label(start)
        );
    }
    None
}

/// Fetch standings, collapsing any failure into `None` after logging it.
pub async fn standings(source: &dyn MatchSource, league: &str) -> Option<Vec<StandingsEntry>> {
    match source.fetch_standings(league).await {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!("{}: standings for {} unavailable: {}", source.name(), league, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory source for exercising the scan and the updater.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{FetchError, MatchSource};
    use crate::models::{MatchRecord, StandingsEntry};

    pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn matches(n: usize) -> Vec<MatchRecord> {
        (0..n)
            .map(|i| MatchRecord(json!({ "id": format!("m{}", i), "competitions": [] })))
            .collect()
    }

    pub fn table(n: u32) -> Vec<StandingsEntry> {
        (1..=n)
            .map(|rank| StandingsEntry {
                rank,
                team: format!("T{:02}", rank),
                points: 60 - rank,
            })
            .collect()
    }

    #[derive(Default)]
    struct Script {
        days: HashMap<NaiveDate, Result<usize, ()>>,
        standings: Option<Vec<StandingsEntry>>,
        queried: Vec<NaiveDate>,
    }

    /// Days not scripted return an empty list; standings fail with a timeout
    /// unless set.
    #[derive(Default)]
    pub struct ScriptedSource {
        script: Mutex<Script>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_day(&self, date: NaiveDate, count: usize) {
            self.script.lock().unwrap().days.insert(date, Ok(count));
        }

        pub fn fail_day(&self, date: NaiveDate) {
            self.script.lock().unwrap().days.insert(date, Err(()));
        }

        pub fn set_standings(&self, entries: Option<Vec<StandingsEntry>>) {
            self.script.lock().unwrap().standings = entries;
        }

        /// Days queried since the last call, in order.
        pub fn take_queried(&self) -> Vec<NaiveDate> {
            std::mem::take(&mut self.script.lock().unwrap().queried)
        }
    }

    #[async_trait]
    impl MatchSource for ScriptedSource {
        async fn fetch_day(
            &self,
            _league: &str,
            date: NaiveDate,
        ) -> Result<Vec<MatchRecord>, FetchError> {
            let mut script = self.script.lock().unwrap();
            script.queried.push(date);
            match script.days.get(&date) {
                Some(Ok(n)) => Ok(matches(*n)),
                Some(Err(())) => Err(FetchError::Transport("connection reset".into())),
                None => Ok(vec![]),
            }
        }

        async fn fetch_standings(&self, _league: &str) -> Result<Vec<StandingsEntry>, FetchError> {
            self.script
                .lock()
                .unwrap()
                .standings
                .clone()
                .ok_or(FetchError::Timeout)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{day, table, ScriptedSource};
    use super::*;

    #[tokio::test]
    async fn test_scan_returns_first_non_empty_day() {
        let source = ScriptedSource::new();
        source.set_day(day(2026, 10, 20), 2);
        source.set_day(day(2026, 10, 21), 5);

        let found = scan(&source, "bel", day(2026, 10, 18), 5, false)
            .await
            .unwrap();
        assert_eq!(found.date, day(2026, 10, 20));
        assert_eq!(found.matches.len(), 2);
        assert_eq!(
            source.take_queried(),
            vec![day(2026, 10, 18), day(2026, 10, 19), day(2026, 10, 20)]
        );
    }

    #[tokio::test]
    async fn test_scan_checks_at_most_max_days() {
        let source = ScriptedSource::new();
        source.set_day(day(2026, 10, 23), 1);

        assert!(scan(&source, "bel", day(2026, 10, 18), 5, false).await.is_none());
        let queried = source.take_queried();
        assert_eq!(queried.len(), 5);
        assert_eq!(queried.last(), Some(&day(2026, 10, 22)));
    }

    #[tokio::test]
    async fn test_scan_skips_failing_days() {
        let source = ScriptedSource::new();
        source.fail_day(day(2026, 10, 18));
        source.fail_day(day(2026, 10, 19));
        source.set_day(day(2026, 10, 20), 3);

        let found = scan(&source, "bel", day(2026, 10, 18), 5, true).await.unwrap();
        assert_eq!(found.date, day(2026, 10, 20));
        assert_eq!(found.matches.len(), 3);
    }

    #[tokio::test]
    async fn test_scan_zero_days_queries_nothing() {
        let source = ScriptedSource::new();
        source.set_day(day(2026, 10, 18), 1);

        assert!(scan(&source, "bel", day(2026, 10, 18), 0, false).await.is_none());
        assert!(source.take_queried().is_empty());
    }

    #[tokio::test]
    async fn test_scan_crosses_year_boundary() {
        let source = ScriptedSource::new();
        source.set_day(day(2027, 1, 1), 1);

        let found = scan(&source, "bel", day(2026, 12, 30), 5, false).await.unwrap();
        assert_eq!(found.date, day(2027, 1, 1));
    }

    #[tokio::test]
    async fn test_standings_failure_is_none() {
        let source = ScriptedSource::new();
        assert!(standings(&source, "bel").await.is_none());

        source.set_standings(Some(table(18)));
        assert_eq!(standings(&source, "bel").await.map(|s| s.len()), Some(18));
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(FetchError::Status(503).to_string(), "unexpected HTTP status 503");
    }
}
