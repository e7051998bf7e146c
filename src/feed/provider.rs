use async_trait::async_trait;
use chrono::NaiveDate;

use super::FetchError;
use crate::models::{MatchRecord, StandingsEntry};

/// A source of scoreboard and standings data for one sport.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// All events the source lists for `league` on `date` (possibly empty).
    async fn fetch_day(&self, league: &str, date: NaiveDate)
        -> Result<Vec<MatchRecord>, FetchError>;

    /// The current league table, first entry ranked 1.
    async fn fetch_standings(&self, league: &str) -> Result<Vec<StandingsEntry>, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
