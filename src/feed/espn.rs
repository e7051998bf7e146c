use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::provider::MatchSource;
use super::FetchError;
use crate::dates::api_date;
use crate::models::{MatchRecord, StandingsEntry};

/// Scoreboard, standings and team endpoints of ESPN's public soccer API.
#[derive(Clone)]
pub struct EspnClient {
    http: Client,
    /// e.g. https://site.api.espn.com/apis/site/v2/sports/soccer
    site_url: Url,
    /// e.g. https://site.web.api.espn.com/apis/v2/sports/soccer
    standings_url: Url,
}

/// A team and the first logo ESPN lists for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLogo {
    pub abbreviation: String,
    pub logo_url: Option<String>,
}

impl EspnClient {
    pub fn new(site_url: &str, standings_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnClient {
            http,
            site_url: Url::parse(site_url).context("Invalid ESPN site URL")?,
            standings_url: Url::parse(standings_url).context("Invalid ESPN standings URL")?,
        })
    }

    /// `{base}/{league}.1/{endpoint}`
    fn league_url(base: &Url, league: &str, endpoint: &str) -> Result<Url, FetchError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("cannot build a path on {}", base)))?
            .pop_if_empty()
            .push(&format!("{}.1", league))
            .push(endpoint);
        Ok(url)
    }

    pub fn scoreboard_url(&self, league: &str, date: NaiveDate) -> Result<Url, FetchError> {
        let mut url = Self::league_url(&self.site_url, league, "scoreboard")?;
        url.query_pairs_mut().append_pair("dates", &api_date(date));
        Ok(url)
    }

    pub fn standings_url(&self, league: &str) -> Result<Url, FetchError> {
        Self::league_url(&self.standings_url, league, "standings")
    }

    pub fn teams_url(&self, league: &str) -> Result<Url, FetchError> {
        Self::league_url(&self.site_url, league, "teams")
    }

    async fn get_json(&self, url: Url) -> Result<serde_json::Value, FetchError> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    /// Teams of a league with their logo URLs.
    pub async fn fetch_teams(&self, league: &str) -> Result<Vec<TeamLogo>, FetchError> {
        let raw = self.get_json(self.teams_url(league)?).await?;
        parse_teams(&raw)
    }

    /// Raw bytes behind an absolute URL (logo images).
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::Transport(e.to_string()))?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

#[async_trait]
impl MatchSource for EspnClient {
    fn name(&self) -> &str {
        "ESPN"
    }

    async fn fetch_day(
        &self,
        league: &str,
        date: NaiveDate,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        let raw = self.get_json(self.scoreboard_url(league, date)?).await?;
        parse_scoreboard(&raw)
    }

    async fn fetch_standings(&self, league: &str) -> Result<Vec<StandingsEntry>, FetchError> {
        let raw = self.get_json(self.standings_url(league)?).await?;
        parse_standings(&raw)
    }
}

// ── Parsing helpers ────────────────────────────────────────────────────────────

/// Events of a scoreboard response. A missing or null `events` means no
/// fixtures that day.
pub fn parse_scoreboard(raw: &serde_json::Value) -> Result<Vec<MatchRecord>, FetchError> {
    match &raw["events"] {
        serde_json::Value::Null => Ok(vec![]),
        serde_json::Value::Array(events) => {
            Ok(events.iter().cloned().map(MatchRecord).collect())
        }
        other => Err(FetchError::Malformed(format!(
            "'events' is not a list: {}",
            other
        ))),
    }
}

/// Table of the first standings group, ranked in response order.
pub fn parse_standings(raw: &serde_json::Value) -> Result<Vec<StandingsEntry>, FetchError> {
    let entries = raw["children"][0]["standings"]["entries"]
        .as_array()
        .ok_or_else(|| FetchError::Malformed("no standings entries".into()))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let team = entry["team"]["abbreviation"]
                .as_str()
                .ok_or_else(|| FetchError::Malformed(format!("entry {} has no team", i)))?;
            let points = entry["stats"]
                .as_array()
                .and_then(|stats| stats.iter().find(|s| s["name"].as_str() == Some("points")))
                .and_then(|s| s["value"].as_f64())
                .unwrap_or(0.0);
            Ok(StandingsEntry {
                rank: i as u32 + 1,
                team: team.to_string(),
                points: points.max(0.0) as u32,
            })
        })
        .collect()
}

pub fn parse_teams(raw: &serde_json::Value) -> Result<Vec<TeamLogo>, FetchError> {
    let teams = raw["sports"][0]["leagues"][0]["teams"]
        .as_array()
        .ok_or_else(|| FetchError::Malformed("no teams list".into()))?;

    Ok(teams
        .iter()
        .filter_map(|t| {
            let team = &t["team"];
            Some(TeamLogo {
                abbreviation: team["abbreviation"].as_str()?.to_string(),
                logo_url: team["logos"][0]["href"].as_str().map(str::to_string),
            })
        })
        .collect())
}
