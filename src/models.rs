use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::parse_timestamp;

/// One scoreboard event exactly as the API returned it.
///
/// The updater never looks inside; only the display summarizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchRecord(pub serde_json::Value);

/// A row of the league table. `rank` follows API order, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub rank: u32,
    /// Team abbreviation, e.g. "CLB"
    pub team: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    HalfTime,
    FullTime,
    /// In play or any other state; carries the short label (e.g. "67'")
    Live(String),
}

impl MatchStatus {
    fn classify(short_detail: &str, state: Option<&str>) -> Self {
        if short_detail == "Scheduled" || state == Some("pre") {
            return MatchStatus::Scheduled;
        }
        match short_detail {
            "HT" => MatchStatus::HalfTime,
            "FT" => MatchStatus::FullTime,
            other => MatchStatus::Live(other.to_string()),
        }
    }
}

/// The fields of a [`MatchRecord`] the match screen needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub status: MatchStatus,
    pub kickoff: Option<DateTime<Utc>>,
    pub team_a: String,
    pub team_b: String,
    pub goals_a: String,
    pub goals_b: String,
    pub red_cards_a: u32,
    pub red_cards_b: u32,
}

impl MatchSummary {
    pub fn score(&self) -> String {
        format!("{}-{}", self.goals_a, self.goals_b)
    }
}

impl MatchRecord {
    /// Summarize the first competition of this event.
    ///
    /// Returns `None` when the record lacks a competition or either competitor.
    pub fn summary(&self) -> Option<MatchSummary> {
        let competition = self.0["competitions"].get(0)?;
        let competitors = competition["competitors"].as_array()?;
        let a = competitors.first()?;
        let b = competitors.get(1)?;

        let status_type = &competition["status"]["type"];
        let short_detail = status_type["shortDetail"].as_str().unwrap_or("");
        let status = MatchStatus::classify(short_detail, status_type["state"].as_str());

        let team_a = a["team"]["abbreviation"].as_str()?.to_string();
        let team_b = b["team"]["abbreviation"].as_str()?.to_string();

        let (red_cards_a, red_cards_b) = count_red_cards(competition, id_of(a), id_of(b));

        Some(MatchSummary {
            kickoff: competition["date"]
                .as_str()
                .or_else(|| self.0["date"].as_str())
                .and_then(parse_timestamp),
            goals_a: team_goals(a, &status),
            goals_b: team_goals(b, &status),
            status,
            team_a,
            team_b,
            red_cards_a,
            red_cards_b,
        })
    }
}

fn id_of(competitor: &serde_json::Value) -> Option<&str> {
    competitor["id"]
        .as_str()
        .or_else(|| competitor["team"]["id"].as_str())
}

fn count_red_cards(
    competition: &serde_json::Value,
    team_a: Option<&str>,
    team_b: Option<&str>,
) -> (u32, u32) {
    let Some(details) = competition["details"].as_array() else {
        return (0, 0);
    };
    details
        .iter()
        .filter(|d| d["redCard"].as_bool().unwrap_or(false))
        .fold((0, 0), |(a, b), d| {
            let team = d["team"]["id"].as_str();
            if team.is_some() && team == team_a {
                (a + 1, b)
            } else if team.is_some() && team == team_b {
                (a, b + 1)
            } else {
                (a, b)
            }
        })
}

/// Goals as displayed: "0" before kickoff, then the score field, then the
/// `goals` statistic, and "x" when neither is present.
fn team_goals(competitor: &serde_json::Value, status: &MatchStatus) -> String {
    if *status == MatchStatus::Scheduled {
        return "0".to_string();
    }
    if let Some(score) = competitor["score"].as_str() {
        return score.to_string();
    }
    if let Some(score) = competitor["score"].as_i64() {
        return score.to_string();
    }
    competitor["statistics"]
        .as_array()
        .and_then(|stats| {
            stats
                .iter()
                .find(|s| s["name"].as_str() == Some("goals"))
                .and_then(|s| s["displayValue"].as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| "x".to_string())
}
