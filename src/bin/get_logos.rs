//! Download the team logos of a league into `{logos_dir}/{league}/{TEAM}.png`.

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::stream::{self, StreamExt};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use led_scoreboard::feed::espn::TeamLogo;
use led_scoreboard::feed::EspnClient;

/// Fetch team logos for the LED scoreboard
#[derive(Parser, Debug)]
#[command(name = "get-logos", version, about)]
struct Args {
    /// League identifier as used by the ESPN API
    #[arg(short, long, env = "LEAGUE", default_value = "bel")]
    league: String,

    /// Overwrite logos that already exist
    #[arg(short, long)]
    force: bool,

    /// Root directory of the team logos
    #[arg(long, env = "LOGOS_DIR", default_value = "assets/logos")]
    logos_dir: PathBuf,

    /// ESPN site API base URL
    #[arg(
        long,
        env = "API_BASE_URL",
        default_value = "https://site.api.espn.com/apis/site/v2/sports/soccer"
    )]
    api_base_url: String,

    /// Parallel downloads
    #[arg(long, default_value = "4")]
    concurrency: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Saved,
    Skipped,
    NoLogo,
    Failed,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    // Only the site endpoints are used here.
    let espn = EspnClient::new(&args.api_base_url, &args.api_base_url, Duration::from_secs(30))?;

    let teams = espn
        .fetch_teams(&args.league)
        .await
        .with_context(|| format!("Failed to fetch teams for {}", args.league))?;
    info!("{} team(s) in {}", teams.len(), args.league);

    let dir = args.logos_dir.join(&args.league);
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let outcomes: Vec<Outcome> = stream::iter(teams)
        .map(|team| fetch_logo(&espn, &dir, team, args.force))
        .buffer_unordered(args.concurrency.max(1))
        .collect()
        .await;

    let count = |o: Outcome| outcomes.iter().filter(|x| **x == o).count();
    info!(
        "Done: {} saved, {} skipped, {} without logo, {} failed",
        count(Outcome::Saved),
        count(Outcome::Skipped),
        count(Outcome::NoLogo),
        count(Outcome::Failed)
    );
    Ok(())
}

async fn fetch_logo(espn: &EspnClient, dir: &std::path::Path, team: TeamLogo, force: bool) -> Outcome {
    let Some(url) = team.logo_url else {
        warn!("Logo for {} not found", team.abbreviation);
        return Outcome::NoLogo;
    };

    if !team.abbreviation.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        warn!("Refusing odd team abbreviation '{}'", team.abbreviation);
        return Outcome::Failed;
    }
    let dest = dir.join(format!("{}.png", team.abbreviation));
    if dest.exists() && !force {
        info!("Logo for {} already exists, skipping", team.abbreviation);
        return Outcome::Skipped;
    }

    info!("Downloading logo for {}...", team.abbreviation);
    let bytes = match espn.download(&url).await {
        Ok(b) => b,
        Err(e) => {
            warn!("Failed to download logo for {}: {}", team.abbreviation, e);
            return Outcome::Failed;
        }
    };
    match tokio::fs::write(&dest, bytes).await {
        Ok(()) => {
            info!("Saved {}", dest.display());
            Outcome::Saved
        }
        Err(e) => {
            warn!("Failed to write {}: {}", dest.display(), e);
            Outcome::Failed
        }
    }
}
