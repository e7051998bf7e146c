use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use led_scoreboard::config::Config;
use led_scoreboard::dates::{parse_mmdd, short_label};
use led_scoreboard::display::{screens, DisplaySettings, FrameBuffer, LogoCache, Scoreboard};
use led_scoreboard::feed::EspnClient;
use led_scoreboard::shutdown::{self, Exit};
use led_scoreboard::snapshot::SnapshotStore;
use led_scoreboard::updater::{DayLockUpdater, SystemClock, UpdaterSettings};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    info!("Starting LED matrix scoreboard for league: {}", config.league);

    let today = Local::now().date_naive();
    let fixed_start = match config.date.as_deref() {
        Some(raw) => {
            let date = parse_mmdd(raw, today)?;
            info!("Using date: {}", date.format("%d/%m/%Y"));
            Some(date)
        }
        None => {
            info!("Using today's date: {}", short_label(today));
            None
        }
    };

    let espn = EspnClient::new(
        &config.api_base_url,
        &config.standings_base_url,
        config.api_timeout(),
    )?;

    let mut board = Scoreboard::new(
        FrameBuffer::new(config.matrix_cols, config.matrix_rows),
        LogoCache::new(&config.logos_dir, screens::LOGO_SIZE, config.logo_cache_size),
        DisplaySettings {
            league: config.league.clone(),
            timezone: config.timezone()?,
            match_display: config.match_display(),
            standings_display: config.standings_display(),
            idle_poll: Duration::from_secs(1),
        },
    );
    board.show_startup();

    let store = SnapshotStore::new();
    let (stop_tx, stop_rx) = shutdown::channel();

    let updater = DayLockUpdater::new(
        Arc::new(espn),
        store.clone(),
        Arc::new(SystemClock),
        UpdaterSettings {
            league: config.league.clone(),
            fixed_start,
            max_days_ahead: config.max_days_ahead,
            interval: config.refresh_interval(),
        },
    );
    let mut updater_task = updater.spawn(stop_rx.clone());
    let mut display_task = tokio::spawn(board.run(store, stop_rx));

    if shutdown::supervise(tokio::signal::ctrl_c(), &mut updater_task, &mut display_task).await
        == Exit::Interrupted
    {
        info!("Shutting down...");
    }

    let _ = stop_tx.send(true);
    let drain = async {
        if !updater_task.is_finished() {
            let _ = (&mut updater_task).await;
        }
        if !display_task.is_finished() {
            let _ = (&mut display_task).await;
        }
    };
    if tokio::time::timeout(Duration::from_secs(2), drain).await.is_err() {
        warn!("Background tasks did not stop in time, aborting");
        updater_task.abort();
        display_task.abort();
    }

    Ok(())
}
