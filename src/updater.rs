//! Background refresh loop that pins itself onto the next match day.
//!
//! The updater keeps a single belief, "the relevant fixtures are on day D",
//! and only re-scans the calendar when that belief goes stale: at the first
//! cycle of a new calendar day, or when day D stops returning fixtures.

use chrono::{Local, NaiveDate};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::dates::short_label;
use crate::feed::{self, MatchDay, MatchSource};
use crate::shutdown;
use crate::snapshot::SnapshotStore;

/// Source of "today" for rollover detection.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Host wall clock in local time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLock {
    Unlocked,
    Locked(NaiveDate),
}

#[derive(Debug, Clone)]
pub struct UpdaterSettings {
    pub league: String,
    /// Forward scans start here instead of today when set.
    pub fixed_start: Option<NaiveDate>,
    pub max_days_ahead: u32,
    pub interval: Duration,
}

/// What one cycle did; mostly of interest to tests and debug logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub lock: DayLock,
    pub matches_published: bool,
    pub standings_published: bool,
}

pub struct DayLockUpdater {
    source: Arc<dyn MatchSource>,
    store: SnapshotStore,
    clock: Arc<dyn Clock>,
    settings: UpdaterSettings,
    lock: DayLock,
    last_day: NaiveDate,
}

impl DayLockUpdater {
    pub fn new(
        source: Arc<dyn MatchSource>,
        store: SnapshotStore,
        clock: Arc<dyn Clock>,
        settings: UpdaterSettings,
    ) -> Self {
        let last_day = clock.today();
        DayLockUpdater {
            source,
            store,
            clock,
            settings,
            lock: DayLock::Unlocked,
            last_day,
        }
    }

    pub fn lock(&self) -> DayLock {
        self.lock
    }

    /// One refresh: rollover check, locked-day refresh, forward scan if
    /// needed, then standings.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let today = self.clock.today();
        if today != self.last_day {
            info!(
                "New day detected! Releasing date lock and searching from {}",
                short_label(today)
            );
            self.last_day = today;
            self.lock = DayLock::Unlocked;
        }
        let scan_start = self.settings.fixed_start.unwrap_or(today);
        let league = self.settings.league.as_str();

        let mut found: Option<MatchDay> = None;
        if let DayLock::Locked(date) = self.lock {
            match feed::scan(self.source.as_ref(), league, date, 1, true).await {
                Some(day) => {
                    info!(" -> Refreshing data for locked date {}", short_label(date));
                    found = Some(day);
                }
                None => {
                    info!(
                        " -> Matches finished/gone on {}. Releasing lock.",
                        short_label(date)
                    );
                    self.lock = DayLock::Unlocked;
                }
            }
        }

        if found.is_none() {
            if let Some(day) = feed::scan(
                self.source.as_ref(),
                league,
                scan_start,
                self.settings.max_days_ahead,
                false,
            )
            .await
            {
                self.lock = DayLock::Locked(day.date);
                found = Some(day);
            }
        }

        let matches_published = match found {
            Some(day) => {
                self.store.publish_matches(day.matches, day.date);
                true
            }
            None => false,
        };

        // Standings are best effort: a failed or empty fetch keeps the old table.
        let standings_published = match feed::standings(self.source.as_ref(), league).await {
            Some(entries) if !entries.is_empty() => {
                self.store.publish_standings(entries);
                true
            }
            _ => false,
        };

        CycleReport {
            lock: self.lock,
            matches_published,
            standings_published,
        }
    }

    /// Run cycles every `interval` until shutdown is signalled.
    ///
    /// A panicking cycle is logged and the loop carries on after the usual
    /// pause; an in-flight cycle is dropped as soon as shutdown arrives.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        info!(
            "Background updater started (league={}, fixed start={:?}, interval={:?})",
            self.settings.league, self.settings.fixed_start, self.settings.interval
        );

        loop {
            let interval = self.settings.interval;
            tokio::select! {
                outcome = AssertUnwindSafe(self.run_cycle()).catch_unwind() => {
                    if let Err(panic) = outcome {
                        error!("Background updater cycle panicked: {}", panic_message(&*panic));
                    }
                }
                _ = shutdown::requested(&mut stop) => break,
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown::requested(&mut stop) => break,
            }
        }

        info!("Background updater stopped");
    }

    pub fn spawn(self, stop: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(stop))
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
