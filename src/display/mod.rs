pub mod framebuffer;
pub mod logos;
pub mod screens;

pub use framebuffer::FrameBuffer;
pub use logos::{AssetError, LogoCache};

use chrono_tz::Tz;
use image::RgbImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::{MatchRecord, StandingsEntry};
use crate::shutdown;
use crate::snapshot::SnapshotStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// The two bitmap fonts the layouts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 5x7
    Small,
    /// 6x10
    Large,
}

/// A pixel-addressable panel. Coordinates outside the panel are ignored.
pub trait Canvas {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn clear(&mut self);

    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Draw `text` with its baseline at `y`.
    fn draw_text(&mut self, font: Font, x: i32, y: i32, color: Color, text: &str);

    /// Blit `image` with its top-left corner at (`x`, `y`).
    fn set_image(&mut self, image: &RgbImage, x: i32, y: i32) {
        for (px, py, p) in image.enumerate_pixels() {
            self.set_pixel(x + px as i32, y + py as i32, Color::new(p[0], p[1], p[2]));
        }
    }

    /// Push the finished frame to the panel.
    fn present(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub league: String,
    /// Zone kickoff times are shown in
    pub timezone: Tz,
    pub match_display: Duration,
    pub standings_display: Duration,
    /// Poll period while waiting for the first data
    pub idle_poll: Duration,
}

/// Owns the panel and the logo cache, and rotates through the latest
/// matches and standings.
pub struct Scoreboard<C> {
    canvas: C,
    logos: LogoCache,
    settings: DisplaySettings,
}

impl<C: Canvas> Scoreboard<C> {
    pub fn new(canvas: C, logos: LogoCache, settings: DisplaySettings) -> Self {
        Scoreboard {
            canvas,
            logos,
            settings,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn show_startup(&mut self) {
        match self.logos.league_logo(&self.settings.league) {
            Ok(logo) => {
                screens::draw_startup(&mut self.canvas, &logo);
                self.canvas.present();
            }
            Err(e) => warn!("Could not load league logo: {}", e),
        }
    }

    /// Draw one match; returns `false` when the record cannot be summarized.
    pub fn show_match(&mut self, record: &MatchRecord) -> bool {
        let Some(summary) = record.summary() else {
            warn!("Skipping match record without two competitors");
            return false;
        };
        let logo_a = self.logo(&summary.team_a, false);
        let logo_b = self.logo(&summary.team_b, true);
        screens::draw_match(
            &mut self.canvas,
            &summary,
            logo_a.as_deref(),
            logo_b.as_deref(),
            self.settings.timezone,
        );
        self.canvas.present();
        true
    }

    pub fn show_standings(&mut self, standings: &[StandingsEntry]) {
        screens::draw_standings(&mut self.canvas, standings);
        self.canvas.present();
    }

    fn logo(&mut self, team: &str, flip: bool) -> Option<Arc<RgbImage>> {
        match self.logos.team_logo(&self.settings.league, team, flip) {
            Ok(logo) => Some(logo),
            Err(e) => {
                warn!("No logo for {} ({}): {}", team, self.settings.league, e);
                None
            }
        }
    }

    /// Wait for the first matches, then rotate matches and standings until
    /// shutdown.
    pub async fn run(mut self, store: SnapshotStore, mut stop: watch::Receiver<bool>) -> Self {
        info!("Waiting for initial data...");
        while store.latest().0.is_empty() {
            if pause(self.settings.idle_poll, &mut stop).await {
                return self;
            }
        }
        info!("Initial data loaded!");

        loop {
            let mut drawn = false;

            let (matches, _) = store.latest();
            for record in matches.iter() {
                if self.show_match(record) {
                    drawn = true;
                    if pause(self.settings.match_display, &mut stop).await {
                        return self;
                    }
                }
            }

            let (_, standings) = store.latest();
            if !standings.is_empty() {
                self.show_standings(&standings);
                drawn = true;
                if pause(self.settings.standings_display, &mut stop).await {
                    return self;
                }
            }

            // Nothing drawable this rotation: idle instead of spinning.
            if !drawn && pause(self.settings.idle_poll, &mut stop).await {
                return self;
            }
        }
    }
}

/// Sleep for `period`; `true` if shutdown arrived first.
async fn pause(period: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(period) => false,
        _ = shutdown::requested(stop) => true,
    }
}
