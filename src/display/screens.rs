//! Screen layouts for a 64x32 panel.

use chrono_tz::Tz;
use image::RgbImage;

use super::{Canvas, Color, Font};
use crate::dates::format_kickoff;
use crate::models::{MatchStatus, MatchSummary, StandingsEntry};

pub const LOGO_SIZE: u32 = 32;
pub const STANDINGS_ROWS: usize = 4;

const LOGO_A_X: i32 = -15;
const LOGO_B_X: i32 = 47;

const RED_CARD_TOP: i32 = 10;
const RED_CARD_BOTTOM: i32 = 13;
const MAX_RED_CARDS: u32 = 3;

/// Match screen; scheduled kickoffs are shown in `tz`.
pub fn draw_match(
    canvas: &mut dyn Canvas,
    summary: &MatchSummary,
    logo_a: Option<&RgbImage>,
    logo_b: Option<&RgbImage>,
    tz: Tz,
) {
    canvas.clear();

    let score = summary.score();
    match &summary.status {
        MatchStatus::Scheduled => {
            let (time, date) = summary
                .kickoff
                .map(|kickoff| format_kickoff(kickoff, &tz))
                .unwrap_or_else(|| ("--:--".to_string(), "--/--".to_string()));
            canvas.draw_text(Font::Small, 20, 7, Color::WHITE, &time);
            canvas.draw_text(Font::Large, 27, 20, Color::RED, "VS");
            canvas.draw_text(Font::Small, 20, 31, Color::WHITE, &date);
        }
        MatchStatus::HalfTime => draw_result(canvas, "HT", &score),
        MatchStatus::FullTime => draw_result(canvas, "FT", &score),
        MatchStatus::Live(label) => {
            let x = if label.chars().count() > 3 { 18 } else { 27 };
            canvas.draw_text(Font::Large, x, 8, Color::WHITE, label);
            canvas.draw_text(Font::Large, 24, 22, Color::WHITE, &score);
        }
    }

    draw_red_cards(canvas, summary.red_cards_a, summary.red_cards_b);

    if let Some(logo) = logo_a {
        canvas.set_image(logo, LOGO_A_X, 0);
    }
    if let Some(logo) = logo_b {
        canvas.set_image(logo, LOGO_B_X, 0);
    }
}

fn draw_result(canvas: &mut dyn Canvas, label: &str, score: &str) {
    canvas.draw_text(Font::Large, 27, 8, Color::RED, label);
    canvas.draw_text(Font::Large, 24, 22, Color::WHITE, score);
}

/// 2x3 red blocks just above the score, at most three per side. Team A grows
/// leftwards from x=24, team B rightwards from x=39.
pub fn draw_red_cards(canvas: &mut dyn Canvas, red_a: u32, red_b: u32) {
    for i in 0..red_a.min(MAX_RED_CARDS) as i32 {
        fill_card(canvas, 24 - i * 3);
    }
    for i in 0..red_b.min(MAX_RED_CARDS) as i32 {
        fill_card(canvas, 39 + i * 3);
    }
}

fn fill_card(canvas: &mut dyn Canvas, start_x: i32) {
    for x in start_x..start_x + 2 {
        for y in RED_CARD_TOP..RED_CARD_BOTTOM {
            canvas.set_pixel(x, y, Color::RED);
        }
    }
}

/// Top of the table: rank, team and points per row.
pub fn draw_standings(canvas: &mut dyn Canvas, standings: &[StandingsEntry]) {
    canvas.clear();

    for (i, entry) in standings.iter().take(STANDINGS_ROWS).enumerate() {
        let y = 7 + i as i32 * 8;
        canvas.draw_text(Font::Small, 2, y, Color::RED, &format!("{}.", entry.rank));
        canvas.draw_text(Font::Small, 18, y, Color::WHITE, &entry.team);

        let points = entry.points.to_string();
        let x_adj = if points.len() > 1 { 0 } else { 4 };
        canvas.draw_text(Font::Small, 50 + x_adj, y, Color::WHITE, &points);
    }
}

/// League logo centred on the panel.
pub fn draw_startup(canvas: &mut dyn Canvas, league_logo: &RgbImage) {
    canvas.clear();
    let x = (canvas.width() - league_logo.width() as i32) / 2;
    let y = (canvas.height() - league_logo.height() as i32) / 2;
    canvas.set_image(league_logo, x, y);
}
