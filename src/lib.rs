//! Live soccer scores and league standings for a 64x32 LED matrix.
//!
//! A background [`updater::DayLockUpdater`] polls the ESPN API and publishes
//! into a [`snapshot::SnapshotStore`]; the [`display`] loop reads that store on
//! its own cadence and draws onto a [`display::Canvas`].

pub mod config;
pub mod dates;
pub mod display;
pub mod feed;
pub mod models;
pub mod shutdown;
pub mod snapshot;
pub mod updater;
