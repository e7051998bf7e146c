//! Team and league logos, decoded once and kept in a small LRU.
//!
//! Logos live at `{root}/{league}/{TEAM}.png`; a team without its own file
//! gets `{root}/{league}/league_logo.png`.

use image::imageops::{self, FilterType};
use image::RgbImage;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const LEAGUE_LOGO: &str = "league_logo";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LogoKey {
    league: String,
    team: String,
    flip: bool,
}

pub struct LogoCache {
    root: PathBuf,
    /// Logos are scaled to `size` x `size`
    size: u32,
    capacity: usize,
    entries: HashMap<LogoKey, Arc<RgbImage>>,
    /// Least recently used at the front
    order: VecDeque<LogoKey>,
}

impl LogoCache {
    pub fn new(root: impl Into<PathBuf>, size: u32, capacity: usize) -> Self {
        LogoCache {
            root: root.into(),
            size,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logo for `team`, mirrored left-to-right when `flip` is set.
    pub fn team_logo(
        &mut self,
        league: &str,
        team: &str,
        flip: bool,
    ) -> Result<Arc<RgbImage>, AssetError> {
        let key = LogoKey {
            league: league.to_string(),
            team: team.to_string(),
            flip,
        };
        if let Some(logo) = self.entries.get(&key).cloned() {
            self.touch(&key);
            return Ok(logo);
        }

        let logo = Arc::new(self.load(&self.path_for(league, team), flip)?);
        self.insert(key, Arc::clone(&logo));
        Ok(logo)
    }

    pub fn league_logo(&mut self, league: &str) -> Result<Arc<RgbImage>, AssetError> {
        self.team_logo(league, LEAGUE_LOGO, false)
    }

    fn path_for(&self, league: &str, team: &str) -> PathBuf {
        let dir = self.root.join(league);
        let valid = !team.is_empty() && team.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let own = dir.join(format!("{}.png", team));
        if valid && own.exists() {
            own
        } else {
            dir.join(format!("{}.png", LEAGUE_LOGO))
        }
    }

    fn load(&self, path: &Path, flip: bool) -> Result<RgbImage, AssetError> {
        debug!("Loading logo {}", path.display());
        let img = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(source) => AssetError::Io {
                path: path.to_path_buf(),
                source,
            },
            source => AssetError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let img = if img.width() == self.size && img.height() == self.size {
            img
        } else {
            img.resize_exact(self.size, self.size, FilterType::Triangle)
        };
        let rgb = img.to_rgb8();
        Ok(if flip { imageops::flip_horizontal(&rgb) } else { rgb })
    }

    fn touch(&mut self, key: &LogoKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn insert(&mut self, key: LogoKey, logo: Arc<RgbImage>) {
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, logo);
    }
}
