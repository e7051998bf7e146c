use chrono_tz::Tz;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// LED matrix scoreboard for live soccer matches and league standings
#[derive(Parser, Debug, Clone)]
#[command(name = "led-scoreboard", version, about)]
pub struct Config {
    /// League identifier as used by the ESPN API (e.g. "bel", "eng", "esp")
    #[arg(short, long, env = "LEAGUE", default_value = "bel")]
    pub league: String,

    /// Pin the forward scan to a start date, MMDD (rolled to next year if already past)
    #[arg(short, long, env = "DATE")]
    pub date: Option<String>,

    /// IANA timezone kickoff times are shown in
    #[arg(long, env = "TIMEZONE", default_value = "Europe/Brussels")]
    pub timezone: String,

    /// ESPN site API base URL (scoreboard and teams endpoints)
    #[arg(
        long,
        env = "API_BASE_URL",
        default_value = "https://site.api.espn.com/apis/site/v2/sports/soccer"
    )]
    pub api_base_url: String,

    /// ESPN standings API base URL
    #[arg(
        long,
        env = "STANDINGS_BASE_URL",
        default_value = "https://site.web.api.espn.com/apis/v2/sports/soccer"
    )]
    pub standings_base_url: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "API_TIMEOUT_SECS", default_value = "15")]
    pub api_timeout_secs: u64,

    /// Number of consecutive days a forward scan may probe
    #[arg(long, env = "MAX_DAYS_AHEAD", default_value = "5")]
    pub max_days_ahead: u32,

    /// Seconds between two updater cycles
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "5")]
    pub refresh_interval_secs: u64,

    /// Seconds each match screen stays up
    #[arg(long, env = "MATCH_DISPLAY_SECS", default_value = "10")]
    pub match_display_secs: u64,

    /// Seconds the standings screen stays up
    #[arg(long, env = "STANDINGS_DISPLAY_SECS", default_value = "10")]
    pub standings_display_secs: u64,

    /// Root directory of the team logos ({logos_dir}/{league}/{TEAM}.png)
    #[arg(long, env = "LOGOS_DIR", default_value = "assets/logos")]
    pub logos_dir: PathBuf,

    /// Maximum number of decoded logos kept in memory
    #[arg(long, env = "LOGO_CACHE_SIZE", default_value = "32")]
    pub logo_cache_size: usize,

    /// Matrix width in pixels
    #[arg(long, env = "MATRIX_COLS", default_value = "64")]
    pub matrix_cols: u32,

    /// Matrix height in pixels
    #[arg(long, env = "MATRIX_ROWS", default_value = "32")]
    pub matrix_rows: u32,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.league.trim().is_empty() {
            anyhow::bail!("league must not be empty");
        }
        if self.api_timeout_secs == 0 {
            anyhow::bail!("api_timeout_secs must be positive");
        }
        if self.max_days_ahead == 0 {
            anyhow::bail!("max_days_ahead must be at least 1");
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be positive");
        }
        if self.match_display_secs == 0 || self.standings_display_secs == 0 {
            anyhow::bail!("display durations must be positive");
        }
        if self.logo_cache_size == 0 {
            anyhow::bail!("logo_cache_size must be at least 1");
        }
        // Screen layouts are laid out for a single 64x32 panel.
        if self.matrix_cols < 64 || self.matrix_rows < 32 {
            anyhow::bail!(
                "matrix must be at least 64x32, got {}x{}",
                self.matrix_cols,
                self.matrix_rows
            );
        }
        self.timezone()?;
        url::Url::parse(&self.api_base_url)
            .map_err(|e| anyhow::anyhow!("invalid api_base_url '{}': {}", self.api_base_url, e))?;
        url::Url::parse(&self.standings_base_url).map_err(|e| {
            anyhow::anyhow!(
                "invalid standings_base_url '{}': {}",
                self.standings_base_url,
                e
            )
        })?;
        Ok(())
    }

    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("unknown timezone '{}': {}", self.timezone, e))
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn match_display(&self) -> Duration {
        Duration::from_secs(self.match_display_secs)
    }

    pub fn standings_display(&self) -> Duration {
        Duration::from_secs(self.standings_display_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["led-scoreboard"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        let config = parse(&["--league", "eng"]);
        assert_eq!(config.league, "eng");
        assert_eq!(config.max_days_ahead, 5);
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.timezone().unwrap(), Tz::Europe__Brussels);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timezone_flag() {
        let config = parse(&["--league", "eng", "--timezone", "Europe/London"]);
        assert_eq!(config.timezone().unwrap(), Tz::Europe__London);

        let config = parse(&["--league", "eng", "--timezone", "Mars/Olympus"]);
        assert!(config.timezone().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&["-l", "esp", "-d", "1224"]);
        assert_eq!(config.league, "esp");
        assert_eq!(config.date.as_deref(), Some("1224"));
    }

    #[test]
    fn test_rejects_zero_scan_window() {
        let config = parse(&["--league", "bel", "--max-days-ahead", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_small_matrix() {
        let config = parse(&["--league", "bel", "--matrix-cols", "32"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = parse(&["--league", "bel", "--api-base-url", "not a url"]);
        assert!(config.validate().is_err());
    }
}
