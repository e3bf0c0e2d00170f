use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use clap::Args;

use crate::geo::SurfaceSize;
use crate::map::MapSource;
use crate::track::SamplerConfig;

// ---------------------------------------------------------------------------
// Built-in elements
// ---------------------------------------------------------------------------

pub const ISS_NAME: &str = "ISS (ZARYA)";
pub const ISS_LINE1: &str =
    "1 25544U 98067A   25159.07052714  .00008601  00000+0  15816-3 0  9996";
pub const ISS_LINE2: &str =
    "2 25544  51.6400 352.2516 0001632 195.4618 310.3088 15.50064259513748";

pub const DEFAULT_MAP_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/8/83/Equirectangular_projection_SW.jpg";

// ---------------------------------------------------------------------------
// Tracker configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub start: Option<DateTime<Utc>>, // None = wall clock at startup
    pub horizon: usize,               // samples
    pub interval: Duration,           // orbital time step
    pub tick_period: StdDuration,     // UI refresh, unrelated to `interval`
    pub surface: SurfaceSize,
    pub map: MapSource,
    pub validity: Option<Duration>,   // None = no propagation cutoff
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            name: ISS_NAME.into(),
            line1: ISS_LINE1.into(),
            line2: ISS_LINE2.into(),
            start: None,
            horizon: 1440,                            // 24 h
            interval: Duration::minutes(1),
            tick_period: StdDuration::from_millis(50), // 20 Hz
            surface: SurfaceSize::new(800.0, 400.0),
            map: MapSource::Url(DEFAULT_MAP_URL.into()),
            validity: None,
        }
    }
}

impl TrackerConfig {
    /// Sampler settings, resolving a missing start instant to `now`.
    pub fn sampler(&self, now: DateTime<Utc>) -> SamplerConfig {
        SamplerConfig {
            start: self.start.unwrap_or(now),
            horizon: self.horizon,
            interval: self.interval,
        }
    }
}

// ---------------------------------------------------------------------------
// Command-line flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Args)]
pub struct TrackerArgs {
    /// Satellite designation
    #[arg(long, default_value = ISS_NAME)]
    pub name: String,

    /// TLE line 1
    #[arg(long, default_value = ISS_LINE1, allow_hyphen_values = true)]
    pub line1: String,

    /// TLE line 2
    #[arg(long, default_value = ISS_LINE2, allow_hyphen_values = true)]
    pub line2: String,

    /// Start instant (RFC 3339); defaults to now
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Number of samples to predict
    #[arg(long, default_value_t = 1440)]
    pub horizon: usize,

    /// Seconds between samples
    #[arg(long, default_value_t = 60)]
    pub interval_secs: i64,

    /// Milliseconds between playback ticks (0 = as fast as possible)
    #[arg(long, default_value_t = 50)]
    pub tick_ms: u64,

    /// Map width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Map height in pixels
    #[arg(long, default_value_t = 400)]
    pub height: u32,

    /// Map image URL
    #[arg(long, default_value = DEFAULT_MAP_URL)]
    pub map_url: String,

    /// Local map image, used instead of --map-url
    #[arg(long)]
    pub map_file: Option<std::path::PathBuf>,

    /// Refuse propagation this many days from the element epoch
    #[arg(long)]
    pub validity_days: Option<i64>,
}

impl TrackerArgs {
    pub fn into_config(self) -> anyhow::Result<TrackerConfig> {
        if self.horizon == 0 {
            anyhow::bail!("horizon must be > 0");
        }
        if self.interval_secs <= 0 {
            anyhow::bail!("interval-secs must be > 0");
        }
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("map dimensions must be > 0");
        }
        if self.validity_days.is_some_and(|d| d <= 0) {
            anyhow::bail!("validity-days must be > 0");
        }

        let map = match self.map_file {
            Some(path) => MapSource::File(path),
            None => MapSource::Url(self.map_url),
        };

        Ok(TrackerConfig {
            name: self.name,
            line1: self.line1,
            line2: self.line2,
            start: self.start,
            horizon: self.horizon,
            interval: Duration::seconds(self.interval_secs),
            tick_period: StdDuration::from_millis(self.tick_ms),
            surface: SurfaceSize::new(f64::from(self.width), f64::from(self.height)),
            map,
            validity: self.validity_days.map(Duration::days),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        tracker: TrackerArgs,
    }

    #[test]
    fn defaults_match_config_defaults() {
        let cli = Cli::parse_from(["ground-track"]);
        let from_flags = cli.tracker.into_config().unwrap();
        let default = TrackerConfig::default();
        assert_eq!(from_flags.horizon, default.horizon);
        assert_eq!(from_flags.interval, default.interval);
        assert_eq!(from_flags.tick_period, default.tick_period);
        assert_eq!(from_flags.surface, default.surface);
        assert_eq!(from_flags.line1, default.line1);
        assert_eq!(from_flags.map, default.map);
        assert_eq!(from_flags.validity, None);
        assert_eq!(default.validity, None);
    }

    #[test]
    fn validity_window_is_opt_in() {
        let cli = Cli::parse_from(["ground-track", "--validity-days", "2"]);
        let config = cli.tracker.into_config().unwrap();
        assert_eq!(config.validity, Some(Duration::days(2)));

        let cli = Cli::parse_from(["ground-track", "--validity-days", "0"]);
        assert!(cli.tracker.into_config().is_err());
    }

    #[test]
    fn map_file_overrides_url() {
        let cli = Cli::parse_from(["ground-track", "--map-file", "world.png", "--horizon", "90"]);
        let config = cli.tracker.into_config().unwrap();
        assert_eq!(config.map, MapSource::File("world.png".into()));
        assert_eq!(config.horizon, 90);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let cli = Cli::parse_from(["ground-track", "--horizon", "0"]);
        assert!(cli.tracker.into_config().is_err());
    }

    #[test]
    fn explicit_start_is_kept() {
        let cli = Cli::parse_from(["ground-track", "--start", "2025-06-08T02:00:00Z"]);
        let config = cli.tracker.into_config().unwrap();
        let now = Utc::now();
        let sampler = config.sampler(now);
        assert_eq!(sampler.start.to_rfc3339(), "2025-06-08T02:00:00+00:00");
    }
}
