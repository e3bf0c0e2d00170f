use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use ground_track::config::{TrackerArgs, TrackerConfig};
use ground_track::orbital::{Propagator, TleSatellite};
use ground_track::playback::{run_blocking, LogSurface, Scheduler, TrailRenderer};
use ground_track::track::{self, TrackSummary, TrajectorySeries};

/// Predict a satellite ground track and play it back headless.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    tracker: TrackerArgs,

    /// Print the report and skip playback
    #[arg(long)]
    no_playback: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.tracker.into_config()?;

    // -----------------------------------------------------------------------
    // Startup: elements + full sampling pass
    // -----------------------------------------------------------------------
    let satellite = TleSatellite::from_lines(&config.name, &config.line1, &config.line2)
        .context("parsing two-line elements")?
        .with_validity(config.validity);
    let series = track::sample(&satellite, &config.sampler(Utc::now()))
        .context("sampling trajectory")?;

    print_report(&satellite, &config, &series);

    if cli.no_playback {
        return Ok(());
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------
    let renderer = TrailRenderer::new(config.surface);
    let mut scheduler = Scheduler::new(series, renderer);
    let mut display = LogSurface::new();
    let mut charts = LogSurface::new();
    let played = run_blocking(&mut scheduler, &mut display, &mut charts, config.tick_period);

    println!("  Playback: {} ticks every {} ms", played, config.tick_period.as_millis());
    println!("  Last telemetry:");
    for line in display.summary().lines() {
        println!("    {}", line);
    }
    println!("====================================================================");
    println!();
    Ok(())
}

fn print_report(satellite: &TleSatellite, config: &TrackerConfig, series: &TrajectorySeries) {
    println!();
    println!("====================================================================");
    println!("  GROUND TRACK PREDICTION — {}", satellite.name());
    println!("====================================================================");
    println!();
    println!("  Elements");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Epoch:         {}    Inclination: {:>8.2} deg",
        satellite.epoch().format("%Y-%m-%d %H:%M:%S"),
        satellite.inclination_deg()
    );
    println!(
        "  Mean motion:   {:>8.4} rev/day       Period:      {:>8.1} min",
        satellite.mean_motion(),
        satellite.period().num_seconds() as f64 / 60.0
    );
    println!();

    let Some(summary) = TrackSummary::from_series(series) else {
        println!("  (empty horizon)");
        return;
    };

    println!("  Track Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Samples:       {:>8}          Interval:    {:>8} s",
        summary.samples,
        config.interval.num_seconds()
    );
    println!(
        "  Latitude:      {:>8.2} .. {:>7.2} deg",
        summary.min_latitude, summary.max_latitude
    );
    println!(
        "  Altitude:      {:>8.1} .. {:>7.1} km",
        summary.min_altitude_km, summary.max_altitude_km
    );
    println!(
        "  Speed:         {:>8.3} .. {:>7.3} km/s (mean {:.3})",
        summary.min_speed_km_s, summary.max_speed_km_s, summary.mean_speed_km_s
    );
    println!(
        "  Span:          {:>8.1} h",
        summary.duration.num_seconds() as f64 / 3600.0
    );
    println!();

    // -----------------------------------------------------------------------
    // Track table (sampled)
    // -----------------------------------------------------------------------
    println!("  Track");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>19}  {:>8}  {:>8}  {:>8}  {:>8}",
        "time (UTC)", "lat", "lon", "alt (km)", "v (km/s)"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (series.len() / 30).max(1);
    for (i, s) in series.iter().enumerate() {
        if i % sample_interval != 0 && i != series.len() - 1 {
            continue;
        }
        println!(
            "  {:>19}  {:>8.2}  {:>8.2}  {:>8.1}  {:>8.3}",
            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
            s.latitude,
            s.longitude,
            s.altitude_km,
            s.speed_km_s
        );
    }
    println!();
}
