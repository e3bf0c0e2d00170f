use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use ground_track::config::TrackerArgs;
use ground_track::map::{load_map, MapImage};
use ground_track::orbital::{Propagator, TleSatellite};
use ground_track::playback::{
    AxisBounds, ChartChannel, ChartSurface, DisplaySurface, Scheduler, TickOutcome, TrailMark,
    TrailRenderer,
};
use ground_track::track;
use ground_track::TrackerError;

/// Animated ground track with live speed/altitude charts.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    tracker: TrackerArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().tracker.into_config()?;
    let (width, height) = (config.surface.width as u32, config.surface.height as u32);

    // Everything that can fail happens before the window opens
    let map = load_map(&config.map, width, height).context("loading map image")?;
    let satellite = TleSatellite::from_lines(&config.name, &config.line1, &config.line2)
        .context("parsing two-line elements")?
        .with_validity(config.validity);
    let series = track::sample(&satellite, &config.sampler(Utc::now()))
        .context("sampling trajectory")?;

    let title = format!("{} Trajectory & Telemetry", satellite.name());
    let app = TrackViz {
        scheduler: Scheduler::new(series, TrailRenderer::new(config.surface)),
        canvas: MapCanvas::default(),
        charts: ChartPanel::default(),
        map,
        texture: None,
        period: config.tick_period,
        next_tick: Instant::now(),
        finished: false,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };
    eframe::run_native(&title, options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| TrackerError::Render(e.to_string()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Surfaces backed by egui state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MapCanvas {
    marks: Vec<TrailMark>,
    summary: String,
}

impl DisplaySurface for MapCanvas {
    fn draw_marker(&mut self, mark: &TrailMark) {
        self.marks.push(*mark);
    }

    fn set_summary(&mut self, text: &str) {
        self.summary = text.to_string();
    }
}

struct ChannelView {
    label: String,
    points: Vec<[f64; 2]>,
    bounds: AxisBounds,
}

#[derive(Default)]
struct ChartPanel {
    channels: Vec<ChannelView>,
}

impl ChartSurface for ChartPanel {
    fn update_channel(&mut self, channel: &ChartChannel) {
        let label = format!("{} ({})", channel.name(), channel.unit());
        let view = ChannelView {
            label,
            points: channel.series().points().collect(),
            bounds: channel.bounds(),
        };
        match self.channels.iter_mut().find(|c| c.label == view.label) {
            Some(existing) => *existing = view,
            None => self.channels.push(view),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

struct TrackViz {
    scheduler: Scheduler,
    canvas: MapCanvas,
    charts: ChartPanel,
    map: MapImage,
    texture: Option<egui::TextureHandle>,
    period: Duration,
    next_tick: Instant,
    finished: bool,
}

impl TrackViz {
    /// At most one tick per frame, and only once the period has elapsed.
    fn advance(&mut self, ctx: &egui::Context) {
        if self.finished {
            return;
        }
        let now = Instant::now();
        if now >= self.next_tick {
            if self.scheduler.tick(&mut self.canvas, &mut self.charts) == TickOutcome::Done {
                self.finished = true;
                return;
            }
            self.next_tick = now + self.period;
        }
        ctx.request_repaint_after(self.next_tick.saturating_duration_since(now));
    }
}

impl eframe::App for TrackViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance(ctx);

        let map = &self.map;
        let texture = self.texture.get_or_insert_with(|| {
            let image = egui::ColorImage::from_rgb(
                [map.width as usize, map.height as usize],
                &map.rgb_bytes(),
            );
            ctx.load_texture("world-map", image, egui::TextureOptions::LINEAR)
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                // Map with trail
                let size = egui::vec2(map.width as f32, map.height as f32);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                let rect = response.rect;
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
                for mark in &self.canvas.marks {
                    let [r, g, b] = mark.color;
                    painter.circle_filled(
                        rect.min + egui::vec2(mark.point.x as f32, mark.point.y as f32),
                        mark.radius as f32,
                        egui::Color32::from_rgb(r, g, b),
                    );
                }
            });

            // Telemetry text
            let summary = if self.canvas.summary.is_empty() {
                "Initializing..."
            } else {
                self.canvas.summary.as_str()
            };
            ui.label(egui::RichText::new(summary).size(14.0));
            ui.separator();

            // Live charts
            let chart_h = (ui.available_height() / 2.0 - 8.0).max(60.0);
            let colors = [egui::Color32::BLUE, egui::Color32::GREEN];
            for (view, color) in self.charts.channels.iter().zip(colors) {
                let b = view.bounds;
                Plot::new(view.label.as_str())
                    .height(chart_h)
                    .legend(Legend::default())
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .x_axis_label("Tick")
                    .show(ui, |plot_ui| {
                        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                            [b.x_min, b.y_min],
                            [b.x_max, b.y_max],
                        ));
                        let points = PlotPoints::from(view.points.clone());
                        plot_ui.line(Line::new(view.label.as_str(), points).color(color));
                    });
            }
        });
    }
}
