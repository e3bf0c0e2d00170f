use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::surface::DisplaySurface;
use crate::geo::{project, DisplayPoint, SurfaceSize};
use crate::track::TrajectorySample;

pub const MARKER_RADIUS: f64 = 2.0; // px

// ---------------------------------------------------------------------------
// Append-only trail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailMark {
    pub tick: usize,
    pub point: DisplayPoint,
    pub color: [u8; 3],
    pub radius: f64,
}

/// Every marker drawn so far, oldest first. There is no way to remove one.
#[derive(Debug, Default, Clone)]
pub struct Trail {
    marks: Vec<TrailMark>,
}

impl Trail {
    pub fn with_capacity(n: usize) -> Self {
        Self { marks: Vec::with_capacity(n) }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn marks(&self) -> &[TrailMark] {
        &self.marks
    }

    pub fn last(&self) -> Option<&TrailMark> {
        self.marks.last()
    }

    fn push(&mut self, mark: TrailMark) {
        self.marks.push(mark);
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Projects each sample onto the map and draws one marker for it.
pub struct TrailRenderer {
    size: SurfaceSize,
    rng: StdRng,
}

impl TrailRenderer {
    pub fn new(size: SurfaceSize) -> Self {
        Self { size, rng: StdRng::from_entropy() }
    }

    /// Fixed color sequence, for tests and reproducible screenshots.
    pub fn with_seed(size: SurfaceSize, seed: u64) -> Self {
        Self { size, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn render(
        &mut self,
        trail: &mut Trail,
        tick: usize,
        sample: &TrajectorySample,
        display: &mut dyn DisplaySurface,
    ) {
        let mark = TrailMark {
            tick,
            point: project(sample.latitude, sample.longitude, self.size),
            color: trail_color(&mut self.rng, tick),
            radius: MARKER_RADIUS,
        };
        trail.push(mark);
        display.draw_marker(&mark);
        display.set_summary(&telemetry_text(sample));
    }
}

/// Random red/green in [50, 255]; blue fades with tick so older marks read bluer.
pub fn trail_color<R: Rng>(rng: &mut R, tick: usize) -> [u8; 3] {
    let fade = (tick / 6).min(255) as u8;
    [rng.gen_range(50..=255), rng.gen_range(50..=255), 255 - fade]
}

/// Text panel contents for the current sample.
pub fn telemetry_text(sample: &TrajectorySample) -> String {
    format!(
        "Time (UTC): {}\nLat: {:.2}°, Lon: {:.2}°\nSpeed: {:.2} km/s\nAltitude: {:.2} km",
        sample.timestamp.format("%Y-%m-%d %H:%M:%S"),
        sample.latitude,
        sample.longitude,
        sample.speed_km_s,
        sample.altitude_km
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::surface::RecordingSurface;
    use crate::track::sample::tests::synthetic_series;

    const MAP: SurfaceSize = SurfaceSize { width: 800.0, height: 400.0 };

    #[test]
    fn blue_channel_never_increases() {
        let mut rng = StdRng::seed_from_u64(7);
        let blues: Vec<u8> = (0..3000).map(|i| trail_color(&mut rng, i)[2]).collect();
        assert_eq!(blues[0], 255);
        assert!(blues.windows(2).all(|w| w[1] <= w[0]));
        // Clamped instead of wrapping on long horizons
        assert_eq!(blues[1530], 0);
        assert_eq!(blues[2999], 0);
    }

    #[test]
    fn red_green_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for i in 0..500 {
            let [r, g, _] = trail_color(&mut rng, i);
            assert!(r >= 50 && g >= 50);
        }
    }

    #[test]
    fn render_appends_one_mark_and_overwrites_text() {
        let series = synthetic_series(3);
        let mut renderer = TrailRenderer::with_seed(MAP, 42);
        let mut trail = Trail::default();
        let mut surface = RecordingSurface::default();

        for (i, s) in series.iter().enumerate() {
            renderer.render(&mut trail, i, s, &mut surface);
            assert_eq!(trail.len(), i + 1);
        }

        assert_eq!(surface.marks.as_slice(), trail.marks());
        assert_eq!(surface.summaries.len(), 3);
        let expected = project(series[2].latitude, series[2].longitude, MAP);
        assert_eq!(trail.last().unwrap().point, expected);
        assert_eq!(trail.last().unwrap().radius, MARKER_RADIUS);
        // Earlier marks untouched
        assert_eq!(trail.marks()[0].tick, 0);
        assert_eq!(
            trail.marks()[0].point,
            project(series[0].latitude, series[0].longitude, MAP)
        );
    }

    #[test]
    fn telemetry_text_format() {
        let series = synthetic_series(1);
        let text = telemetry_text(&series[0]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Time (UTC): 2025-06-08 00:00:00");
        assert_eq!(lines[1], "Lat: 0.00°, Lon: -180.00°");
        assert_eq!(lines[2], "Speed: 7.66 km/s");
        assert_eq!(lines[3], "Altitude: 410.00 km");
    }
}
