use super::surface::ChartSurface;
use crate::track::TrajectorySample;

/// Smallest visible x range, in ticks, so the axis never collapses at startup.
pub const MIN_WINDOW_TICKS: f64 = 20.0;
pub const SPEED_PAD: f64 = 0.5;     // km/s
pub const ALTITUDE_PAD: f64 = 10.0; // km

// ---------------------------------------------------------------------------
// Growing (tick, value) series
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct ChartSeries {
    ticks: Vec<f64>,
    values: Vec<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl ChartSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            ticks: Vec::with_capacity(n),
            values: Vec::with_capacity(n),
            min: None,
            max: None,
        }
    }

    pub fn push(&mut self, tick: usize, value: f64) {
        self.ticks.push(tick as f64);
        self.values.push(value);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.ticks.len(), self.values.len());
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `[tick, value]` pairs, the shape plotting libraries take.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.ticks.iter().zip(&self.values).map(|(&t, &v)| [t, v])
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

// ---------------------------------------------------------------------------
// Axis bounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisBounds {
    /// x: `[0, max(MIN_WINDOW_TICKS, tick + 1)]`, y: data range widened by `pad`.
    ///
    /// `pad` keeps a single-point or flat series from producing a zero-height range.
    pub fn fit(tick: usize, series: &ChartSeries, pad: f64) -> Self {
        let (lo, hi) = match (series.min(), series.max()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0.0, 0.0),
        };
        AxisBounds {
            x_min: 0.0,
            x_max: MIN_WINDOW_TICKS.max(tick as f64 + 1.0),
            y_min: lo - pad,
            y_max: hi + pad,
        }
    }
}

// ---------------------------------------------------------------------------
// Named channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ChartChannel {
    name: &'static str,
    unit: &'static str,
    pad: f64,
    series: ChartSeries,
    bounds: AxisBounds,
}

impl ChartChannel {
    pub fn new(name: &'static str, unit: &'static str, pad: f64, capacity: usize) -> Self {
        let series = ChartSeries::with_capacity(capacity);
        let bounds = AxisBounds::fit(0, &series, pad);
        Self { name, unit, pad, series, bounds }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn unit(&self) -> &str {
        self.unit
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn bounds(&self) -> AxisBounds {
        self.bounds
    }

    fn record(&mut self, tick: usize, value: f64) {
        self.series.push(tick, value);
        self.bounds = AxisBounds::fit(tick, &self.series, self.pad);
    }
}

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

/// Speed and altitude channels, one point each per tick.
#[derive(Debug, Clone)]
pub struct ChartUpdater {
    pub speed: ChartChannel,
    pub altitude: ChartChannel,
}

impl ChartUpdater {
    pub fn new(capacity: usize) -> Self {
        Self {
            speed: ChartChannel::new("Speed", "km/s", SPEED_PAD, capacity),
            altitude: ChartChannel::new("Altitude", "km", ALTITUDE_PAD, capacity),
        }
    }

    pub fn update(&mut self, tick: usize, sample: &TrajectorySample, charts: &mut dyn ChartSurface) {
        self.speed.record(tick, sample.speed_km_s);
        self.altitude.record(tick, sample.altitude_km);
        charts.update_channel(&self.speed);
        charts.update_channel(&self.altitude);
    }

    /// Points recorded so far (identical for both channels).
    pub fn len(&self) -> usize {
        self.speed.series().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
