use chrono::{DateTime, Duration, Utc};

// ---------------------------------------------------------------------------
// One predicted point of the ground track
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,    // deg, [-90, 90]
    pub longitude: f64,   // deg, [-180, 180]
    pub altitude_km: f64,
    pub speed_km_s: f64,
}

// ---------------------------------------------------------------------------
// Complete, evenly spaced series
// ---------------------------------------------------------------------------

/// Time-ordered samples at a fixed interval. Length is fixed at creation.
///
/// Only the sampler constructs one, and only once every instant succeeded.
#[derive(Debug, Clone)]
pub struct TrajectorySeries {
    samples: Vec<TrajectorySample>,
    interval: Duration,
}

impl TrajectorySeries {
    pub(crate) fn new(samples: Vec<TrajectorySample>, interval: Duration) -> Self {
        debug_assert!(samples
            .windows(2)
            .all(|w| w[1].timestamp - w[0].timestamp == interval));
        Self { samples, interval }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrajectorySample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.timestamp)
    }
}

impl std::ops::Index<usize> for TrajectorySeries {
    type Output = TrajectorySample;

    fn index(&self, index: usize) -> &TrajectorySample {
        &self.samples[index]
    }
}

impl<'a> IntoIterator for &'a TrajectorySeries {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
