use chrono::Duration;

use super::sample::TrajectorySeries;

/// Summary statistics computed from a predicted ground track.
#[derive(Debug, Clone)]
pub struct TrackSummary {
    pub samples: usize,
    pub duration: Duration,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_altitude_km: f64,
    pub max_altitude_km: f64,
    pub min_speed_km_s: f64,
    pub max_speed_km_s: f64,
    pub mean_speed_km_s: f64,
}

impl TrackSummary {
    /// Compute summary from a series. `None` for an empty series.
    pub fn from_series(series: &TrajectorySeries) -> Option<Self> {
        let first = series.get(0)?;
        let last = series.get(series.len() - 1)?;

        let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_alt, mut max_alt) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        let mut sum_v = 0.0;

        for s in series {
            min_lat = min_lat.min(s.latitude);
            max_lat = max_lat.max(s.latitude);
            min_alt = min_alt.min(s.altitude_km);
            max_alt = max_alt.max(s.altitude_km);
            min_v = min_v.min(s.speed_km_s);
            max_v = max_v.max(s.speed_km_s);
            sum_v += s.speed_km_s;
        }

        Some(TrackSummary {
            samples: series.len(),
            duration: last.timestamp - first.timestamp,
            min_latitude: min_lat,
            max_latitude: max_lat,
            min_altitude_km: min_alt,
            max_altitude_km: max_alt,
            min_speed_km_s: min_v,
            max_speed_km_s: max_v,
            mean_speed_km_s: sum_v / series.len() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::sample::tests::synthetic_series;

    #[test]
    fn summary_of_synthetic_track() {
        let series = synthetic_series(100);
        let s = TrackSummary::from_series(&series).unwrap();
        assert_eq!(s.samples, 100);
        assert_eq!(s.duration, Duration::minutes(99));
        assert!((s.min_altitude_km - 410.0).abs() < 1e-9);
        assert!((s.max_altitude_km - 416.0).abs() < 1e-9);
        assert!(s.max_latitude <= 10.0 && s.min_latitude >= -10.0);
        assert!(s.min_speed_km_s <= s.mean_speed_km_s && s.mean_speed_km_s <= s.max_speed_km_s);
    }

    #[test]
    fn single_sample_has_zero_duration() {
        let s = TrackSummary::from_series(&synthetic_series(1)).unwrap();
        assert_eq!(s.duration, Duration::zero());
        assert_eq!(s.min_speed_km_s, s.max_speed_km_s);
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert!(TrackSummary::from_series(&synthetic_series(0)).is_none());
    }
}
