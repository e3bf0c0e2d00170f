use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

use super::sample::{TrajectorySample, TrajectorySeries};
use crate::error::TrackerError;
use crate::orbital::{Propagator, TleSatellite};

// ---------------------------------------------------------------------------
// Sampling configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub start: DateTime<Utc>,
    pub horizon: usize,     // number of samples
    pub interval: Duration, // spacing between samples
}

impl SamplerConfig {
    /// Instant of sample `index`, or `None` if it is not representable.
    pub fn instant(&self, index: usize) -> Option<DateTime<Utc>> {
        let steps = i32::try_from(index).ok()?;
        let offset = self.interval.checked_mul(steps)?;
        self.start.checked_add_signed(offset)
    }

    /// Instant of the last sample. `None` for an empty or unrepresentable horizon.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.horizon.checked_sub(1).and_then(|last| self.instant(last))
    }
}

// ---------------------------------------------------------------------------
// Sampling pass
// ---------------------------------------------------------------------------

/// Propagate once per instant, in time order, and collect the full series.
///
/// Any failing instant aborts the pass: the caller never sees a series with gaps.
pub fn sample_with(
    propagator: &dyn Propagator,
    config: &SamplerConfig,
) -> Result<TrajectorySeries, TrackerError> {
    log::info!(
        "Sampling {} for {} points every {} s from {}",
        propagator.name(),
        config.horizon,
        config.interval.num_seconds(),
        config.start
    );
    // Reject a horizon whose tail instant overflows before any propagation
    if config.horizon > 0 && config.end().is_none() {
        return Err(
            TrackerError::propagation(config.start, "sample instant out of range")
                .at_index(config.horizon - 1),
        );
    }
    let started = Instant::now();

    let mut samples = Vec::with_capacity(config.horizon);
    for index in 0..config.horizon {
        let Some(instant) = config.instant(index) else {
            return Err(
                TrackerError::propagation(config.start, "sample instant out of range")
                    .at_index(index),
            );
        };
        let state = propagator
            .propagate(instant)
            .map_err(|e| e.at_index(index))?;

        samples.push(TrajectorySample {
            timestamp: instant,
            latitude: state.position.latitude,
            longitude: state.position.longitude,
            altitude_km: state.position.altitude_km,
            speed_km_s: state.speed(),
        });
    }

    log::info!(
        "Sampled {} points in {:.1} ms",
        samples.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    Ok(TrajectorySeries::new(samples, config.interval))
}

/// Sample the series for a satellite defined by a two-line element set.
///
/// Warns when the sampled span reaches instants where the elements are stale.
pub fn sample(
    satellite: &TleSatellite,
    config: &SamplerConfig,
) -> Result<TrajectorySeries, TrackerError> {
    let end = config.end().unwrap_or(config.start);
    if satellite.is_stale_at(config.start) || satellite.is_stale_at(end) {
        let age = config.start - satellite.epoch();
        log::warn!(
            "Elements for {} are stale: epoch {} is {} days from the sampled span, expect degraded accuracy",
            satellite.name(),
            satellite.epoch(),
            age.num_days().abs()
        );
    }
    sample_with(satellite, config)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::TimeZone;
    use nalgebra::Vector3;

    use super::*;
    use crate::config::{TrackerConfig, ISS_LINE1, ISS_LINE2, ISS_NAME};
    use crate::orbital::{Geodetic, GeodeticState};

    /// Circular orbit with a fixed inclination, ignoring Earth rotation.
    struct CircularOrbit {
        epoch: DateTime<Utc>,
        inclination_deg: f64,
        period_min: f64,
        calls: RefCell<Vec<DateTime<Utc>>>,
        fail_at: Option<DateTime<Utc>>,
    }

    impl CircularOrbit {
        fn new(epoch: DateTime<Utc>) -> Self {
            Self {
                epoch,
                inclination_deg: 51.64,
                period_min: 92.9,
                calls: RefCell::new(Vec::new()),
                fail_at: None,
            }
        }
    }

    impl Propagator for CircularOrbit {
        fn propagate(&self, instant: DateTime<Utc>) -> Result<GeodeticState, TrackerError> {
            self.calls.borrow_mut().push(instant);
            if Some(instant) == self.fail_at {
                return Err(TrackerError::propagation(instant, "injected"));
            }
            let minutes = (instant - self.epoch).num_seconds() as f64 / 60.0;
            let u = std::f64::consts::TAU * minutes / self.period_min;
            let inc = self.inclination_deg.to_radians();
            let latitude = (inc.sin() * u.sin()).asin().to_degrees();
            let longitude = crate::orbital::frames::wrap_longitude(
                (inc.cos() * u.sin()).atan2(u.cos()).to_degrees(),
            );
            Ok(GeodeticState {
                position: Geodetic { latitude, longitude, altitude_km: 420.0 },
                velocity: Vector3::new(0.0, 7.66 * u.cos(), 7.66 * u.sin()),
            })
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 8, 1, 41, 33).unwrap()
    }

    fn day_config(start: DateTime<Utc>) -> SamplerConfig {
        SamplerConfig {
            start,
            horizon: 1440,
            interval: Duration::minutes(1),
        }
    }

    #[test]
    fn series_has_exact_horizon_and_spacing() {
        let orbit = CircularOrbit::new(t0());
        let series = sample_with(&orbit, &day_config(t0())).unwrap();
        assert_eq!(series.len(), 1440);
        assert_eq!(series.start(), Some(t0()));
        for w in series.as_slice().windows(2) {
            assert_eq!(w[1].timestamp - w[0].timestamp, Duration::minutes(1));
        }
    }

    #[test]
    fn propagator_called_once_per_instant_in_order() {
        let orbit = CircularOrbit::new(t0());
        let config = SamplerConfig { start: t0(), horizon: 10, interval: Duration::seconds(30) };
        sample_with(&orbit, &config).unwrap();
        let calls = orbit.calls.borrow();
        assert_eq!(calls.len(), 10);
        for (i, t) in calls.iter().enumerate() {
            assert_eq!(Some(*t), config.instant(i));
        }
    }

    #[test]
    fn speed_is_velocity_norm() {
        let orbit = CircularOrbit::new(t0());
        let series = sample_with(&orbit, &day_config(t0())).unwrap();
        assert!(series.iter().all(|s| (s.speed_km_s - 7.66).abs() < 1e-9));
    }

    #[test]
    fn failure_midway_yields_no_series() {
        let mut orbit = CircularOrbit::new(t0());
        let config = day_config(t0());
        orbit.fail_at = config.instant(700);
        let err = sample_with(&orbit, &config).unwrap_err();
        match err {
            TrackerError::Propagation { index, instant, .. } => {
                assert_eq!(index, Some(700));
                assert_eq!(Some(instant), config.instant(700));
            }
            other => panic!("expected propagation error, got {other:?}"),
        }
        // No retries, no calls past the failure
        assert_eq!(orbit.calls.borrow().len(), 701);
    }

    #[test]
    fn zero_horizon_is_empty() {
        let orbit = CircularOrbit::new(t0());
        let config = SamplerConfig { start: t0(), horizon: 0, interval: Duration::minutes(1) };
        assert!(sample_with(&orbit, &config).unwrap().is_empty());
        assert_eq!(config.end(), None);
    }

    #[test]
    fn unrepresentable_horizon_fails_before_propagating() {
        let orbit = CircularOrbit::new(t0());
        let horizon = i32::MAX as usize + 2;
        let config = SamplerConfig { start: t0(), horizon, interval: Duration::seconds(1) };
        assert_eq!(config.instant(horizon - 1), None);
        let err = sample_with(&orbit, &config).unwrap_err();
        assert!(
            matches!(err, TrackerError::Propagation { index: Some(i), .. } if i == horizon - 1),
            "got {err:?}"
        );
        assert!(orbit.calls.borrow().is_empty());
    }

    #[test]
    fn instant_overflowing_calendar_is_none() {
        let config = SamplerConfig {
            start: t0(),
            horizon: 3,
            interval: Duration::days(100_000_000),
        };
        assert_eq!(config.instant(0), Some(t0()));
        assert_eq!(config.instant(2), None);
        assert_eq!(config.end(), None);
    }

    #[test]
    fn iss_day_stays_within_inclination_band() {
        let iss = TleSatellite::from_lines(ISS_NAME, ISS_LINE1, ISS_LINE2).unwrap();
        let series = sample(&iss, &day_config(iss.epoch())).unwrap();
        assert_eq!(series.len(), 1440);

        // Geodetic latitude runs up to ~0.2 deg past the geocentric inclination.
        let bound = iss.inclination_deg() + 0.5;
        for s in &series {
            assert!(s.latitude.abs() <= bound, "lat {} at {}", s.latitude, s.timestamp);
            assert!((-180.0..=180.0).contains(&s.longitude));
            assert!(s.speed_km_s > 7.5 && s.speed_km_s < 7.8, "speed {}", s.speed_km_s);
            assert!(s.altitude_km > 380.0 && s.altitude_km < 450.0, "alt {}", s.altitude_km);
        }

        // A full day covers both hemispheres near the band edge
        let max_lat = series.iter().map(|s| s.latitude).fold(f64::MIN, f64::max);
        let min_lat = series.iter().map(|s| s.latitude).fold(f64::MAX, f64::min);
        assert!(max_lat > 50.0 && min_lat < -50.0);
    }

    #[test]
    fn iss_sampling_is_deterministic() {
        let iss = TleSatellite::from_lines(ISS_NAME, ISS_LINE1, ISS_LINE2).unwrap();
        let config = SamplerConfig { start: iss.epoch(), horizon: 60, interval: Duration::minutes(1) };
        let a = sample(&iss, &config).unwrap();
        let b = sample(&iss, &config).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn iss_outside_validity_aborts() {
        let iss = TleSatellite::from_lines(ISS_NAME, ISS_LINE1, ISS_LINE2)
            .unwrap()
            .with_validity(Some(Duration::hours(12)));
        // Crosses the 12 h limit at sample 720 + 1
        let config = day_config(iss.epoch());
        let err = sample(&iss, &config).unwrap_err();
        assert!(matches!(err, TrackerError::Propagation { index: Some(721), .. }), "got {err:?}");
    }

    #[test]
    fn default_config_samples_long_after_epoch() {
        let config = TrackerConfig::default();
        let iss = TleSatellite::from_lines(&config.name, &config.line1, &config.line2)
            .unwrap()
            .with_validity(config.validity);
        // Over a year past the built-in element epoch
        let now = iss.epoch() + Duration::days(500);
        let sampler = config.sampler(now);
        assert!(iss.is_stale_at(sampler.start));

        let series = sample(&iss, &sampler).unwrap();
        assert_eq!(series.len(), config.horizon);
        assert_eq!(series.start(), Some(now));
    }

    #[test]
    fn explicit_window_still_refuses_stale_start() {
        let config = TrackerConfig::default();
        let iss = TleSatellite::from_lines(&config.name, &config.line1, &config.line2)
            .unwrap()
            .with_validity(Some(Duration::days(30)));
        let sampler = config.sampler(iss.epoch() + Duration::days(500));
        let err = sample(&iss, &sampler).unwrap_err();
        assert!(matches!(err, TrackerError::Propagation { index: Some(0), .. }), "got {err:?}");
    }
}
