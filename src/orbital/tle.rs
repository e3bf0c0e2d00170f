//! Two-line element sets and the SGP4-backed propagator.
//!
//! The elements are parsed once; every call to [`Propagator::propagate`] is
//! independent of the previous one.

use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector3;

use super::frames::{self, Geodetic};
use crate::error::TrackerError;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Geodetic position and inertial velocity at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticState {
    pub position: Geodetic,
    pub velocity: Vector3<f64>, // km/s, TEME
}

impl GeodeticState {
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Anything that can answer "where is the satellite at this instant".
///
/// The sampler only talks to this trait, so synthetic orbits can stand in for SGP4.
pub trait Propagator {
    fn propagate(&self, instant: DateTime<Utc>) -> Result<GeodeticState, TrackerError>;

    /// Human-readable designation for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// A satellite defined by a two-line element set.
#[derive(Clone)]
pub struct TleSatellite {
    name: String,
    elements: sgp4::Elements,
    constants: sgp4::Constants,
    validity: Option<Duration>, // None = propagate any instant
}

impl TleSatellite {
    /// Elements this far from their epoch are flagged as stale.
    pub const STALE_AFTER_DAYS: i64 = 30;

    pub fn from_lines(name: &str, line1: &str, line2: &str) -> Result<Self, TrackerError> {
        let elements = sgp4::Elements::from_tle(
            Some(name.trim().to_string()),
            line1.trim().as_bytes(),
            line2.trim().as_bytes(),
        )
        .map_err(|e| TrackerError::decode(format!("elements for {}", name.trim()), e))?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| TrackerError::decode(format!("elements for {}", name.trim()), e))?;

        log::info!(
            "Loaded elements for {} (epoch {}, inc {:.2} deg, {:.3} rev/day)",
            name.trim(),
            elements.datetime,
            elements.inclination,
            elements.mean_motion
        );

        Ok(Self {
            name: name.trim().to_string(),
            elements,
            constants,
            validity: None,
        })
    }

    /// Refuse instants further than `validity` from the epoch. `None` accepts any instant.
    pub fn with_validity(mut self, validity: Option<Duration>) -> Self {
        self.validity = validity;
        self
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.elements.datetime.and_utc()
    }

    pub fn inclination_deg(&self) -> f64 {
        self.elements.inclination
    }

    /// Revolutions per day.
    pub fn mean_motion(&self) -> f64 {
        self.elements.mean_motion
    }

    /// Orbital period from mean motion.
    pub fn period(&self) -> Duration {
        let minutes = MINUTES_PER_DAY / self.elements.mean_motion;
        Duration::milliseconds((minutes * 60_000.0).round() as i64)
    }

    pub fn validity(&self) -> Option<Duration> {
        self.validity
    }

    /// True when `instant` is far enough from the epoch that accuracy degrades,
    /// or outside the configured validity window.
    pub fn is_stale_at(&self, instant: DateTime<Utc>) -> bool {
        let limit = self.validity.unwrap_or(Duration::days(Self::STALE_AFTER_DAYS));
        let offset = instant - self.epoch();
        offset > limit || offset < -limit
    }

    fn minutes_since_epoch(&self, instant: DateTime<Utc>) -> Result<f64, TrackerError> {
        if let Some(validity) = self.validity {
            let offset = instant - self.epoch();
            if offset > validity || offset < -validity {
                return Err(TrackerError::propagation(
                    instant,
                    format!(
                        "{:.1} h from element epoch, outside the {} h validity window",
                        offset.num_seconds() as f64 / 3_600.0,
                        validity.num_hours()
                    ),
                ));
            }
        }
        self.elements
            .datetime_to_minutes_since_epoch(&instant.naive_utc())
            .map(|m| m.0)
            .map_err(|e| TrackerError::propagation(instant, e))
    }
}

impl Propagator for TleSatellite {
    fn propagate(&self, instant: DateTime<Utc>) -> Result<GeodeticState, TrackerError> {
        let minutes = self.minutes_since_epoch(instant)?;
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| TrackerError::propagation(instant, e))?;

        let pos = Vector3::from(prediction.position);
        let velocity = Vector3::from(prediction.velocity);
        let position = frames::subpoint(&pos, &instant);

        let finite = position.latitude.is_finite()
            && position.longitude.is_finite()
            && position.altitude_km.is_finite()
            && velocity.iter().all(|v| v.is_finite());
        if !finite {
            return Err(TrackerError::propagation(instant, "non-finite state"));
        }

        Ok(GeodeticState { position, velocity })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
