use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures of the startup phase. Playback itself has no error path.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Map image could not be acquired (HTTP, IO).
    #[error("failed to fetch {source_name}: {reason}")]
    Fetch { source_name: String, reason: String },

    /// Image bytes or element strings could not be decoded.
    #[error("failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },

    /// The propagator failed or the instant lies outside the elements' validity.
    #[error("propagation failed{} ({instant}): {reason}", sample_label(.index))]
    Propagation {
        index: Option<usize>,
        instant: DateTime<Utc>,
        reason: String,
    },

    /// The host surface is unavailable.
    #[error("render surface unavailable: {0}")]
    Render(String),
}

impl TrackerError {
    pub fn fetch(source_name: impl Into<String>, reason: impl ToString) -> Self {
        TrackerError::Fetch {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(what: impl Into<String>, reason: impl ToString) -> Self {
        TrackerError::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Propagation failure for a single instant, not yet tied to a sample.
    pub fn propagation(instant: DateTime<Utc>, reason: impl ToString) -> Self {
        TrackerError::Propagation {
            index: None,
            instant,
            reason: reason.to_string(),
        }
    }

    /// Re-tag a propagation failure with the sample index it occurred at.
    pub fn at_index(self, at: usize) -> Self {
        match self {
            TrackerError::Propagation { instant, reason, .. } => TrackerError::Propagation {
                index: Some(at),
                instant,
                reason,
            },
            other => other,
        }
    }
}

fn sample_label(index: &Option<usize>) -> String {
    index.map(|i| format!(" at sample {}", i)).unwrap_or_default()
}
