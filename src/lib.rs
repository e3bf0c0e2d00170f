pub mod config;
pub mod error;
pub mod geo;
pub mod map;
pub mod orbital;
pub mod playback;
pub mod track;

pub use error::TrackerError;
