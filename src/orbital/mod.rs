pub mod frames;
pub mod tle;

pub use frames::{subpoint, Geodetic};
pub use tle::{GeodeticState, Propagator, TleSatellite};
