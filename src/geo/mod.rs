pub mod projection;

pub use projection::{project, DisplayPoint, SurfaceSize};
