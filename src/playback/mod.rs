pub mod charts;
pub mod scheduler;
pub mod surface;
pub mod trail;

pub use charts::{AxisBounds, ChartChannel, ChartSeries, ChartUpdater};
pub use scheduler::{run_blocking, PlaybackState, Scheduler, TickOutcome};
pub use surface::{ChartSurface, DisplaySurface, LogSurface};
pub use trail::{telemetry_text, Trail, TrailMark, TrailRenderer};
