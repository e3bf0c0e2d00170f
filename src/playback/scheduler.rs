use std::time::Duration;

use super::charts::ChartUpdater;
use super::surface::{ChartSurface, DisplaySurface};
use super::trail::{Trail, TrailRenderer};
use crate::track::TrajectorySeries;

// ---------------------------------------------------------------------------
// Mutable playback state
// ---------------------------------------------------------------------------

/// Everything that changes between ticks. Only the scheduler mutates it.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    cursor: usize,
    trail: Trail,
    charts: ChartUpdater,
}

impl PlaybackState {
    fn new(capacity: usize) -> Self {
        Self {
            cursor: 0,
            trail: Trail::with_capacity(capacity),
            charts: ChartUpdater::new(capacity),
        }
    }

    /// Samples consumed so far; equals the number of completed ticks.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn charts(&self) -> &ChartUpdater {
        &self.charts
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Sample `index` was rendered and the cursor moved past it.
    Advanced { index: usize },
    /// Every sample has been played; nothing happened.
    Done,
}

/// Walks the series one sample per tick until it runs out.
pub struct Scheduler {
    series: TrajectorySeries,
    state: PlaybackState,
    renderer: TrailRenderer,
    completion_logged: bool,
}

impl Scheduler {
    pub fn new(series: TrajectorySeries, renderer: TrailRenderer) -> Self {
        let state = PlaybackState::new(series.len());
        Self {
            series,
            state,
            renderer,
            completion_logged: false,
        }
    }

    pub fn series(&self) -> &TrajectorySeries {
        &self.series
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.cursor >= self.series.len()
    }

    /// Render the sample under the cursor and advance, or report completion.
    pub fn tick(
        &mut self,
        display: &mut dyn DisplaySurface,
        charts: &mut dyn ChartSurface,
    ) -> TickOutcome {
        if self.is_done() {
            if !self.completion_logged {
                self.completion_logged = true;
                log::info!("Playback complete after {} ticks", self.state.cursor);
            }
            return TickOutcome::Done;
        }

        let index = self.state.cursor;
        let sample = &self.series[index];
        self.renderer.render(&mut self.state.trail, index, sample, display);
        self.state.charts.update(index, sample, charts);
        self.state.cursor += 1;

        log::debug!("tick {}/{}", self.state.cursor, self.series.len());
        TickOutcome::Advanced { index }
    }
}

/// Tick until done, sleeping `period` between ticks. Blocks the calling thread.
///
/// Returns the number of samples played.
pub fn run_blocking(
    scheduler: &mut Scheduler,
    display: &mut dyn DisplaySurface,
    charts: &mut dyn ChartSurface,
    period: Duration,
) -> usize {
    let mut ticks = 0;
    while let TickOutcome::Advanced { .. } = scheduler.tick(display, charts) {
        ticks += 1;
        if !period.is_zero() && !scheduler.is_done() {
            std::thread::sleep(period);
        }
    }
    ticks
}
