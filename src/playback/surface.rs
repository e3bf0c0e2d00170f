use super::charts::ChartChannel;
use super::trail::TrailMark;

/// Map canvas the trail is drawn onto. The host owns its lifecycle.
pub trait DisplaySurface {
    /// Draw one marker on top of everything drawn so far.
    fn draw_marker(&mut self, mark: &TrailMark);

    /// Replace the telemetry text shown next to the map.
    fn set_summary(&mut self, text: &str);
}

/// Plot area for the live telemetry channels.
pub trait ChartSurface {
    /// Replace the data and axis bounds of one named channel.
    fn update_channel(&mut self, channel: &ChartChannel);
}

/// Headless surface: routes every draw call to the logger.
#[derive(Debug, Default)]
pub struct LogSurface {
    markers: usize,
    summary: String,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers_drawn(&self) -> usize {
        self.markers
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

impl DisplaySurface for LogSurface {
    fn draw_marker(&mut self, mark: &TrailMark) {
        self.markers += 1;
        log::trace!(
            "marker #{} at ({:.1}, {:.1}) r={} #{:02x}{:02x}{:02x}",
            mark.tick,
            mark.point.x,
            mark.point.y,
            mark.radius,
            mark.color[0],
            mark.color[1],
            mark.color[2]
        );
    }

    fn set_summary(&mut self, text: &str) {
        self.summary.clear();
        self.summary.push_str(text);
        log::debug!("{}", text.replace('\n', " | "));
    }
}

impl ChartSurface for LogSurface {
    fn update_channel(&mut self, channel: &ChartChannel) {
        let b = channel.bounds();
        log::trace!(
            "{}: {} points, x [{:.0}, {:.0}], y [{:.2}, {:.2}]",
            channel.name(),
            channel.series().len(),
            b.x_min,
            b.x_max,
            b.y_min,
            b.y_max
        );
    }
}

/// In-memory surface for tests: keeps every call it receives.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub marks: Vec<TrailMark>,
    pub summaries: Vec<String>,
    pub channel_updates: Vec<(String, usize, super::charts::AxisBounds)>,
}

#[cfg(test)]
impl DisplaySurface for RecordingSurface {
    fn draw_marker(&mut self, mark: &TrailMark) {
        self.marks.push(*mark);
    }

    fn set_summary(&mut self, text: &str) {
        self.summaries.push(text.to_string());
    }
}

#[cfg(test)]
impl ChartSurface for RecordingSurface {
    fn update_channel(&mut self, channel: &ChartChannel) {
        self.channel_updates
            .push((channel.name().to_string(), channel.series().len(), channel.bounds()));
    }
}
