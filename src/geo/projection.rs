// ---------------------------------------------------------------------------
// Equirectangular projection onto a fixed-size display surface
// ---------------------------------------------------------------------------

/// Pixel dimensions of the display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pixel position, origin top-left, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

/// Map latitude/longitude (degrees) to surface pixels.
///
/// Longitude -180..180 spans the width left to right, latitude 90..-90 spans
/// the height top to bottom. Inputs outside those ranges are a caller bug.
pub fn project(lat: f64, lon: f64, size: SurfaceSize) -> DisplayPoint {
    debug_assert!((-90.0..=90.0).contains(&lat), "latitude {lat} out of range");
    debug_assert!((-180.0..=180.0).contains(&lon), "longitude {lon} out of range");
    DisplayPoint {
        x: (lon + 180.0) * (size.width / 360.0),
        y: (90.0 - lat) * (size.height / 180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: SurfaceSize = SurfaceSize { width: 800.0, height: 400.0 };

    #[test]
    fn origin_maps_to_center() {
        assert_eq!(project(0.0, 0.0, MAP), DisplayPoint { x: 400.0, y: 200.0 });
    }

    #[test]
    fn corners() {
        assert_eq!(project(90.0, -180.0, MAP), DisplayPoint { x: 0.0, y: 0.0 });
        assert_eq!(project(-90.0, 180.0, MAP), DisplayPoint { x: 800.0, y: 400.0 });
    }

    #[test]
    fn scales_with_surface() {
        let p = project(45.0, 90.0, SurfaceSize::new(360.0, 180.0));
        assert_eq!(p, DisplayPoint { x: 270.0, y: 45.0 });
    }

    #[test]
    fn identical_inputs_identical_outputs() {
        let a = project(51.6401, -73.2211, MAP);
        let b = project(51.6401, -73.2211, MAP);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }
}
