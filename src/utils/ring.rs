//! Progress ring geometry

use serde::{Deserialize, Serialize};

/// Default ring diameter in pixels
pub const DEFAULT_SIZE: f64 = 320.0;
/// Default stroke width in pixels
pub const DEFAULT_STROKE_WIDTH: f64 = 8.0;

/// SVG stroke geometry for a circular progress ring.
///
/// A full ring (progress 1.0) has a dash offset of zero; an empty ring has
/// an offset equal to the circumference. Clients draw two concentric
/// circles and apply `dash_offset` as `stroke-dashoffset` on the foreground
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingGeometry {
    pub size: f64,
    pub stroke_width: f64,
    pub radius: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

/// Map a progress fraction to ring stroke geometry. Pure; progress is
/// clamped to `[0, 1]`.
pub fn ring_geometry(progress: f64, size: f64, stroke_width: f64) -> RingGeometry {
    let progress = progress.clamp(0.0, 1.0);
    let radius = (size - stroke_width) / 2.0;
    let circumference = radius * 2.0 * std::f64::consts::PI;
    RingGeometry {
        size,
        stroke_width,
        radius,
        circumference,
        dash_offset: circumference - progress * circumference,
    }
}

impl RingGeometry {
    /// Geometry at the default dimensions
    pub fn with_progress(progress: f64) -> Self {
        ring_geometry(progress, DEFAULT_SIZE, DEFAULT_STROKE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_progress_has_zero_offset() {
        let ring = RingGeometry::with_progress(1.0);
        assert_eq!(ring.dash_offset, 0.0);
        assert_eq!(ring.radius, (DEFAULT_SIZE - DEFAULT_STROKE_WIDTH) / 2.0);
    }

    #[test]
    fn empty_progress_offsets_the_whole_circumference() {
        let ring = RingGeometry::with_progress(0.0);
        assert_eq!(ring.dash_offset, ring.circumference);
    }

    #[test]
    fn half_progress_offsets_half() {
        let ring = RingGeometry::with_progress(0.5);
        assert!((ring.dash_offset - ring.circumference / 2.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(RingGeometry::with_progress(1.5).dash_offset, 0.0);
        let ring = RingGeometry::with_progress(-0.25);
        assert_eq!(ring.dash_offset, ring.circumference);
    }
}
