//! Pure geometry helpers: points, rectangles, angle snapping, and position clamping.
//!
//! Everything here is stateless so the interaction engine can call it from
//! every pointer-move without allocating.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::{POSITION_MARGIN_PERCENT, SNAP_ANGLES, SNAP_THRESHOLD_DEG};

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned screen-space rectangle, as reported by a bounding client rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Snap `angle` to the default snap set with the default threshold.
#[must_use]
pub fn snap_to_nearest_angle(angle: f64) -> f64 {
    snap_to_nearest_angle_with(angle, &SNAP_ANGLES, SNAP_THRESHOLD_DEG)
}

/// Normalize `angle`, then return the first snap angle within `threshold`
/// degrees of it, or the normalized angle when none is close enough.
///
/// Snap angles are checked in the order given. A snap to 360 is reported as 0
/// so the result always lies in `[0, 360)`.
#[must_use]
pub fn snap_to_nearest_angle_with(angle: f64, snap_angles: &[f64], threshold: f64) -> f64 {
    let normalized = normalize_angle(angle);
    snap_angles
        .iter()
        .find(|snap| (normalized - **snap).abs() <= threshold)
        .map_or(normalized, |snap| normalize_angle(*snap))
}

/// Whether `angle` already sits within `threshold` degrees of a snap angle.
#[must_use]
pub fn is_straight(angle: f64, snap_angles: &[f64], threshold: f64) -> bool {
    let normalized = normalize_angle(angle);
    snap_angles.iter().any(|snap| (normalized - snap).abs() <= threshold)
}

/// Clamp a center position to `[5, 95]` percent on both axes.
#[must_use]
pub fn constrain_position(x_percent: f64, y_percent: f64) -> (f64, f64) {
    constrain_position_with(x_percent, y_percent, POSITION_MARGIN_PERCENT)
}

/// Clamp a center position to `[margin, 100 - margin]` on each axis independently.
#[must_use]
pub fn constrain_position_with(x_percent: f64, y_percent: f64, margin: f64) -> (f64, f64) {
    (clamp_axis(x_percent, margin), clamp_axis(y_percent, margin))
}

fn clamp_axis(value: f64, margin: f64) -> f64 {
    if value.is_nan() {
        return margin;
    }
    value.clamp(margin, 100.0 - margin)
}

/// Clamp a scale into `[min, max]`. NaN falls back to `1.0` before clamping.
#[must_use]
pub fn clamp_scale(scale: f64, min: f64, max: f64) -> f64 {
    let scale = if scale.is_nan() { 1.0 } else { scale };
    scale.clamp(min, max)
}

/// Convert a pixel offset inside a container to percentages of its size.
///
/// A zero-sized container maps everything to 0%.
#[must_use]
pub fn to_percent(x: f64, y: f64, container_width: f64, container_height: f64) -> (f64, f64) {
    let axis = |v: f64, size: f64| if size > 0.0 { v / size * 100.0 } else { 0.0 };
    (axis(x, container_width), axis(y, container_height))
}

/// Convert percentages of a container back to pixel offsets.
#[must_use]
pub fn to_pixels(x_percent: f64, y_percent: f64, container_width: f64, container_height: f64) -> (f64, f64) {
    (x_percent / 100.0 * container_width, y_percent / 100.0 * container_height)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Angle in radians from `pivot` to `p`, measured with `atan2` in screen space.
#[must_use]
pub fn angle_between(pivot: Point, p: Point) -> f64 {
    (p.y - pivot.y).atan2(p.x - pivot.x)
}
