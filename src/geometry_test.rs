#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- normalize_angle ---

#[test]
fn normalize_keeps_in_range_values() {
    assert_eq!(normalize_angle(0.0), 0.0);
    assert_eq!(normalize_angle(45.5), 45.5);
    assert_eq!(normalize_angle(359.0), 359.0);
}

#[test]
fn normalize_wraps_full_turns() {
    assert_eq!(normalize_angle(360.0), 0.0);
    assert_eq!(normalize_angle(720.0), 0.0);
    assert_eq!(normalize_angle(450.0), 90.0);
}

#[test]
fn normalize_negative_angles() {
    assert_eq!(normalize_angle(-90.0), 270.0);
    assert_eq!(normalize_angle(-450.0), 270.0);
}

#[test]
fn normalize_tiny_negative_never_returns_360() {
    let n = normalize_angle(-1e-20);
    assert!((0.0..360.0).contains(&n));
}

// --- snap_to_nearest_angle ---

#[test]
fn snap_within_threshold() {
    assert_eq!(snap_to_nearest_angle(91.0), 90.0);
    assert_eq!(snap_to_nearest_angle(88.0), 90.0);
    assert_eq!(snap_to_nearest_angle(181.5), 180.0);
}

#[test]
fn snap_outside_threshold_returns_normalized() {
    assert_eq!(snap_to_nearest_angle(95.0), 95.0);
    assert_eq!(snap_to_nearest_angle(-265.0), 95.0);
}

#[test]
fn snap_wraps_near_full_turn_to_zero() {
    assert_eq!(snap_to_nearest_angle(358.0), 0.0);
    assert_eq!(snap_to_nearest_angle(359.9), 0.0);
    assert_eq!(snap_to_nearest_angle(-1.0), 0.0);
}

#[test]
fn snap_result_is_always_normalized() {
    for raw in [-720.0, -361.0, -1.0, 0.0, 44.0, 271.0, 1000.0] {
        let snapped = snap_to_nearest_angle(raw);
        assert!((0.0..360.0).contains(&snapped), "{raw} snapped to {snapped}");
    }
}

#[test]
fn snap_with_custom_set() {
    let snaps = [0.0, 45.0, 90.0];
    assert_eq!(snap_to_nearest_angle_with(47.0, &snaps, 5.0), 45.0);
    assert_eq!(snap_to_nearest_angle_with(47.0, &snaps, 1.0), 47.0);
}

#[test]
fn snap_first_match_wins() {
    // Overlapping thresholds: the first listed angle is chosen.
    let snaps = [10.0, 12.0];
    assert_eq!(snap_to_nearest_angle_with(11.0, &snaps, 5.0), 10.0);
}

// --- is_straight ---

#[test]
fn straight_detects_aligned_angles() {
    assert!(is_straight(0.0, &SNAP_ANGLES, SNAP_THRESHOLD_DEG));
    assert!(is_straight(271.0, &SNAP_ANGLES, SNAP_THRESHOLD_DEG));
    assert!(is_straight(359.0, &SNAP_ANGLES, SNAP_THRESHOLD_DEG));
    assert!(is_straight(-90.0, &SNAP_ANGLES, SNAP_THRESHOLD_DEG));
}

#[test]
fn straight_rejects_tilted_angles() {
    assert!(!is_straight(30.0, &SNAP_ANGLES, SNAP_THRESHOLD_DEG));
    assert!(!is_straight(93.0, &SNAP_ANGLES, SNAP_THRESHOLD_DEG));
}

// --- constrain_position ---

#[test]
fn constrain_far_out_of_range() {
    assert_eq!(constrain_position(-500.0, 9000.0), (5.0, 95.0));
}

#[test]
fn constrain_keeps_in_range() {
    assert_eq!(constrain_position(70.0, 40.0), (70.0, 40.0));
    assert_eq!(constrain_position(5.0, 95.0), (5.0, 95.0));
}

#[test]
fn constrain_axes_are_independent() {
    assert_eq!(constrain_position(50.0, -1.0), (50.0, 5.0));
    assert_eq!(constrain_position(100.0, 50.0), (95.0, 50.0));
}

#[test]
fn constrain_sweep_stays_in_bounds() {
    let mut v = -1000.0;
    while v <= 1000.0 {
        let (x, y) = constrain_position(v, -v);
        assert!((5.0..=95.0).contains(&x));
        assert!((5.0..=95.0).contains(&y));
        v += 7.3;
    }
}

#[test]
fn constrain_nan_and_infinity() {
    assert_eq!(constrain_position(f64::NAN, f64::INFINITY), (5.0, 95.0));
    assert_eq!(constrain_position(f64::NEG_INFINITY, 50.0), (5.0, 50.0));
}

#[test]
fn constrain_with_custom_margin() {
    assert_eq!(constrain_position_with(0.0, 100.0, 10.0), (10.0, 90.0));
}

// --- clamp_scale ---

#[test]
fn clamp_scale_bounds() {
    assert_eq!(clamp_scale(0.1, 0.5, 2.0), 0.5);
    assert_eq!(clamp_scale(3.0, 0.5, 2.0), 2.0);
    assert_eq!(clamp_scale(1.25, 0.5, 2.0), 1.25);
    assert_eq!(clamp_scale(f64::INFINITY, 0.5, 2.0), 2.0);
}

#[test]
fn clamp_scale_nan_is_identity_scale() {
    assert_eq!(clamp_scale(f64::NAN, 0.5, 2.0), 1.0);
}

// --- conversions ---

#[test]
fn percent_pixel_conversion() {
    assert_eq!(to_percent(200.0, 100.0, 1000.0, 500.0), (20.0, 20.0));
    assert_eq!(to_pixels(20.0, 20.0, 1000.0, 500.0), (200.0, 100.0));
}

#[test]
fn percent_of_zero_container_is_zero() {
    assert_eq!(to_percent(10.0, 10.0, 0.0, 0.0), (0.0, 0.0));
}

#[test]
fn distance_and_angle() {
    let pivot = Point::new(0.0, 0.0);
    assert!(approx_eq(distance(pivot, Point::new(3.0, 4.0)), 5.0));
    assert!(approx_eq(angle_between(pivot, Point::new(0.0, 10.0)), std::f64::consts::FRAC_PI_2));
    assert!(approx_eq(angle_between(pivot, Point::new(-1.0, 0.0)), std::f64::consts::PI));
}

#[test]
fn rect_center() {
    let r = Rect::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(r.center(), Point::new(60.0, 45.0));
}
