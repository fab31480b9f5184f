//! Shared numeric constants for the outfit canvas.

// ── Rotation ────────────────────────────────────────────────────

/// Angles (degrees) a rotation snaps to. 360 is listed so that 358–359 snap
/// across the wrap-around.
pub const SNAP_ANGLES: [f64; 5] = [0.0, 90.0, 180.0, 270.0, 360.0];

/// Maximum distance in degrees from a snap angle that still snaps.
pub const SNAP_THRESHOLD_DEG: f64 = 2.0;

/// Pointer travel in screen pixels before an already-straight item starts rotating.
pub const MOVEMENT_THRESHOLD_PX: f64 = 15.0;

// ── Scale ───────────────────────────────────────────────────────

/// Smallest allowed item scale.
pub const SCALE_MIN: f64 = 0.5;

/// Largest allowed item scale.
pub const SCALE_MAX: f64 = 2.0;

// ── Position ────────────────────────────────────────────────────

/// Distance (percent of the canvas) an item center keeps from every edge.
pub const POSITION_MARGIN_PERCENT: f64 = 5.0;

/// Center position used when an item has no style entry at render time.
pub const FALLBACK_PERCENT: f64 = 50.0;

// ── Layout ──────────────────────────────────────────────────────

/// Width of the reference canvas the layout was designed against, in pixels.
pub const REFERENCE_WIDTH_PX: f64 = 400.0;

/// Height of the reference canvas (4:5 aspect), in pixels.
pub const REFERENCE_HEIGHT_PX: f64 = 500.0;

/// Edge length of an unscaled item on the reference canvas, in pixels.
pub const REFERENCE_ITEM_SIZE_PX: f64 = 160.0;

// ── Background ──────────────────────────────────────────────────

/// Background token used for a fresh canvas.
pub const DEFAULT_BACKGROUND: &str = "bg-white";
