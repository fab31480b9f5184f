//! Input model: pointer buttons, pointer samples, and the gesture state machine.
//!
//! `PointerInput` is what the host hands the engine for every pointer event.
//! `Gesture` is the single active gesture tracked between pointer-down and
//! pointer-up. Its active variants carry the snapshot taken at pointer-down
//! (`DragStart`, `TransformStart`), which nothing outside the engine sees.
//!
//! ```text
//! Idle -> Dragging       (primary pointer-down on an item)
//! Idle -> Transforming   (pointer-down on the selected item's handle)
//! Any  -> Idle           (pointer-up / touch-end, or the item is removed)
//! ```

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;
use crate::store::ItemId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, or any touch.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// One pointer sample in screen space (client coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub point: Point,
    pub button: Button,
}

impl PointerInput {
    /// A primary-button (or touch) sample.
    #[must_use]
    pub fn primary(x: f64, y: f64) -> Self {
        Self { point: Point::new(x, y), button: Button::Primary }
    }
}

/// Container size in CSS pixels, captured from the canvas element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the container has a usable, non-zero area.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Snapshot taken when a drag begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    /// Pointer position at pointer-down.
    pub pointer: Point,
    pub start_x_percent: f64,
    pub start_y_percent: f64,
    pub container_width: f64,
    pub container_height: f64,
}

/// Snapshot taken when a scale/rotate gesture begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformStart {
    /// Pointer position at pointer-down.
    pub pointer: Point,
    /// Screen-space center of the item; the rotation and scale pivot.
    pub pivot: Point,
    /// Pointer distance from the pivot at pointer-down.
    pub distance: f64,
    /// Pointer angle around the pivot at pointer-down, in radians.
    pub angle: f64,
    pub start_scale: f64,
    pub start_rotate: f64,
    /// Rotation was already within snap threshold of a snap angle.
    pub was_straight: bool,
}

/// The active gesture. At most one runs at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// An item is being moved.
    Dragging { id: ItemId, start: DragStart },
    /// An item is being scaled and rotated around its center.
    Transforming { id: ItemId, start: TransformStart },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    #[must_use]
    pub fn is_transforming(&self) -> bool {
        matches!(self, Self::Transforming { .. })
    }

    /// Id of the item the gesture targets, if any.
    #[must_use]
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Transforming { id, .. } => Some(id),
        }
    }

    /// Reset to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
