//! Interaction engine: turns pointer gestures into store updates.
//!
//! `EngineCore` owns the [`CanvasStore`], the active [`Gesture`], the UI
//! selection, and the last known container size. Every handler returns the
//! [`Action`]s the host must react to; the browser binding in `dom` maps
//! `CaptureStarted`/`CaptureReleased` onto window listeners.

use tracing::{debug, trace};

use crate::geometry::{
    Point, Rect, angle_between, clamp_scale, constrain_position_with, distance, is_straight,
    snap_to_nearest_angle_with,
};
use crate::input::{Button, ContainerSize, DragStart, Gesture, PointerInput, TransformStart};
use crate::store::{CanvasState, CanvasStore, Item, ItemId, ItemStyle, Selection};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// One or more item styles changed; re-render.
    StylesChanged,
    /// The UI selection (item showing handles) changed.
    SelectionChanged(Option<ItemId>),
    /// An item left the canvas.
    ItemRemoved(ItemId),
    BackgroundChanged,
    /// The container was measured at a new size; item boxes need resizing.
    ContainerResized,
    /// A gesture began; window-level move/up listeners are needed.
    CaptureStarted,
    /// The gesture ended; window-level listeners must be released.
    CaptureReleased,
}

/// Core engine state: everything that doesn't depend on the DOM.
///
/// Separated from `dom::Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    store: CanvasStore,
    gesture: Gesture,
    selected_id: Option<ItemId>,
    container: Option<ContainerSize>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over an existing store (e.g. one restored from a saved canvas).
    #[must_use]
    pub fn with_store(store: CanvasStore) -> Self {
        Self { store, ..Self::default() }
    }

    // --- Container ---

    /// Record the canvas container size, or `None` while it is not mounted.
    ///
    /// Reports `ContainerResized` when the size actually changed. A drag in
    /// flight keeps the size it started with.
    pub fn set_container(&mut self, container: Option<ContainerSize>) -> Vec<Action> {
        if self.container == container {
            return Vec::new();
        }
        self.container = container;
        trace!(?container, "container resized");
        vec![Action::ContainerResized]
    }

    // --- Gestures ---

    /// Begin dragging an item. Ignored for non-primary buttons, an unmounted
    /// container, or an item without a style.
    pub fn handle_drag_start(&mut self, id: ItemId, pointer: PointerInput) -> Vec<Action> {
        if pointer.button != Button::Primary {
            return Vec::new();
        }
        let Some(container) = self.usable_container() else {
            return Vec::new();
        };
        let Some(style) = self.store.style(&id).copied() else {
            return Vec::new();
        };

        let mut actions = self.end_gesture();
        if self.store.bump_z_index(&id).is_some() {
            actions.push(Action::StylesChanged);
        }
        debug!(%id, x = pointer.point.x, y = pointer.point.y, "drag started");
        self.gesture = Gesture::Dragging {
            id,
            start: DragStart {
                pointer: pointer.point,
                start_x_percent: style.x_percent,
                start_y_percent: style.y_percent,
                container_width: container.width,
                container_height: container.height,
            },
        };
        actions.push(Action::CaptureStarted);
        actions
    }

    /// Begin scaling/rotating an item around the center of `item_rect`.
    pub fn handle_transform_start(&mut self, id: ItemId, pointer: PointerInput, item_rect: Rect) -> Vec<Action> {
        if pointer.button != Button::Primary || self.usable_container().is_none() {
            return Vec::new();
        }
        let Some(style) = self.store.style(&id).copied() else {
            return Vec::new();
        };

        let mut actions = self.end_gesture();
        let config = self.store.config();
        let pivot = item_rect.center();
        let start = TransformStart {
            pointer: pointer.point,
            pivot,
            distance: distance(pivot, pointer.point),
            angle: angle_between(pivot, pointer.point),
            start_scale: style.scale,
            start_rotate: style.rotate,
            was_straight: is_straight(style.rotate, &config.snap_angles, config.snap_threshold_deg),
        };
        debug!(%id, scale = style.scale, rotate = style.rotate, straight = start.was_straight, "transform started");
        self.gesture = Gesture::Transforming { id, start };
        actions.push(Action::CaptureStarted);
        actions
    }

    /// Advance the active gesture to a new pointer position.
    pub fn handle_pointer_move(&mut self, pointer: PointerInput) -> Vec<Action> {
        match &self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Dragging { id, start } => {
                let (id, start) = (id.clone(), *start);
                self.drag_to(&id, &start, pointer.point)
            }
            Gesture::Transforming { id, start } => {
                let (id, start) = (id.clone(), *start);
                self.transform_to(&id, &start, pointer.point)
            }
        }
    }

    /// End the active gesture. Safe to call repeatedly or with no gesture.
    pub fn handle_pointer_up(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    /// Back out of a gesture the host could not start tracking.
    ///
    /// Ends the gesture and replaces `CaptureStarted` in `actions` with the
    /// release, so the host never sees a capture that has no listeners.
    pub fn abandon_capture(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let released = self.end_gesture();
        if !actions.contains(&Action::CaptureStarted) {
            return actions.into_iter().chain(released).collect();
        }
        actions
            .into_iter()
            .flat_map(|action| if action == Action::CaptureStarted { released.clone() } else { vec![action] })
            .collect()
    }

    fn drag_to(&mut self, id: &ItemId, start: &DragStart, point: Point) -> Vec<Action> {
        let Some(current) = self.store.style(id).copied() else {
            return self.end_gesture();
        };
        let dx = (point.x - start.pointer.x) / start.container_width * 100.0;
        let dy = (point.y - start.pointer.y) / start.container_height * 100.0;
        let (x_percent, y_percent) = constrain_position_with(
            start.start_x_percent + dx,
            start.start_y_percent + dy,
            self.store.config().margin_percent,
        );
        trace!(%id, x_percent, y_percent, "drag move");
        self.write_style(id, ItemStyle { x_percent, y_percent, ..current });
        vec![Action::StylesChanged]
    }

    /// Scale follows the pointer's distance from the pivot. Rotation follows
    /// its angle, but a straight item only rotates while the pointer is more
    /// than the movement threshold away from where the gesture began.
    fn transform_to(&mut self, id: &ItemId, start: &TransformStart, point: Point) -> Vec<Action> {
        let Some(current) = self.store.style(id).copied() else {
            return self.end_gesture();
        };
        let config = self.store.config();

        let factor = if start.distance > f64::EPSILON { distance(start.pivot, point) / start.distance } else { 1.0 };
        let scale = clamp_scale(start.start_scale * factor, config.scale_min, config.scale_max);

        let moved = distance(start.pointer, point);
        let rotate = if !start.was_straight || moved > config.movement_threshold_px {
            let delta_deg = (angle_between(start.pivot, point) - start.angle).to_degrees();
            snap_to_nearest_angle_with(start.start_rotate + delta_deg, &config.snap_angles, config.snap_threshold_deg)
        } else {
            current.rotate
        };
        trace!(%id, scale, rotate, "transform move");
        self.write_style(id, ItemStyle { scale, rotate, ..current });
        vec![Action::StylesChanged]
    }

    /// Push a full style map where only `id` differs.
    fn write_style(&mut self, id: &ItemId, style: ItemStyle) {
        let mut next = self.store.styles().clone();
        next.insert(id.clone(), style);
        self.store.update_styles(next);
    }

    fn end_gesture(&mut self) -> Vec<Action> {
        let Some(id) = self.gesture.item_id() else {
            return Vec::new();
        };
        debug!(%id, dragging = self.gesture.is_dragging(), "gesture ended");
        self.gesture.reset();
        vec![Action::CaptureReleased]
    }

    fn usable_container(&self) -> Option<ContainerSize> {
        self.container.filter(ContainerSize::is_usable)
    }

    // --- Selection and paint order ---

    /// Bring an item to the front.
    pub fn update_z_index(&mut self, id: &ItemId) -> Vec<Action> {
        match self.store.bump_z_index(id) {
            Some(_) => vec![Action::StylesChanged],
            None => Vec::new(),
        }
    }

    /// A click on an item toggles its handles and brings it to the front.
    /// Ignored while a drag is in flight.
    pub fn click_item(&mut self, id: ItemId) -> Vec<Action> {
        if self.gesture.is_dragging() || !self.store.contains(&id) {
            return Vec::new();
        }
        self.selected_id = if self.selected_id.as_ref() == Some(&id) { None } else { Some(id.clone()) };
        let mut actions = vec![Action::SelectionChanged(self.selected_id.clone())];
        actions.extend(self.update_z_index(&id));
        actions
    }

    /// A click on empty canvas clears the selection.
    pub fn background_click(&mut self) -> Vec<Action> {
        if self.selected_id.take().is_some() {
            vec![Action::SelectionChanged(None)]
        } else {
            Vec::new()
        }
    }

    // --- Store pass-through ---

    /// Toggle an item in or out of the outfit.
    pub fn select_item(&mut self, item: Item) -> Vec<Action> {
        let id = item.id.clone();
        match self.store.select_item(item) {
            Selection::Added(_) => vec![Action::StylesChanged],
            Selection::Removed => self.after_removal(id),
        }
    }

    /// Remove an item (delete button). Bypasses gesture math.
    pub fn remove_item(&mut self, id: &ItemId) -> Vec<Action> {
        if self.store.remove_item(id) { self.after_removal(id.clone()) } else { Vec::new() }
    }

    fn after_removal(&mut self, id: ItemId) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.gesture.item_id() == Some(&id) {
            actions.extend(self.end_gesture());
        }
        let was_selected = self.selected_id.as_ref() == Some(&id);
        actions.push(Action::ItemRemoved(id));
        if was_selected {
            self.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        actions
    }

    /// Clear every item. The background is kept.
    pub fn full_reset(&mut self) -> Vec<Action> {
        let mut actions = self.end_gesture();
        self.store.full_reset();
        if self.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::StylesChanged);
        actions
    }

    pub fn set_background(&mut self, background: impl Into<String>) -> Vec<Action> {
        self.store.set_background(background);
        vec![Action::BackgroundChanged]
    }

    // --- Queries ---

    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> &CanvasState {
        self.store.state()
    }

    /// The item currently showing selection handles, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ItemId> {
        self.selected_id.as_ref()
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    #[must_use]
    pub fn container(&self) -> Option<ContainerSize> {
        self.container
    }
}

