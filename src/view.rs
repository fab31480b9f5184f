//! Presentation: item styles to CSS, render snapshots, and pointer routing.
//!
//! Nothing here touches the DOM. The host renders [`ItemView`]s however it
//! likes and reports pointer events as a [`PointerTarget`] so routing stays
//! testable.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use crate::consts::{REFERENCE_HEIGHT_PX, REFERENCE_ITEM_SIZE_PX, REFERENCE_WIDTH_PX};
use crate::engine::{Action, EngineCore};
use crate::geometry::Rect;
use crate::input::PointerInput;
use crate::store::{Item, ItemId, ItemStyle};

/// Ratio of the container to the 400x500 reference canvas, limited by the
/// tighter axis. Zero for an unmounted container.
#[must_use]
pub fn canvas_scale_factor(width: f64, height: f64) -> f64 {
    if !(width > 0.0 && height > 0.0) {
        return 0.0;
    }
    (width / REFERENCE_WIDTH_PX).min(height / REFERENCE_HEIGHT_PX)
}

/// Resolved display values for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayStyle {
    pub left_percent: f64,
    pub top_percent: f64,
    pub scale: f64,
    pub rotate: f64,
    pub z_index: i64,
    /// Edge length of the square item box, in CSS pixels.
    pub size_px: f64,
}

impl DisplayStyle {
    /// Inline CSS. The item is centered on its position, scaled, then rotated
    /// about its own center.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "position:absolute;left:{}%;top:{}%;transform:translate(-50%, -50%) scale({}) rotate({}deg);\
             transform-origin:center;z-index:{};touch-action:none;width:{}px;height:{}px",
            self.left_percent, self.top_percent, self.scale, self.rotate, self.z_index, self.size_px, self.size_px,
        )
    }
}

#[must_use]
pub fn display_style(style: &ItemStyle, scale_factor: f64) -> DisplayStyle {
    DisplayStyle {
        left_percent: style.x_percent,
        top_percent: style.y_percent,
        scale: style.scale,
        rotate: style.rotate,
        z_index: style.z_index,
        size_px: REFERENCE_ITEM_SIZE_PX * scale_factor,
    }
}

/// Everything needed to draw one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    pub image_url: String,
    pub style: DisplayStyle,
    /// The item is the UI selection.
    pub selected: bool,
    /// Show the transform handle and delete button.
    pub show_handles: bool,
}

/// Snapshot every item in selection order.
///
/// `resolve_url` maps an item to its image URL. An item without a style
/// entry renders with the default style.
#[must_use]
pub fn render_items(core: &EngineCore, resolve_url: impl Fn(&Item) -> String) -> Vec<ItemView> {
    let factor = core.container().map_or(0.0, |c| canvas_scale_factor(c.width, c.height));
    let selection = core.selection();
    core.state()
        .selected_items
        .iter()
        .map(|item| {
            let style = core.store().style(&item.id).copied().unwrap_or_default();
            let selected = selection == Some(&item.id);
            ItemView {
                id: item.id.clone(),
                image_url: resolve_url(item),
                style: display_style(&style, factor),
                selected,
                show_handles: selected && !core.is_dragging(),
            }
        })
        .collect()
}

/// What a pointer event landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Background,
    Item(ItemId),
    /// The scale/rotate handle of an item.
    TransformHandle(ItemId),
    DeleteButton(ItemId),
}

/// Whether a pointer-down on `target` should cancel the browser default.
///
/// Mouse presses on items are cancelled to stop native image dragging and
/// text selection. A touch start never is: cancelling it suppresses the click
/// the browser synthesizes for a tap, which is what selects an item or hits
/// its delete button. Page scrolling during a touch gesture is stopped by the
/// non-passive window `touchmove` listener instead.
#[must_use]
pub fn cancels_pointer_default(target: &PointerTarget, is_touch: bool) -> bool {
    !is_touch && !matches!(target, PointerTarget::Background)
}

/// Route a pointer-down. `item_rect` is the target item's on-screen box and is
/// required for the transform handle.
pub fn dispatch_pointer_down(
    core: &mut EngineCore,
    target: PointerTarget,
    pointer: PointerInput,
    item_rect: Option<Rect>,
) -> Vec<Action> {
    match target {
        PointerTarget::Item(id) => core.handle_drag_start(id, pointer),
        PointerTarget::TransformHandle(id) => match item_rect {
            Some(rect) if core.selection() == Some(&id) => core.handle_transform_start(id, pointer, rect),
            _ => Vec::new(),
        },
        PointerTarget::Background | PointerTarget::DeleteButton(_) => Vec::new(),
    }
}

/// Route a click.
pub fn dispatch_click(core: &mut EngineCore, target: PointerTarget) -> Vec<Action> {
    match target {
        PointerTarget::Background => core.background_click(),
        PointerTarget::Item(id) => core.click_item(id),
        PointerTarget::DeleteButton(id) => core.remove_item(&id),
        PointerTarget::TransformHandle(_) => Vec::new(),
    }
}
