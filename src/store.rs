//! Canvas state store: selected items, their transform styles, and the background.
//!
//! This module defines the data that describes an outfit on the canvas
//! (`Item`, `ItemStyle`, `CanvasState`), the runtime store that owns it
//! (`CanvasStore`), and the persisted shapes exchanged with the save/edit
//! forms (`PersistedCanvas`, `InitialItems`).
//!
//! The store is the single source of truth. The interaction engine only ever
//! writes style values through [`CanvasStore::update_styles`] and
//! [`CanvasStore::bump_z_index`]; item membership changes go through
//! [`CanvasStore::select_item`], [`CanvasStore::remove_item`] and
//! [`CanvasStore::full_reset`]. Every operation keeps
//! `keys(item_styles) == ids(selected_items)`.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, trace, warn};

use crate::config::CanvasConfig;
use crate::consts::{DEFAULT_BACKGROUND, FALLBACK_PERCENT};
use crate::geometry::{clamp_scale, constrain_position_with, normalize_angle};

/// Opaque identifier of a wardrobe item, as issued by the wardrobe backend.
///
/// Serialized as a JSON string. Integer ids (database keys) are accepted on
/// input and kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(id) => Self(id),
            Raw::Number(id) => Self(id.to_string()),
        })
    }
}

/// Error returned by store operations that cross the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The persisted document could not be (de)serialized.
    #[error("failed to (de)serialize canvas: {0}")]
    Json(#[from] serde_json::Error),
    /// The same item appears twice in a persisted document.
    #[error("duplicate item {0} in persisted canvas")]
    DuplicateItem(ItemId),
    /// A persisted style holds NaN or infinity.
    #[error("item {0} has a non-finite style value")]
    NonFiniteStyle(ItemId),
    /// Selection and style map disagree.
    #[error("style map out of sync: {missing} selected item(s) without style, {orphaned} orphan style(s)")]
    InvariantViolation {
        /// Selected ids with no style entry.
        missing: usize,
        /// Style entries with no selected item.
        orphaned: usize,
    },
}

/// A wardrobe item placed on the canvas. Opaque to the engine apart from `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Image reference handed to the host's URL resolver.
    #[serde(default)]
    pub image: String,
    /// Category tag used only to choose the initial placement.
    #[serde(default)]
    pub category: Option<String>,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, image: impl Into<String>, category: Option<&str>) -> Self {
        Self { id, image: image.into(), category: category.map(str::to_string) }
    }

    /// An item known only by id (restored from a persisted canvas).
    #[must_use]
    pub fn bare(id: ItemId) -> Self {
        Self { id, image: String::new(), category: None }
    }
}

/// Transform applied to one item. Serialized as the `position_data` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    /// Paint order; higher values paint on top.
    pub z_index: i64,
    /// Uniform scale in `[0.5, 2.0]`.
    pub scale: f64,
    /// Clockwise rotation in degrees, normalized to `[0, 360)`.
    pub rotate: f64,
    /// Center x as a percentage of canvas width.
    pub x_percent: f64,
    /// Center y as a percentage of canvas height.
    pub y_percent: f64,
}

impl Default for ItemStyle {
    /// Style used to render an item that has no entry yet.
    fn default() -> Self {
        Self { z_index: 0, scale: 1.0, rotate: 0.0, x_percent: FALLBACK_PERCENT, y_percent: FALLBACK_PERCENT }
    }
}

impl ItemStyle {
    fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.rotate.is_finite() && self.x_percent.is_finite() && self.y_percent.is_finite()
    }
}

/// The full canvas: which items are placed, how, and on what background.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    /// Items in the order they were added (not paint order).
    pub selected_items: Vec<Item>,
    /// Style per selected item id.
    pub item_styles: HashMap<ItemId, ItemStyle>,
    /// Canvas-wide background token.
    pub background: String,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self { selected_items: Vec::new(), item_styles: HashMap::new(), background: DEFAULT_BACKGROUND.to_string() }
    }
}

impl CanvasState {
    /// Ids of the selected items in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.selected_items.iter().map(|item| item.id.clone())
    }

    /// Project into the outbound `{ items: [{item, position_data}], background }` shape.
    ///
    /// Items without a style entry are skipped.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedCanvas {
        let items = self
            .selected_items
            .iter()
            .filter_map(|item| {
                self.item_styles
                    .get(&item.id)
                    .map(|style| PersistedItem { item: item.id.clone(), position_data: *style })
            })
            .collect();
        PersistedCanvas { items, background: self.background.clone() }
    }
}

/// One entry of the persisted canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedItem {
    pub item: ItemId,
    pub position_data: ItemStyle,
}

/// The shape the save form serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCanvas {
    pub items: Vec<PersistedItem>,
    pub background: String,
}

impl PersistedCanvas {
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Whether saving this canvas would change what the edit page loaded.
    ///
    /// Items are compared positionally; any id or style field difference counts.
    #[must_use]
    pub fn differs_from(&self, initial: &InitialItems) -> bool {
        if self.background != initial.background || self.items.len() != initial.items.len() {
            return true;
        }
        self.items
            .iter()
            .zip(&initial.items)
            .any(|(current, loaded)| current.item != loaded.item_id || current.position_data != loaded.position_data)
    }
}

/// One entry of the canvas loaded by the edit page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialItem {
    pub item_id: ItemId,
    #[serde(default)]
    pub image: String,
    pub position_data: ItemStyle,
}

/// A previously saved canvas as delivered to the edit page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InitialItems {
    pub items: Vec<InitialItem>,
    #[serde(default)]
    pub background: String,
}

/// Outcome of [`CanvasStore::select_item`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// The item was added with this initial style.
    Added(ItemStyle),
    /// The item was already selected and has been removed.
    Removed,
}

/// Owner of the canvas state.
#[derive(Debug, Clone, Default)]
pub struct CanvasStore {
    state: CanvasState,
    config: CanvasConfig,
    /// Last z-index handed out.
    last_z: i64,
}

impl CanvasStore {
    /// Create an empty store with the built-in config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a custom config.
    #[must_use]
    pub fn with_config(config: CanvasConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Rebuild a store from the persisted save shape. Items carry only their id.
    pub fn from_persisted(persisted: PersistedCanvas, config: CanvasConfig) -> Result<Self, StoreError> {
        let entries = persisted
            .items
            .into_iter()
            .map(|entry| (Item::bare(entry.item), entry.position_data));
        Self::restore(entries, persisted.background, config)
    }

    /// Rebuild a store from the edit page's initial items, keeping image references.
    pub fn from_initial_items(initial: InitialItems, config: CanvasConfig) -> Result<Self, StoreError> {
        let entries = initial
            .items
            .into_iter()
            .map(|entry| (Item::new(entry.item_id, entry.image, None), entry.position_data));
        Self::restore(entries, initial.background, config)
    }

    fn restore(
        entries: impl Iterator<Item = (Item, ItemStyle)>,
        background: String,
        config: CanvasConfig,
    ) -> Result<Self, StoreError> {
        let mut state = CanvasState::default();
        if !background.is_empty() {
            state.background = background;
        }
        for (item, style) in entries {
            if state.item_styles.contains_key(&item.id) {
                return Err(StoreError::DuplicateItem(item.id));
            }
            if !style.is_finite() {
                return Err(StoreError::NonFiniteStyle(item.id));
            }
            let (x_percent, y_percent) = constrain_position_with(style.x_percent, style.y_percent, config.margin_percent);
            let style = ItemStyle {
                scale: clamp_scale(style.scale, config.scale_min, config.scale_max),
                rotate: normalize_angle(style.rotate),
                x_percent,
                y_percent,
                ..style
            };
            state.item_styles.insert(item.id.clone(), style);
            state.selected_items.push(item);
        }
        let last_z = state.item_styles.values().map(|s| s.z_index).max().unwrap_or(0);
        debug!(items = state.selected_items.len(), background = %state.background, "canvas restored");
        Ok(Self { state, config, last_z })
    }

    // --- Queries ---

    /// The current canvas state.
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// The config this store places items with.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Style of one item, if it is selected.
    #[must_use]
    pub fn style(&self, id: &ItemId) -> Option<&ItemStyle> {
        self.state.item_styles.get(id)
    }

    /// The full style map.
    #[must_use]
    pub fn styles(&self) -> &HashMap<ItemId, ItemStyle> {
        &self.state.item_styles
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.state.selected_items.iter().any(|item| item.id == *id)
    }

    #[must_use]
    pub fn background(&self) -> &str {
        &self.state.background
    }

    /// Number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.selected_items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.selected_items.is_empty()
    }

    /// Selected ids sorted bottom-to-top by `(z_index, insertion index)`.
    #[must_use]
    pub fn paint_order(&self) -> Vec<ItemId> {
        let mut order: Vec<(i64, usize, ItemId)> = self
            .state
            .selected_items
            .iter()
            .enumerate()
            .map(|(idx, item)| (self.style(&item.id).map_or(0, |s| s.z_index), idx, item.id.clone()))
            .collect();
        order.sort_by_key(|(z, idx, _)| (*z, *idx));
        order.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Verify `keys(item_styles) == ids(selected_items)`.
    pub fn check_invariant(&self) -> Result<(), StoreError> {
        let missing = self
            .state
            .selected_items
            .iter()
            .filter(|item| !self.state.item_styles.contains_key(&item.id))
            .count();
        let orphaned = self.state.item_styles.keys().filter(|id| !self.contains(id)).count();
        if missing == 0 && orphaned == 0 {
            Ok(())
        } else {
            Err(StoreError::InvariantViolation { missing, orphaned })
        }
    }

    // --- Mutations ---

    /// Toggle an item: add it with its category's initial placement, or
    /// remove it if it is already selected.
    pub fn select_item(&mut self, item: Item) -> Selection {
        if self.contains(&item.id) {
            self.remove_item(&item.id);
            return Selection::Removed;
        }
        let placement = self.config.placement_for(item.category.as_deref());
        let style = ItemStyle {
            z_index: self.next_z_index(),
            scale: 1.0,
            rotate: 0.0,
            x_percent: placement.x_percent,
            y_percent: placement.y_percent,
        };
        debug!(id = %item.id, category = ?item.category, z = style.z_index, "item selected");
        self.state.item_styles.insert(item.id.clone(), style);
        self.state.selected_items.push(item);
        Selection::Added(style)
    }

    /// Remove an item and its style. Returns false if it was not selected.
    ///
    /// Remaining z-indices are not renumbered.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let before = self.state.selected_items.len();
        self.state.selected_items.retain(|item| item.id != *id);
        let had_style = self.state.item_styles.remove(id).is_some();
        let removed = self.state.selected_items.len() != before || had_style;
        if removed {
            debug!(%id, "item removed");
        }
        removed
    }

    /// Replace the style map wholesale.
    ///
    /// Entries for unselected ids are dropped and selected ids missing from
    /// `styles` keep their previous style, so the map always mirrors the
    /// selection.
    pub fn update_styles(&mut self, mut styles: HashMap<ItemId, ItemStyle>) {
        let selected = &self.state.selected_items;
        let supplied = styles.len();
        styles.retain(|id, _| selected.iter().any(|item| item.id == *id));
        let orphaned = supplied - styles.len();

        let mut missing = 0;
        for item in selected {
            if styles.contains_key(&item.id) {
                continue;
            }
            if let Some(prev) = self.state.item_styles.get(&item.id) {
                styles.insert(item.id.clone(), *prev);
                missing += 1;
            }
        }
        if orphaned > 0 || missing > 0 {
            warn!(orphaned, missing, "style update out of sync with selection; repaired");
        }
        trace!(entries = styles.len(), "styles updated");
        self.state.item_styles = styles;
    }

    /// Move an item to the top of the paint order. Returns its new z-index.
    pub fn bump_z_index(&mut self, id: &ItemId) -> Option<i64> {
        if !self.state.item_styles.contains_key(id) {
            return None;
        }
        let z = self.next_z_index();
        let style = self.state.item_styles.get_mut(id)?;
        style.z_index = z;
        trace!(%id, z, "z-index bumped");
        Some(z)
    }

    /// Clear all items and styles. The background is kept.
    pub fn full_reset(&mut self) {
        self.state.selected_items.clear();
        self.state.item_styles.clear();
        self.last_z = 0;
        debug!("canvas reset");
    }

    pub fn set_background(&mut self, background: impl Into<String>) {
        self.state.background = background.into();
        debug!(background = %self.state.background, "background changed");
    }

    /// Hand out a z-index above every one issued or stored so far.
    fn next_z_index(&mut self) -> i64 {
        let stored_max = self.state.item_styles.values().map(|s| s.z_index).max().unwrap_or(0);
        self.last_z = self.last_z.max(stored_max) + 1;
        self.last_z
    }
}
