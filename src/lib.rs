//! Interactive outfit canvas: drag, scale, and rotate clothing items.
//!
//! This crate is compiled to WebAssembly and runs in the browser. A user picks
//! wardrobe items, which appear on a 4:5 canvas at a category-specific spot;
//! each item can then be dragged, scaled and rotated around its center, brought
//! to the front, or removed. Positions are stored as percentages of the
//! container so layouts survive resizing. The host page renders
//! [`view::ItemView`]s and persists [`store::PersistedCanvas`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Selected items, their styles, background, persisted shapes |
//! | [`engine`] | Gesture handling in the testable [`engine::EngineCore`] |
//! | [`input`] | Pointer samples and the gesture state machine |
//! | [`geometry`] | Angle snapping, position/scale clamping, pivot math |
//! | [`view`] | CSS for items, render snapshots, pointer routing |
//! | [`dom`] | Browser binding over `web-sys` events |
//! | [`listeners`] | Window listener lifetime for gestures and resizing |
//! | [`config`] | Snap, clamp, and placement tuning |
//! | [`consts`] | Default thresholds and reference sizes |

pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod listeners;
pub mod store;
pub mod view;
