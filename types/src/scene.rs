//! Scene layout configuration
//!
//! A scene entry binds one display context (battle, menu, map, ...) to the
//! coordinates, scaling, and visibility gating used for every portrait shown
//! there. Entries are built once from config at startup and read-only
//! afterwards.

use serde::{Deserialize, Serialize};

/// Where the portrait container sorts relative to the host's other display
/// layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPriority {
    /// In front of everything
    #[default]
    Topmost,
    /// Beneath the window layer
    BelowWindows,
    /// Beneath battle/map animations
    BelowAnimations,
}

/// Base coordinate for one party slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPosition {
    pub x: i32,
    pub y: i32,
}

/// Per-scene portrait layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Scene identifier the host reports when the scene is entered
    pub name: String,

    // ─── Placement ──────────────────────────────────────────────────────────
    /// Base coordinates, one entry per party slot. Members beyond the last
    /// entry show nothing in this scene.
    #[serde(default, rename = "position")]
    pub positions: Vec<SlotPosition>,

    /// Horizontal scale percentage applied on top of each layer's own scale
    /// (0 = unset, rendered as 100)
    #[serde(default)]
    pub scale_x: u16,

    /// Vertical scale percentage applied on top of each layer's own scale
    /// (0 = unset, rendered as 100)
    #[serde(default)]
    pub scale_y: u16,

    // ─── Visibility ─────────────────────────────────────────────────────────
    /// Switch gating visibility of every portrait in this scene
    /// (0 = always visible)
    #[serde(default)]
    pub show_switch: u32,

    /// Flip portraits horizontally
    #[serde(default)]
    pub mirror: bool,

    /// Sorting tier for the portrait container
    #[serde(default)]
    pub priority: RenderPriority,
}
