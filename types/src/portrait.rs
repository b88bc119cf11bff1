//! Portrait layer and file-rule definition types
//!
//! Definitions are templates loaded from TOML config files that describe
//! which image layers compose an actor's portrait and under what conditions
//! each candidate file is shown.

use serde::{Deserialize, Serialize};

use crate::scene::SceneConfig;

// ═══════════════════════════════════════════════════════════════════════════
// Anchor
// ═══════════════════════════════════════════════════════════════════════════

/// Image anchor shared by every portrait layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Coordinates name the image's top-left corner
    #[default]
    TopLeft,
    /// Coordinates name the image's center
    Center,
    /// Coordinates name the bottom midpoint of the image
    BottomCenter,
}

// ═══════════════════════════════════════════════════════════════════════════
// Portrait Layers
// ═══════════════════════════════════════════════════════════════════════════

/// One image layer of an actor's composite portrait.
///
/// An actor may own several layers (outfit, face, effect overlays); layers
/// declared later render in front of earlier ones. Each layer selects its
/// file independently per refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortraitLayer {
    /// Actor this layer belongs to
    pub actor_id: u32,

    /// Human-readable label, for config bookkeeping only
    #[serde(default)]
    pub label: String,

    /// Layer opacity, 0-255
    #[serde(default = "default_opacity")]
    pub opacity: u8,

    // ─── Placement ──────────────────────────────────────────────────────────
    /// Local X offset, added to the scene's per-slot base coordinate
    #[serde(default)]
    pub x: i32,

    /// Local Y offset, added to the scene's per-slot base coordinate
    #[serde(default)]
    pub y: i32,

    /// Horizontal scale percentage (0 = unset, rendered as 100)
    #[serde(default)]
    pub scale_x: u16,

    /// Vertical scale percentage (0 = unset, rendered as 100)
    #[serde(default)]
    pub scale_y: u16,

    /// Crop descriptor when the layer image is packed in a sprite sheet
    pub sprite_sheet: Option<SpriteSheet>,

    // ─── File selection ─────────────────────────────────────────────────────
    /// Candidate files with display conditions. When several match, the
    /// entry declared last wins.
    #[serde(default, rename = "file")]
    pub files: Vec<FileRule>,

    /// Template expanded into a file name when no rule matches
    /// (e.g. `"portrait_{hp:40,60,80}"`)
    pub dynamic_file: Option<String>,
}

/// One candidate file together with its display conditions.
///
/// Every condition is optional; a condition left at its unset sentinel
/// (zero id, empty string, `false` flag) is vacuously satisfied. The rule
/// matches only when ALL of its conditions hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRule {
    /// Image file name shown while this rule matches
    pub file_name: String,

    // ─── HP ─────────────────────────────────────────────────────────────────
    /// Matches while the HP percentage is at or below this bound (0 = unset)
    #[serde(default)]
    pub hp_upper: u8,

    /// Matches while the HP percentage is at or above this bound (0 = unset)
    #[serde(default)]
    pub hp_lower: u8,

    // ─── Battle flags ───────────────────────────────────────────────────────
    /// Requires the actor to be inside the post-damage window
    #[serde(default)]
    pub damage: bool,

    /// Requires the actor to be performing an action
    #[serde(default)]
    pub action: bool,

    // ─── Database conditions ────────────────────────────────────────────────
    /// Required active status-effect id (0 = unset)
    #[serde(default)]
    pub state: u32,

    /// Required equipped weapon id (0 = unset)
    #[serde(default)]
    pub weapon: u32,

    /// Required equipped armor id (0 = unset)
    #[serde(default)]
    pub armor: u32,

    /// Required inherited note-tag value, compared case-sensitively
    /// (empty = unset)
    #[serde(default)]
    pub note: String,

    /// Required game switch id (0 = unset)
    #[serde(default)]
    pub switch: u32,

    /// Name of a host-registered predicate that must return true
    /// (empty = unset)
    #[serde(default)]
    pub script: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Sprite Sheets
// ═══════════════════════════════════════════════════════════════════════════

/// Sprite-sheet crop descriptor. Column and row numbers are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Total number of columns in the sheet
    #[serde(default = "default_one")]
    pub max_column: u32,

    /// Total number of rows in the sheet
    #[serde(default = "default_one")]
    pub max_row: u32,

    /// Column to crop (1-based)
    #[serde(default = "default_one")]
    pub column: u32,

    /// Row to crop (1-based)
    #[serde(default = "default_one")]
    pub row: u32,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            max_column: 1,
            max_row: 1,
            column: 1,
            row: 1,
        }
    }
}

impl SpriteSheet {
    /// Compute the crop rectangle for a bitmap of the given size.
    ///
    /// # Examples
    /// ```
    /// use tachie_types::SpriteSheet;
    ///
    /// let sheet = SpriteSheet { max_column: 2, max_row: 2, column: 2, row: 1 };
    /// let frame = sheet.frame(100, 100);
    /// assert_eq!((frame.x, frame.y, frame.width, frame.height), (50, 0, 50, 50));
    /// ```
    pub fn frame(&self, bitmap_width: u32, bitmap_height: u32) -> FrameRect {
        let width = bitmap_width / self.max_column.max(1);
        let height = bitmap_height / self.max_row.max(1);
        FrameRect {
            x: self.column.saturating_sub(1) * width,
            y: self.row.saturating_sub(1) * height,
            width,
            height,
        }
    }
}

/// Crop rectangle in bitmap pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// ═══════════════════════════════════════════════════════════════════════════
// Config File Structure
// ═══════════════════════════════════════════════════════════════════════════

/// Root structure for portrait definition files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortraitConfig {
    /// Image anchor shared by all layers. When definitions span several
    /// files, the last loaded document wins.
    #[serde(default)]
    pub origin: Anchor,

    /// Portrait layers, grouped per actor by `actor_id`
    #[serde(default, rename = "portrait")]
    pub portraits: Vec<PortraitLayer>,

    /// Scene layout entries
    #[serde(default, rename = "scene")]
    pub scenes: Vec<SceneConfig>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn default_opacity() -> u8 {
    255
}

fn default_one() -> u32 {
    1
}
