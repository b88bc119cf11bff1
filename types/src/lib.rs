//! Shared configuration types for the portrait engine.
//!
//! Everything here is pure data: the TOML-facing schema for portrait
//! layers, file rules, and scene layouts, plus the small bits of arithmetic
//! (sprite-sheet cropping) that belong with the data rather than with the
//! evaluation engine.

pub mod portrait;
pub mod scene;

pub use portrait::{Anchor, FileRule, FrameRect, PortraitConfig, PortraitLayer, SpriteSheet};
pub use scene::{RenderPriority, SceneConfig, SlotPosition};
