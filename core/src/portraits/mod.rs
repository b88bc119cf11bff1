//! Portrait tracking system
//!
//! This module provides:
//! - **Definitions**: per-actor layer lists and scene layouts, indexed for
//!   per-frame lookup
//! - **Tracker**: signal handler owning the transient battle flags and the
//!   active scene
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  PortraitConfig (TOML config)                    │
//! │  "actor 1, layer 'face': hurt.png while damaged, idle.png else" │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                   StageSignal::DamageTaken
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │           PortraitTracker (flags + active scene)                 │
//! │  "actor 1 was hit on frame 412, scene 'battle' is on stage"     │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                     resolve() per frame
//!                              │
//!                              ▼
//!                  Vec<ResolvedLayer> → renderer
//! ```

mod set;
mod tracker;

#[cfg(test)]
mod tracker_tests;

pub use set::PortraitSet;
pub use tracker::{DAMAGE_WINDOW_FRAMES, PortraitTracker};
