//! Live portrait selection engine.
//!
//! `tachie-core` evaluates declarative display rules against per-tick actor
//! state and decides which image file each portrait layer shows. The host
//! feeds lifecycle signals (scene changes, damage, actions) into a
//! [`PortraitTracker`] and calls [`PortraitTracker::resolve`] once per frame
//! for each roster member; the resolved layer descriptors are consumed by an
//! external rendering layer.

pub mod config;
pub mod context;
pub mod events;
pub mod portraits;
pub mod resolve;
pub mod rules;
pub mod snapshot;
pub mod template;

// Re-exports for convenience
pub use config::{ConfigError, default_custom_dir, load_definitions, load_file};
pub use context::{GameContext, MapContext};
pub use events::{SignalHandler, StageSignal};
pub use portraits::{DAMAGE_WINDOW_FRAMES, PortraitSet, PortraitTracker};
pub use resolve::{ResolvedLayer, resolve_file, resolve_layers};
pub use rules::{EvalContext, EvalError, PredicateRegistry, evaluate};
pub use snapshot::{ActorSnapshot, StatusEffect};
pub use template::expand;
