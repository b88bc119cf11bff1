//! Portrait state tracking
//!
//! The tracker is the engine's stateful shell: it consumes
//! [`StageSignal`]s to maintain the active scene, the frame clock, and the
//! per-actor battle flags, then delegates the per-frame file selection to
//! the pure resolution functions.

use std::collections::HashMap;

use tachie_types::SceneConfig;

use super::PortraitSet;
use crate::context::GameContext;
use crate::events::{SignalHandler, StageSignal};
use crate::resolve::{self, ResolvedLayer};
use crate::rules::{EvalContext, EvalError, PredicateRegistry};
use crate::snapshot::ActorSnapshot;

/// Frames an actor counts as "recently damaged" after a hit.
pub const DAMAGE_WINDOW_FRAMES: u64 = 30;

/// Transient battle flags for one actor.
#[derive(Debug, Clone, Copy, Default)]
struct ActorFlags {
    /// Frame of the last damage event; cleared on read once the window has
    /// passed
    damage_frame: Option<u64>,
    acting: bool,
}

impl ActorFlags {
    fn is_damaged(&mut self, now: u64) -> bool {
        if let Some(frame) = self.damage_frame {
            if frame + DAMAGE_WINDOW_FRAMES > now {
                return true;
            }
            self.damage_frame = None;
        }
        false
    }
}

/// Tracks per-actor battle flags and the active scene, and resolves
/// portrait layers on demand.
///
/// One resolution per actor per frame is expected; the host calls
/// [`PortraitTracker::resolve`] from its update loop for each roster
/// member.
#[derive(Debug, Default)]
pub struct PortraitTracker {
    /// Portrait and scene definitions, loaded once at startup
    definitions: PortraitSet,

    /// Host-registered script predicates
    predicates: PredicateRegistry,

    /// Battle flags keyed by actor id
    flags: HashMap<u32, ActorFlags>,

    /// Latest frame reported by the host
    frame: u64,

    /// Scene currently on stage, when it has a portrait binding
    active_scene: Option<String>,
}

impl PortraitTracker {
    pub fn new(definitions: PortraitSet) -> Self {
        Self {
            definitions,
            ..Default::default()
        }
    }

    pub fn with_predicates(definitions: PortraitSet, predicates: PredicateRegistry) -> Self {
        Self {
            definitions,
            predicates,
            ..Default::default()
        }
    }

    /// Register a script predicate backing rules' `script` condition.
    pub fn register_predicate<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&ActorSnapshot, &dyn GameContext) -> bool + Send + Sync + 'static,
    {
        self.predicates.register(name, predicate);
    }

    pub fn definitions(&self) -> &PortraitSet {
        &self.definitions
    }

    /// Scene config currently bound, if any.
    pub fn active_scene(&self) -> Option<&SceneConfig> {
        self.active_scene
            .as_deref()
            .and_then(|name| self.definitions.scene(name))
    }

    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    /// Whether `actor_id` is inside the post-damage window this frame.
    /// Reading an expired window clears its sentinel.
    pub fn is_recently_damaged(&mut self, actor_id: u32) -> bool {
        let now = self.frame;
        self.flags
            .get_mut(&actor_id)
            .map(|flags| flags.is_damaged(now))
            .unwrap_or(false)
    }

    pub fn is_acting(&self, actor_id: u32) -> bool {
        self.flags
            .get(&actor_id)
            .map(|flags| flags.acting)
            .unwrap_or(false)
    }

    /// Resolve every portrait layer of `actor` for party slot `slot`
    /// against the active scene.
    ///
    /// Returns `Ok(None)` when no bound scene is on stage, the actor has no
    /// configured layers, or the scene has no coordinate for `slot`.
    pub fn resolve(
        &mut self,
        actor: &ActorSnapshot,
        slot: usize,
        game: &dyn GameContext,
    ) -> Result<Option<Vec<ResolvedLayer>>, EvalError> {
        let Some(scene_name) = self.active_scene.clone() else {
            return Ok(None);
        };

        // Flags first: the damage check needs mutable access for its lazy
        // expiry, the definitions borrow below does not.
        let damaged = self.is_recently_damaged(actor.id);
        let acting = self.is_acting(actor.id);

        let Some(scene) = self.definitions.scene(&scene_name) else {
            return Ok(None);
        };
        let layers = self.definitions.layers_for(actor.id);
        let ctx = EvalContext {
            actor,
            acting,
            damaged,
            game,
            predicates: &self.predicates,
        };
        resolve::resolve_layers(layers, scene, slot, &ctx)
    }
}

impl SignalHandler for PortraitTracker {
    fn handle_signal(&mut self, signal: &StageSignal) {
        match signal {
            StageSignal::SceneEntered { scene } => {
                if self.definitions.scene(scene).is_some() {
                    self.active_scene = Some(scene.clone());
                } else {
                    tracing::debug!(scene = %scene, "no portrait binding for scene");
                    self.active_scene = None;
                }
            }
            StageSignal::SceneExited => {
                self.active_scene = None;
            }
            StageSignal::FrameAdvanced { frame } => {
                self.frame = *frame;
            }
            StageSignal::DamageTaken { actor_id, frame } => {
                self.frame = self.frame.max(*frame);
                self.flags.entry(*actor_id).or_default().damage_frame = Some(*frame);
            }
            StageSignal::ActionStarted { actor_id } => {
                self.flags.entry(*actor_id).or_default().acting = true;
            }
            StageSignal::ActionEnded { actor_id } => {
                if let Some(flags) = self.flags.get_mut(actor_id) {
                    flags.acting = false;
                }
            }
            StageSignal::ActorDismissed { actor_id } => {
                self.flags.remove(actor_id);
            }
        }
    }
}
