/// Lifecycle notifications the host feeds into the engine.
///
/// These represent "interesting things that happened" at a higher level
/// than raw engine hooks: scene transitions, the frame clock, and the
/// per-actor battle events that drive transient display flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageSignal {
    // Scene lifecycle
    SceneEntered {
        /// Host-reported scene identifier, matched against scene configs
        scene: String,
    },
    SceneExited,

    // Frame clock
    FrameAdvanced {
        frame: u64,
    },

    // Per-actor battle events
    DamageTaken {
        actor_id: u32,
        /// Frame the hit landed on; opens the damage window
        frame: u64,
    },
    ActionStarted {
        actor_id: u32,
    },
    ActionEnded {
        actor_id: u32,
    },

    // Roster changes
    ActorDismissed {
        actor_id: u32,
    },
}
