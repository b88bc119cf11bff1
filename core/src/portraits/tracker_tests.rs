//! Tests for the portrait tracker
//!
//! Verifies scene binding, damage-window expiry, and the end-to-end
//! resolution contract (skips, overrides, idempotence).

use tachie_types::{FileRule, PortraitConfig, PortraitLayer, SceneConfig, SlotPosition};

use super::set::PortraitSet;
use super::tracker::{DAMAGE_WINDOW_FRAMES, PortraitTracker};
use crate::context::MapContext;
use crate::events::{SignalHandler, StageSignal};
use crate::rules::EvalError;
use crate::snapshot::ActorSnapshot;

/// Create a minimal layer for testing
fn make_layer(actor_id: u32, files: Vec<FileRule>, dynamic_file: Option<&str>) -> PortraitLayer {
    PortraitLayer {
        actor_id,
        label: String::new(),
        opacity: 255,
        x: 0,
        y: 0,
        scale_x: 0,
        scale_y: 0,
        sprite_sheet: None,
        files,
        dynamic_file: dynamic_file.map(str::to_string),
    }
}

fn rule(file_name: &str) -> FileRule {
    FileRule {
        file_name: file_name.to_string(),
        ..Default::default()
    }
}

fn damage_rule(file_name: &str) -> FileRule {
    FileRule {
        file_name: file_name.to_string(),
        damage: true,
        ..Default::default()
    }
}

fn make_scene(name: &str) -> SceneConfig {
    SceneConfig {
        name: name.to_string(),
        positions: vec![SlotPosition { x: 0, y: 0 }, SlotPosition { x: 150, y: 0 }],
        ..Default::default()
    }
}

fn make_tracker(portraits: Vec<PortraitLayer>, scenes: Vec<SceneConfig>) -> PortraitTracker {
    let mut set = PortraitSet::new();
    set.add_config(PortraitConfig {
        portraits,
        scenes,
        ..Default::default()
    });
    PortraitTracker::new(set)
}

fn actor(id: u32) -> ActorSnapshot {
    ActorSnapshot {
        id,
        hp_ratio: 1.0,
        ..Default::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scene binding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_no_active_scene_resolves_nothing() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle")], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();

    let resolved = tracker.resolve(&actor(1), 0, &game).unwrap();
    assert!(resolved.is_none(), "no scene entered yet");
}

#[test]
fn test_unbound_scene_resolves_nothing() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle")], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();

    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "shop".to_string(),
    });
    assert!(tracker.active_scene().is_none());
    assert!(tracker.resolve(&actor(1), 0, &game).unwrap().is_none());
}

#[test]
fn test_scene_exit_clears_the_binding() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle")], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();

    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });
    assert!(tracker.resolve(&actor(1), 0, &game).unwrap().is_some());

    tracker.handle_signal(&StageSignal::SceneExited);
    assert!(tracker.resolve(&actor(1), 0, &game).unwrap().is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Not-applicable skips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unregistered_actor_is_skipped() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle")], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });

    let resolved = tracker.resolve(&actor(42), 0, &game).unwrap();
    assert!(resolved.is_none(), "actor 42 has no layers configured");
}

#[test]
fn test_slot_beyond_scene_positions_is_skipped() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle")], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });

    assert!(tracker.resolve(&actor(1), 2, &game).unwrap().is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Damage window
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_damage_window_opens_and_expires() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle"), damage_rule("hurt")], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });
    tracker.handle_signal(&StageSignal::DamageTaken {
        actor_id: 1,
        frame: 100,
    });

    let resolved = tracker.resolve(&actor(1), 0, &game).unwrap().unwrap();
    assert_eq!(resolved[0].file_name.as_deref(), Some("hurt"));

    // Last frame inside the window
    tracker.handle_signal(&StageSignal::FrameAdvanced {
        frame: 100 + DAMAGE_WINDOW_FRAMES - 1,
    });
    assert!(tracker.is_recently_damaged(1));

    // Window over: flag reads false and the sentinel is cleared
    tracker.handle_signal(&StageSignal::FrameAdvanced {
        frame: 100 + DAMAGE_WINDOW_FRAMES,
    });
    assert!(!tracker.is_recently_damaged(1));

    let resolved = tracker.resolve(&actor(1), 0, &game).unwrap().unwrap();
    assert_eq!(resolved[0].file_name.as_deref(), Some("idle"));
}

#[test]
fn test_damage_flags_are_per_actor() {
    let mut tracker = make_tracker(
        vec![
            make_layer(1, vec![rule("a_idle"), damage_rule("a_hurt")], None),
            make_layer(2, vec![rule("b_idle"), damage_rule("b_hurt")], None),
        ],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });
    tracker.handle_signal(&StageSignal::DamageTaken {
        actor_id: 1,
        frame: 10,
    });

    let first = tracker.resolve(&actor(1), 0, &game).unwrap().unwrap();
    let second = tracker.resolve(&actor(2), 1, &game).unwrap().unwrap();
    assert_eq!(first[0].file_name.as_deref(), Some("a_hurt"));
    assert_eq!(second[0].file_name.as_deref(), Some("b_idle"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Action flags
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_action_flag_follows_start_and_end_signals() {
    let action_rule = FileRule {
        file_name: "attack".to_string(),
        action: true,
        ..Default::default()
    };
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle"), action_rule], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });

    tracker.handle_signal(&StageSignal::ActionStarted { actor_id: 1 });
    let resolved = tracker.resolve(&actor(1), 0, &game).unwrap().unwrap();
    assert_eq!(resolved[0].file_name.as_deref(), Some("attack"));

    tracker.handle_signal(&StageSignal::ActionEnded { actor_id: 1 });
    let resolved = tracker.resolve(&actor(1), 0, &game).unwrap().unwrap();
    assert_eq!(resolved[0].file_name.as_deref(), Some("idle"));
}

#[test]
fn test_dismissed_actor_loses_flags() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle"), damage_rule("hurt")], None)],
        vec![make_scene("battle")],
    );
    tracker.handle_signal(&StageSignal::DamageTaken {
        actor_id: 1,
        frame: 5,
    });
    assert!(tracker.is_recently_damaged(1));

    tracker.handle_signal(&StageSignal::ActorDismissed { actor_id: 1 });
    assert!(!tracker.is_recently_damaged(1));
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution contract
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_template_fallback_through_tracker() {
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![damage_rule("hurt")], Some("img_{hp:40,60,80}"))],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });

    let snapshot = ActorSnapshot {
        id: 1,
        hp_ratio: 0.75,
        ..Default::default()
    };
    let resolved = tracker.resolve(&snapshot, 0, &game).unwrap().unwrap();
    assert_eq!(resolved[0].file_name.as_deref(), Some("img_2"));
}

#[test]
fn test_resolution_is_idempotent() {
    let mut tracker = make_tracker(
        vec![
            make_layer(1, vec![rule("base"), damage_rule("hurt")], None),
            make_layer(1, vec![], Some("face_{stateId}")),
        ],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });
    tracker.handle_signal(&StageSignal::DamageTaken {
        actor_id: 1,
        frame: 3,
    });

    let snapshot = actor(1);
    let first = tracker.resolve(&snapshot, 0, &game).unwrap();
    let second = tracker.resolve(&snapshot, 0, &game).unwrap();
    assert_eq!(first, second, "unchanged state must resolve identically");
}

#[test]
fn test_layers_resolve_in_declaration_order() {
    let mut tracker = make_tracker(
        vec![
            make_layer(1, vec![rule("body")], None),
            make_layer(1, vec![rule("face")], None),
        ],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });

    let resolved = tracker.resolve(&actor(1), 0, &game).unwrap().unwrap();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].file_name.as_deref(), Some("body"));
    assert_eq!(resolved[1].file_name.as_deref(), Some("face"));
}

#[test]
fn test_unknown_predicate_surfaces_as_error() {
    let script_rule = FileRule {
        file_name: "special".to_string(),
        script: "never_registered".to_string(),
        ..Default::default()
    };
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![script_rule], None)],
        vec![make_scene("battle")],
    );
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });

    let err = tracker.resolve(&actor(1), 0, &game).unwrap_err();
    assert_eq!(err, EvalError::UnknownPredicate("never_registered".to_string()));
}

#[test]
fn test_registered_predicate_selects_file() {
    let script_rule = FileRule {
        file_name: "desperate".to_string(),
        script: "half_hp".to_string(),
        ..Default::default()
    };
    let mut tracker = make_tracker(
        vec![make_layer(1, vec![rule("idle"), script_rule], None)],
        vec![make_scene("battle")],
    );
    tracker.register_predicate("half_hp", |snapshot, _| snapshot.hp_ratio <= 0.5);
    let game = MapContext::new();
    tracker.handle_signal(&StageSignal::SceneEntered {
        scene: "battle".to_string(),
    });

    let weak = ActorSnapshot {
        id: 1,
        hp_ratio: 0.25,
        ..Default::default()
    };
    let resolved = tracker.resolve(&weak, 0, &game).unwrap().unwrap();
    assert_eq!(resolved[0].file_name.as_deref(), Some("desperate"));

    let resolved = tracker.resolve(&actor(1), 0, &game).unwrap().unwrap();
    assert_eq!(resolved[0].file_name.as_deref(), Some("idle"));
}
