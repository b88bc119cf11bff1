//! Display-rule evaluation
//!
//! A [`FileRule`](tachie_types::FileRule) is a conjunction of optional
//! conditions; [`evaluate`] checks them against an [`EvalContext`].
//! Conditions left at their unset sentinel (zero id, empty string, `false`
//! flag) pass vacuously, so a rule with nothing configured always matches.

use std::collections::HashMap;

use tachie_types::FileRule;
use thiserror::Error;

use crate::context::GameContext;
use crate::snapshot::ActorSnapshot;

/// Errors raised while evaluating rules or resolving layers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// A rule referenced a script predicate the host never registered.
    /// Surfaced for the whole refresh rather than silently skipped: a
    /// missing predicate is broken configuration, not a non-match.
    #[error("unknown script predicate `{0}`")]
    UnknownPredicate(String),
}

/// Host-supplied boolean predicate over actor state.
pub type ScriptPredicate = Box<dyn Fn(&ActorSnapshot, &dyn GameContext) -> bool + Send + Sync>;

/// Named predicates backing rules' `script` condition.
///
/// Replaces free-form expression evaluation: the config names a predicate,
/// the host registers the matching closure at startup.
#[derive(Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, ScriptPredicate>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&ActorSnapshot, &dyn GameContext) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Box::new(predicate));
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    fn eval(
        &self,
        name: &str,
        actor: &ActorSnapshot,
        game: &dyn GameContext,
    ) -> Result<bool, EvalError> {
        let Some(predicate) = self.predicates.get(name) else {
            return Err(EvalError::UnknownPredicate(name.to_string()));
        };
        Ok(predicate(actor, game))
    }
}

impl std::fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("names", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Everything a rule can be judged against on one refresh.
pub struct EvalContext<'a> {
    pub actor: &'a ActorSnapshot,

    /// Actor is currently performing an action
    pub acting: bool,

    /// Actor is inside the post-damage window
    pub damaged: bool,

    /// Global switch/variable store for this tick
    pub game: &'a dyn GameContext,

    /// Host-registered script predicates
    pub predicates: &'a PredicateRegistry,
}

/// Check every condition of `rule` against `ctx`.
///
/// Returns `Ok(true)` only when all conditions hold; conditions at their
/// unset sentinel always hold. The script predicate runs last so that
/// cheap structural conditions short-circuit before host code is invoked.
pub fn evaluate(rule: &FileRule, ctx: &EvalContext) -> Result<bool, EvalError> {
    let actor = ctx.actor;
    let hp = actor.hp_percent();

    let passed = (rule.hp_upper == 0 || hp <= f32::from(rule.hp_upper))
        && (rule.hp_lower == 0 || hp >= f32::from(rule.hp_lower))
        && (!rule.damage || ctx.damaged)
        && (!rule.action || ctx.acting)
        && (rule.state == 0 || actor.has_state(rule.state))
        && (rule.weapon == 0 || actor.has_weapon(rule.weapon))
        && (rule.armor == 0 || actor.has_armor(rule.armor))
        && (rule.note.is_empty() || actor.portrait_note() == Some(rule.note.as_str()))
        && (rule.switch == 0 || ctx.game.switch(rule.switch));

    if !passed {
        return Ok(false);
    }
    if rule.script.is_empty() {
        return Ok(true);
    }
    ctx.predicates.eval(&rule.script, actor, ctx.game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MapContext;

    fn ctx<'a>(
        actor: &'a ActorSnapshot,
        game: &'a MapContext,
        predicates: &'a PredicateRegistry,
    ) -> EvalContext<'a> {
        EvalContext {
            actor,
            acting: false,
            damaged: false,
            game,
            predicates,
        }
    }

    #[test]
    fn test_rule_with_no_conditions_passes() {
        let actor = ActorSnapshot::default();
        let game = MapContext::new();
        let predicates = PredicateRegistry::new();
        let rule = FileRule::default();

        assert_eq!(evaluate(&rule, &ctx(&actor, &game, &predicates)), Ok(true));
    }

    #[test]
    fn test_hp_upper_bound() {
        let game = MapContext::new();
        let predicates = PredicateRegistry::new();
        let rule = FileRule {
            hp_upper: 50,
            ..Default::default()
        };

        // The bound is inclusive
        let low = ActorSnapshot { hp_ratio: 0.5, ..Default::default() };
        assert_eq!(evaluate(&rule, &ctx(&low, &game, &predicates)), Ok(true));

        let high = ActorSnapshot { hp_ratio: 0.55, ..Default::default() };
        assert_eq!(evaluate(&rule, &ctx(&high, &game, &predicates)), Ok(false));
    }

    #[test]
    fn test_hp_lower_bound() {
        let game = MapContext::new();
        let predicates = PredicateRegistry::new();
        let rule = FileRule {
            hp_lower: 80,
            ..Default::default()
        };

        let high = ActorSnapshot { hp_ratio: 0.8, ..Default::default() };
        assert_eq!(evaluate(&rule, &ctx(&high, &game, &predicates)), Ok(true));

        let low = ActorSnapshot { hp_ratio: 0.79, ..Default::default() };
        assert_eq!(evaluate(&rule, &ctx(&low, &game, &predicates)), Ok(false));
    }

    #[test]
    fn test_conditions_are_a_conjunction() {
        let game = MapContext::new();
        let predicates = PredicateRegistry::new();
        let rule = FileRule {
            state: 5,
            weapon: 2,
            ..Default::default()
        };

        // State matches but weapon does not
        let actor = ActorSnapshot {
            states: vec![crate::snapshot::StatusEffect::new(5)],
            weapons: vec![9],
            ..Default::default()
        };
        assert_eq!(evaluate(&rule, &ctx(&actor, &game, &predicates)), Ok(false));

        let armed = ActorSnapshot {
            weapons: vec![2],
            ..actor
        };
        assert_eq!(evaluate(&rule, &ctx(&armed, &game, &predicates)), Ok(true));
    }

    #[test]
    fn test_note_condition_is_case_sensitive() {
        let game = MapContext::new();
        let predicates = PredicateRegistry::new();
        let rule = FileRule {
            note: "Casual".to_string(),
            ..Default::default()
        };

        let actor = ActorSnapshot {
            notes: vec!["casual".to_string()],
            ..Default::default()
        };
        assert_eq!(evaluate(&rule, &ctx(&actor, &game, &predicates)), Ok(false));

        let exact = ActorSnapshot {
            notes: vec!["Casual".to_string()],
            ..Default::default()
        };
        assert_eq!(evaluate(&rule, &ctx(&exact, &game, &predicates)), Ok(true));
    }

    #[test]
    fn test_switch_condition_reads_game_context() {
        let actor = ActorSnapshot::default();
        let predicates = PredicateRegistry::new();
        let rule = FileRule {
            switch: 3,
            ..Default::default()
        };

        let mut game = MapContext::new();
        assert_eq!(evaluate(&rule, &ctx(&actor, &game, &predicates)), Ok(false));

        game.set_switch(3, true);
        assert_eq!(evaluate(&rule, &ctx(&actor, &game, &predicates)), Ok(true));
    }

    #[test]
    fn test_registered_predicate_gates_the_rule() {
        let game = MapContext::new();
        let mut predicates = PredicateRegistry::new();
        predicates.register("low_mp", |actor, _| actor.hp_ratio < 0.5);
        let rule = FileRule {
            script: "low_mp".to_string(),
            ..Default::default()
        };

        let weak = ActorSnapshot { hp_ratio: 0.3, ..Default::default() };
        assert_eq!(evaluate(&rule, &ctx(&weak, &game, &predicates)), Ok(true));

        let strong = ActorSnapshot { hp_ratio: 0.9, ..Default::default() };
        assert_eq!(evaluate(&rule, &ctx(&strong, &game, &predicates)), Ok(false));
    }

    #[test]
    fn test_unregistered_predicate_is_an_error() {
        let actor = ActorSnapshot::default();
        let game = MapContext::new();
        let predicates = PredicateRegistry::new();
        let rule = FileRule {
            script: "missing".to_string(),
            ..Default::default()
        };

        assert_eq!(
            evaluate(&rule, &ctx(&actor, &game, &predicates)),
            Err(EvalError::UnknownPredicate("missing".to_string()))
        );
    }
}
