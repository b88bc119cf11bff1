//! Read-only actor state supplied by the host each tick.
//!
//! The engine never owns actor data; the host builds an [`ActorSnapshot`]
//! from its own game state and passes it into each resolution call.

/// One active status effect on an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEffect {
    pub id: u32,
    /// Excluded from `{stateId}` template expansion
    pub hidden_from_portrait: bool,
}

impl StatusEffect {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            hidden_from_portrait: false,
        }
    }
}

/// Snapshot of one actor's live state for a single refresh.
///
/// All collections are host-ordered: `states` carries the highest display
/// priority first, `notes` carries trait sources in precedence order
/// (class, then equipment, then status effects).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorSnapshot {
    pub id: u32,

    /// Current HP as a fraction of max HP, in [0, 1]
    pub hp_ratio: f32,

    /// Active status effects, highest display priority first
    pub states: Vec<StatusEffect>,

    /// Equipped weapon ids
    pub weapons: Vec<u32>,

    /// Equipped armor ids
    pub armors: Vec<u32>,

    /// Note-tag values from the actor's trait sources, precedence order
    pub notes: Vec<String>,
}

impl ActorSnapshot {
    /// HP as a percentage in [0, 100].
    pub fn hp_percent(&self) -> f32 {
        self.hp_ratio * 100.0
    }

    pub fn has_state(&self, id: u32) -> bool {
        self.states.iter().any(|s| s.id == id)
    }

    pub fn has_weapon(&self, id: u32) -> bool {
        self.weapons.contains(&id)
    }

    pub fn has_armor(&self, id: u32) -> bool {
        self.armors.contains(&id)
    }

    /// First non-empty inherited note-tag value, if any.
    pub fn portrait_note(&self) -> Option<&str> {
        self.notes
            .iter()
            .map(String::as_str)
            .find(|note| !note.is_empty())
    }

    /// Highest-priority status effect not hidden from portraits.
    pub fn display_state(&self) -> Option<u32> {
        self.states
            .iter()
            .find(|s| !s.hidden_from_portrait)
            .map(|s| s.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_note_skips_empty_sources() {
        let actor = ActorSnapshot {
            notes: vec![String::new(), "armored".to_string(), "ignored".to_string()],
            ..Default::default()
        };
        assert_eq!(actor.portrait_note(), Some("armored"));
    }

    #[test]
    fn test_display_state_skips_hidden() {
        let actor = ActorSnapshot {
            states: vec![
                StatusEffect { id: 4, hidden_from_portrait: true },
                StatusEffect::new(7),
            ],
            ..Default::default()
        };
        assert_eq!(actor.display_state(), Some(7));
    }
}
