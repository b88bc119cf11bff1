//! Indexed portrait definitions

use std::collections::HashMap;

use tachie_types::{Anchor, PortraitConfig, PortraitLayer, SceneConfig};

/// Portrait definitions indexed for per-frame lookup.
#[derive(Debug, Clone, Default)]
pub struct PortraitSet {
    /// Layers per actor, declaration order preserved
    layers: HashMap<u32, Vec<PortraitLayer>>,

    /// Scenes keyed by name
    scenes: HashMap<String, SceneConfig>,

    /// Image anchor shared by all layers
    anchor: Anchor,
}

impl PortraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one config document into the set. Layer lists extend per
    /// actor; a scene re-using an existing name replaces it. Returns the
    /// replaced scene names so the caller can report them.
    pub fn add_config(&mut self, config: PortraitConfig) -> Vec<String> {
        let mut duplicates = Vec::new();

        self.anchor = config.origin;
        for layer in config.portraits {
            self.layers.entry(layer.actor_id).or_default().push(layer);
        }
        for scene in config.scenes {
            if self.scenes.contains_key(&scene.name) {
                duplicates.push(scene.name.clone());
            }
            self.scenes.insert(scene.name.clone(), scene);
        }

        duplicates
    }

    /// Layers configured for an actor, in declaration order. Empty when the
    /// actor is not registered.
    pub fn layers_for(&self, actor_id: u32) -> &[PortraitLayer] {
        self.layers
            .get(&actor_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn scene(&self, name: &str) -> Option<&SceneConfig> {
        self.scenes.get(name)
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn has_scenes(&self) -> bool {
        !self.scenes.is_empty()
    }

    /// True when at least one actor has layers configured.
    pub fn has_portraits(&self) -> bool {
        self.layers.values().any(|layers| !layers.is_empty())
    }

    /// Actors with at least one configured layer.
    pub fn registered_actors(&self) -> impl Iterator<Item = u32> + '_ {
        self.layers.keys().copied()
    }
}
