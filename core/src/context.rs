//! Injected read-only access to the host's global switch/variable stores.

use std::collections::HashMap;

/// Read-only view of the host's global switches and variables.
///
/// An implementation is passed into every resolution call; the engine never
/// mutates it and never caches it across ticks.
pub trait GameContext {
    /// Value of a global boolean switch. Unknown ids read as off.
    fn switch(&self, id: u32) -> bool;

    /// String rendering of a global variable. Unknown ids read as `"0"`.
    fn variable(&self, id: u32) -> String;
}

/// Map-backed [`GameContext`] for hosts without a store of their own, and
/// for tests.
#[derive(Debug, Clone, Default)]
pub struct MapContext {
    switches: HashMap<u32, bool>,
    variables: HashMap<u32, String>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_switch(&mut self, id: u32, on: bool) {
        self.switches.insert(id, on);
    }

    pub fn set_variable(&mut self, id: u32, value: impl Into<String>) {
        self.variables.insert(id, value.into());
    }
}

impl GameContext for MapContext {
    fn switch(&self, id: u32) -> bool {
        self.switches.get(&id).copied().unwrap_or(false)
    }

    fn variable(&self, id: u32) -> String {
        self.variables
            .get(&id)
            .cloned()
            .unwrap_or_else(|| "0".to_string())
    }
}
