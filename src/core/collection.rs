//! Ordered registry of a machine's states.

use super::state::State;
use crate::error::MachineError;
use serde_json::Value;
use std::collections::HashMap;

/// States of one machine, in declaration order, indexed by name.
pub struct StateCollection<O> {
    states: Vec<State<O>>,
    index: HashMap<String, usize>,
}

impl<O> StateCollection<O> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a state.
    ///
    /// Fails if the name is taken or if the state is initial while another
    /// initial state already exists.
    pub fn add(&mut self, state: State<O>) -> Result<(), MachineError> {
        if self.index.contains_key(state.name()) {
            return Err(MachineError::duplicate("state", state.name()));
        }
        if state.is_initial() {
            if let Some(existing) = self.initial() {
                return Err(MachineError::duplicate("initial state", existing.name()));
            }
        }

        let position = self.states.len();
        self.index.insert(state.name().to_string(), position);
        self.states.push(state);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&State<O>> {
        self.index.get(name).map(|&i| &self.states[i])
    }

    pub fn fetch(&self, name: &str) -> Result<&State<O>, MachineError> {
        self.get(name)
            .ok_or_else(|| MachineError::unknown_state_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn initial(&self) -> Option<&State<O>> {
        self.states.iter().find(|s| s.is_initial())
    }

    pub fn iter(&self) -> impl Iterator<Item = &State<O>> {
        self.states.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(State::name)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Resolve the state a stored attribute value represents.
    ///
    /// Fixed literal values are compared first; only then are matchers and
    /// dynamic values consulted, in declaration order.
    pub fn match_value(&self, attribute: &str, value: &Value) -> Result<&State<O>, MachineError> {
        self.states
            .iter()
            .find(|s| s.static_value() == Some(value) && !s.has_matcher())
            .or_else(|| self.states.iter().find(|s| s.matches(value)))
            .ok_or_else(|| MachineError::UnknownState {
                attribute: attribute.to_string(),
                value: value.to_string(),
            })
    }

    /// Whether `value` represents the state called `name`.
    pub fn value_matches(&self, name: &str, value: &Value) -> Result<bool, MachineError> {
        Ok(self.fetch(name)?.matches(value))
    }

    /// States in display order.
    ///
    /// Order: the initial state, states referenced by event rules, states
    /// with behaviors, declared states not referenced by callbacks, then
    /// everything else. Each state appears once.
    pub fn by_priority<'a>(
        &'a self,
        event_states: &[&str],
        callback_states: &[&str],
    ) -> Vec<&'a State<O>> {
        let mut order: Vec<&str> = Vec::with_capacity(self.states.len());

        order.extend(self.initial().map(State::name));
        order.extend(event_states.iter().copied());
        let with_behaviors = self.states.iter().filter(|s| s.has_behaviors());
        order.extend(with_behaviors.map(State::name));
        order.extend(self.names().filter(|n| !callback_states.contains(n)));
        order.extend(self.names());

        let mut seen = Vec::with_capacity(self.states.len());
        for name in order {
            if let Some(state) = self.get(name) {
                if !seen.iter().any(|s: &&State<O>| s.name() == name) {
                    seen.push(state);
                }
            }
        }
        seen
    }
}

impl<O> Default for StateCollection<O> {
    fn default() -> Self {
        Self::new()
    }
}
