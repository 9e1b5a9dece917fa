//! The state machine: states, events and callbacks for one attribute.

use super::callback::Callback;
use super::event::Event;
use super::options::MachineOptions;
use super::transaction::{NoTransaction, TransactionBlock, TransactionProvider};
use super::transition::Transition;
use crate::core::{State, StateCollection, Stateful};
use crate::error::MachineError;
use crate::validation::{self, DefinitionViolation};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// A state machine driving one attribute of objects of type `O`.
///
/// Machines are declared once at setup time and then only read, so a fully
/// declared machine can be shared across threads.
///
/// # Example
///
/// ```rust
/// use statewise::core::{State, Stateful};
/// use statewise::engine::Machine;
/// use serde_json::{json, Value};
///
/// struct Light { state: Value }
///
/// impl Stateful for Light {
///     fn read_attribute(&self, _: &str) -> Value { self.state.clone() }
///     fn write_attribute(&mut self, _: &str, value: Value) { self.state = value; }
/// }
///
/// let mut machine = Machine::new("state");
/// machine.state(State::new("off").initial()).unwrap();
/// machine.state(State::new("on")).unwrap();
/// machine.event("switch_on", |e| { e.transition("off", "on"); }).unwrap();
///
/// let mut light = Light { state: json!("off") };
/// assert!(machine.fire(&mut light, "switch_on").unwrap());
/// assert_eq!(light.state, json!("on"));
/// assert!(!machine.fire(&mut light, "switch_on").unwrap());
/// ```
pub struct Machine<O> {
    options: MachineOptions,
    states: StateCollection<O>,
    events: Vec<Event<O>>,
    before: Vec<Callback<O>>,
    after: Vec<Callback<O>>,
    transactions: Arc<dyn TransactionProvider<O>>,
}

impl<O: Stateful + 'static> Machine<O> {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self::with_options(MachineOptions::new(attribute))
    }

    pub fn with_options(options: MachineOptions) -> Self {
        Self {
            options,
            states: StateCollection::new(),
            events: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            transactions: Arc::new(NoTransaction),
        }
    }

    /// Replace the provider used when `use_transactions` is set.
    pub fn set_transaction_provider(&mut self, provider: impl TransactionProvider<O> + 'static) {
        self.transactions = Arc::new(provider);
    }

    pub(crate) fn share_transaction_provider(&mut self, provider: Arc<dyn TransactionProvider<O>>) {
        self.transactions = provider;
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    pub fn attribute(&self) -> &str {
        &self.options.attribute
    }

    pub fn action(&self) -> Option<&str> {
        self.options.action.as_deref()
    }

    pub fn uses_transactions(&self) -> bool {
        self.options.use_transactions
    }

    pub fn namespace(&self) -> Option<&str> {
        self.options.namespace.as_deref()
    }

    pub(crate) fn qualify_event(&self, event: &str) -> String {
        match self.namespace() {
            Some(ns) => format!("{event}_{ns}"),
            None => event.to_string(),
        }
    }

    pub(crate) fn qualify_state(&self, state: &str) -> String {
        match self.namespace() {
            Some(ns) => format!("{ns}_{state}"),
            None => state.to_string(),
        }
    }

    /// Declare a state.
    ///
    /// A state named by the `initial` option becomes the initial state.
    pub fn state(&mut self, state: State<O>) -> Result<(), MachineError> {
        let state = match self.options.initial.as_deref() {
            Some(initial) if initial == state.name() => state.initial(),
            _ => state,
        };
        self.states.add(state)
    }

    /// Declare an event and its rules.
    pub fn event<F>(&mut self, name: impl Into<String>, define: F) -> Result<(), MachineError>
    where
        F: FnOnce(&mut Event<O>),
    {
        let mut event = Event::new(name);
        define(&mut event);
        self.add_event(event)
    }

    pub(crate) fn add_event(&mut self, event: Event<O>) -> Result<(), MachineError> {
        if self.find_event(event.name()).is_some() {
            return Err(MachineError::duplicate("event", event.name()));
        }
        self.events.push(event);
        Ok(())
    }

    pub fn before_transition(&mut self, callback: Callback<O>) {
        self.before.push(callback);
    }

    pub fn after_transition(&mut self, callback: Callback<O>) {
        self.after.push(callback);
    }

    pub fn before_callbacks(&self) -> &[Callback<O>] {
        &self.before
    }

    pub fn after_callbacks(&self) -> &[Callback<O>] {
        &self.after
    }

    pub fn states(&self) -> &StateCollection<O> {
        &self.states
    }

    pub fn events(&self) -> &[Event<O>] {
        &self.events
    }

    pub fn find_event(&self, name: &str) -> Option<&Event<O>> {
        self.events.iter().find(|e| e.name() == name)
    }

    fn fetch_event(&self, name: &str) -> Result<&Event<O>, MachineError> {
        self.find_event(name).ok_or_else(|| MachineError::UnknownEvent {
            name: name.to_string(),
        })
    }

    /// States ordered for presentation: initial first, then states used by
    /// events, states with behaviors, and finally callback-only states.
    pub fn states_by_priority(&self) -> Vec<&State<O>> {
        let event_states: Vec<&str> = self.events.iter().flat_map(Event::known_states).collect();
        let callback_states: Vec<&str> = self
            .before
            .iter()
            .chain(&self.after)
            .flat_map(Callback::known_states)
            .collect();
        self.states.by_priority(&event_states, &callback_states)
    }

    pub fn read(&self, object: &O) -> Value {
        object.read_attribute(self.attribute())
    }

    pub fn write(&self, object: &mut O, value: Value) {
        object.write_attribute(self.attribute(), value);
    }

    /// The state the object's stored value represents.
    pub fn current_state(&self, object: &O) -> Result<&State<O>, MachineError> {
        let value = self.read(object);
        self.states.match_value(self.attribute(), &value)
    }

    /// Whether the object is currently in the state called `name`.
    pub fn is_in(&self, object: &O, name: &str) -> Result<bool, MachineError> {
        self.states.value_matches(name, &self.read(object))
    }

    /// Write the initial state's value if the attribute is unset.
    ///
    /// Returns whether a value was written.
    pub fn initialize_state(&self, object: &mut O) -> bool {
        if !self.read(object).is_null() {
            return false;
        }
        match self.states.initial() {
            Some(initial) => {
                self.write(object, initial.value());
                true
            }
            None => false,
        }
    }

    /// The transition `event` would perform, without performing it.
    pub fn transition_for(
        &self,
        object: &O,
        event: &str,
        args: &[Value],
    ) -> Result<Option<Transition<'_, O>>, MachineError> {
        self.fetch_event(event)?.transition_for(self, object, args)
    }

    pub fn can_fire(&self, object: &O, event: &str) -> Result<bool, MachineError> {
        self.fetch_event(event)?.can_fire(self, object)
    }

    /// Names of events that can currently fire, in declaration order.
    pub fn events_for(&self, object: &O) -> Result<Vec<&str>, MachineError> {
        let mut names = Vec::new();
        for event in &self.events {
            if event.can_fire(self, object)? {
                names.push(event.name());
            }
        }
        Ok(names)
    }

    /// Fire `event`. Returns `false` if no transition applies or the
    /// transition did not succeed.
    pub fn fire(&self, object: &mut O, event: &str) -> Result<bool, MachineError> {
        self.fire_with(object, event, Vec::new())
    }

    /// Fire `event` with positional arguments visible to guards and callbacks.
    pub fn fire_with(
        &self,
        object: &mut O,
        event: &str,
        args: Vec<Value>,
    ) -> Result<bool, MachineError> {
        let Some(mut transition) = self.transition_for(object, event, &args)? else {
            tracing::debug!(
                attribute = self.attribute(),
                event,
                value = %self.read(object),
                "no transition applies"
            );
            return Ok(false);
        };

        tracing::debug!(
            attribute = self.attribute(),
            event,
            from = transition.from_name(),
            to = transition.to_name(),
            "firing event"
        );
        transition.perform_with(object, true, args)
    }

    /// Fire `event`, turning a missing or failed transition into an error.
    pub fn fire_strict(&self, object: &mut O, event: &str) -> Result<(), MachineError> {
        let from = self.current_state(object)?.name();
        if self.fire(object, event)? {
            Ok(())
        } else {
            Err(MachineError::InvalidTransition {
                event: event.to_string(),
                from: from.to_string(),
            })
        }
    }

    /// Run `block` inside the transaction provider when transactions are
    /// enabled, or directly otherwise.
    pub fn within_transaction(
        &self,
        object: &mut O,
        block: &mut TransactionBlock<'_, O>,
    ) -> Result<bool, MachineError> {
        if self.uses_transactions() {
            self.transactions.within_transaction(object, block)
        } else {
            block(object)
        }
    }

    /// Call the behavior `name` defined by the object's current state.
    pub fn call_behavior(&self, object: &O, name: &str) -> Result<Value, MachineError> {
        let state = self.current_state(object)?;
        let Some(behavior) = state.find_behavior(name) else {
            return Err(MachineError::UndefinedBehavior {
                behavior: name.to_string(),
                state: state.name().to_string(),
            });
        };
        Ok(behavior(object))
    }

    /// Objects currently in any of the named states.
    pub fn with_states<'a, I>(&self, objects: I, names: &[&str]) -> Result<Vec<&'a O>, MachineError>
    where
        I: IntoIterator<Item = &'a O>,
    {
        self.scope(objects, names, true)
    }

    /// Objects currently in none of the named states.
    pub fn without_states<'a, I>(
        &self,
        objects: I,
        names: &[&str],
    ) -> Result<Vec<&'a O>, MachineError>
    where
        I: IntoIterator<Item = &'a O>,
    {
        self.scope(objects, names, false)
    }

    fn scope<'a, I>(
        &self,
        objects: I,
        names: &[&str],
        inside: bool,
    ) -> Result<Vec<&'a O>, MachineError>
    where
        I: IntoIterator<Item = &'a O>,
    {
        let states = names
            .iter()
            .map(|name| self.states.fetch(name))
            .collect::<Result<Vec<_>, _>>()?;

        let selected = objects.into_iter().filter(|object| {
            let value = self.read(object);
            states.iter().any(|s| s.matches(&value)) == inside
        });
        Ok(selected.collect())
    }

    /// Check the definition for problems, accumulating all of them.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<DefinitionViolation>> {
        validation::validate(self)
    }
}

impl<O> fmt::Debug for Machine<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("options", &self.options)
            .field("states", &self.states.len())
            .field("events", &self.events)
            .field("before", &self.before)
            .field("after", &self.after)
            .finish()
    }
}
