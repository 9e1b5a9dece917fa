//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{State, Stateful};
use crate::engine::{Callback, Event, Machine, MachineOptions, TransactionProvider};
use std::sync::Arc;
use stillwater::validation::Validation;

/// Builder for constructing machines with a fluent API.
///
/// Declaration errors are deferred to `build`, which also rejects
/// definitions that fail validation.
pub struct MachineBuilder<O> {
    options: MachineOptions,
    states: Vec<State<O>>,
    events: Vec<Event<O>>,
    before: Vec<Callback<O>>,
    after: Vec<Callback<O>>,
    transactions: Option<Arc<dyn TransactionProvider<O>>>,
}

impl<O: Stateful + 'static> MachineBuilder<O> {
    /// Create a builder for a machine driving `attribute`.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self::from_options(MachineOptions::new(attribute))
    }

    /// Start from existing options, e.g. ones loaded from JSON.
    pub fn from_options(options: MachineOptions) -> Self {
        Self {
            options,
            states: Vec::new(),
            events: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            transactions: None,
        }
    }

    /// Name the initial state.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.options.initial = Some(name.into());
        self
    }

    /// Method invoked on the object after each transition is persisted.
    pub fn action(mut self, method: impl Into<String>) -> Self {
        self.options.action = Some(method.into());
        self
    }

    pub fn use_transactions(mut self, enabled: bool) -> Self {
        self.options.use_transactions = enabled;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.options.namespace = Some(namespace.into());
        self
    }

    /// Wrap transitions in `provider`. Enables transactions.
    pub fn transaction_provider(mut self, provider: impl TransactionProvider<O> + 'static) -> Self {
        self.options.use_transactions = true;
        self.transactions = Some(Arc::new(provider));
        self
    }

    pub fn state(mut self, state: State<O>) -> Self {
        self.states.push(state);
        self
    }

    /// Add several states named after their values.
    pub fn states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(names.into_iter().map(State::new));
        self
    }

    pub fn event<F>(mut self, name: impl Into<String>, define: F) -> Self
    where
        F: FnOnce(&mut Event<O>),
    {
        let mut event = Event::new(name);
        define(&mut event);
        self.events.push(event);
        self
    }

    pub fn before(mut self, callback: Callback<O>) -> Self {
        self.before.push(callback);
        self
    }

    pub fn after(mut self, callback: Callback<O>) -> Self {
        self.after.push(callback);
        self
    }

    /// Build the machine.
    /// Returns an error on duplicate declarations or an invalid definition.
    pub fn build(self) -> Result<Machine<O>, BuildError> {
        let mut machine = Machine::with_options(self.options);
        if let Some(provider) = self.transactions {
            machine.share_transaction_provider(provider);
        }
        for state in self.states {
            machine.state(state)?;
        }
        for event in self.events {
            machine.add_event(event)?;
        }
        for callback in self.before {
            machine.before_transition(callback);
        }
        for callback in self.after {
            machine.after_transition(callback);
        }

        match machine.validate() {
            Validation::Success(_) => Ok(machine),
            Validation::Failure(violations) => {
                let violations = violations.iter().cloned().collect();
                Err(BuildError::InvalidDefinition(violations))
            }
        }
    }
}
