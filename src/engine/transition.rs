//! A single state change and its before/action/after pipeline.

use super::machine::Machine;
use super::transaction::TransactionBlock;
use crate::core::{Stateful, TransitionRecord};
use crate::error::MachineError;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// One concrete state change on one machine.
///
/// A transition borrows its machine and is consumed by a single `perform`
/// call. The object is supplied to `perform` rather than stored, so
/// callbacks can receive both the object and the transition.
pub struct Transition<'m, O> {
    machine: &'m Machine<O>,
    event: String,
    from: Value,
    from_name: String,
    to: Value,
    to_name: String,
    args: Vec<Value>,
    result: Option<bool>,
    success: Option<bool>,
}

impl<'m, O: Stateful + 'static> Transition<'m, O> {
    /// Describe the transition of `object` from `from_name` to `to_name`.
    ///
    /// The origin value is the object's currently stored value. The
    /// destination value is resolved now, so dynamic state values are
    /// evaluated once per transition.
    pub fn new(
        machine: &'m Machine<O>,
        object: &O,
        event: impl Into<String>,
        from_name: &str,
        to_name: &str,
    ) -> Result<Self, MachineError> {
        machine.states().fetch(from_name)?;
        let to_state = machine.states().fetch(to_name)?;

        let from = machine.read(object);
        // looping back into a matcher-recognized state keeps the stored value
        let to = if from_name == to_name && to_state.has_matcher() {
            from.clone()
        } else {
            to_state.value()
        };

        Ok(Self {
            machine,
            event: event.into(),
            from,
            from_name: from_name.to_string(),
            to,
            to_name: to_name.to_string(),
            args: Vec::new(),
            result: None,
            success: None,
        })
    }

    pub(crate) fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn machine(&self) -> &'m Machine<O> {
        self.machine
    }

    pub fn attribute(&self) -> &'m str {
        self.machine.attribute()
    }

    /// The configured action, if the machine has one.
    pub fn action(&self) -> Option<&'m str> {
        self.machine.action()
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn qualified_event(&self) -> String {
        self.machine.qualify_event(&self.event)
    }

    pub fn from(&self) -> &Value {
        &self.from
    }

    pub fn from_name(&self) -> &str {
        &self.from_name
    }

    pub fn qualified_from_name(&self) -> String {
        self.machine.qualify_state(&self.from_name)
    }

    pub fn to(&self) -> &Value {
        &self.to
    }

    pub fn to_name(&self) -> &str {
        &self.to_name
    }

    pub fn qualified_to_name(&self) -> String {
        self.machine.qualify_state(&self.to_name)
    }

    /// Positional arguments supplied when the transition was performed.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Outcome of the action: `None` until it has run, or when no action ran.
    pub fn result(&self) -> Option<bool> {
        self.result
    }

    /// `None` until performed.
    pub fn success(&self) -> Option<bool> {
        self.success
    }

    pub fn is_loopback(&self) -> bool {
        self.from_name == self.to_name
    }

    /// Serializable trace of this transition.
    pub fn record(&self) -> TransitionRecord {
        TransitionRecord {
            id: Uuid::new_v4(),
            attribute: self.attribute().to_string(),
            event: self.event.clone(),
            from: self.from.clone(),
            from_name: self.from_name.clone(),
            to: self.to.clone(),
            to_name: self.to_name.clone(),
            success: self.success.unwrap_or(false),
            timestamp: Utc::now(),
        }
    }

    /// Run the transition, including the machine's action.
    pub fn perform(&mut self, object: &mut O) -> Result<bool, MachineError> {
        self.perform_with(object, true, Vec::new())
    }

    /// Run the transition with positional arguments, optionally skipping
    /// the machine's action.
    pub fn perform_with(
        &mut self,
        object: &mut O,
        run_action: bool,
        args: Vec<Value>,
    ) -> Result<bool, MachineError> {
        self.args = args;
        Self::perform_all(object, std::slice::from_mut(self), run_action)
    }

    /// Run `block` inside the machine's transactional context.
    pub fn within_transaction(
        &self,
        object: &mut O,
        block: &mut TransactionBlock<'_, O>,
    ) -> Result<bool, MachineError> {
        self.machine.within_transaction(object, block)
    }

    /// Perform transitions of distinct machines on one object together.
    ///
    /// Every before phase runs first, in order; a halt in any of them
    /// aborts the batch before anything is written. Then every attribute
    /// is persisted, every action runs, and every after phase runs, each
    /// step in transition order. The batch succeeds only if every action
    /// that ran succeeded.
    pub fn perform_all(
        object: &mut O,
        transitions: &mut [Transition<'m, O>],
        run_action: bool,
    ) -> Result<bool, MachineError> {
        let mut attributes = HashSet::with_capacity(transitions.len());
        for transition in transitions.iter() {
            if !attributes.insert(transition.attribute()) {
                return Err(MachineError::InvalidParallelTransition {
                    attribute: transition.attribute().to_string(),
                });
            }
        }

        let Some(first) = transitions.first() else {
            return Ok(true);
        };
        let machine = first.machine;

        machine.within_transaction(object, &mut |object: &mut O| {
            Self::run_pipeline(object, transitions, run_action)
        })
    }

    fn run_pipeline(
        object: &mut O,
        transitions: &mut [Transition<'m, O>],
        run_action: bool,
    ) -> Result<bool, MachineError> {
        let mut halted = false;
        for transition in transitions.iter() {
            if !transition.before(object)? {
                halted = true;
                break;
            }
        }
        if halted {
            for transition in transitions.iter_mut() {
                transition.success = Some(false);
            }
            return Ok(false);
        }

        for transition in transitions.iter() {
            transition.persist(object);
        }

        let mut success = true;
        for transition in transitions.iter_mut() {
            let ok = if run_action {
                transition.run_action(object)?
            } else {
                true
            };
            transition.success = Some(ok);
            success &= ok;
        }

        for transition in transitions.iter() {
            transition.after(object)?;
        }

        Ok(success)
    }

    /// Run matching before callbacks. Returns `false` if one halted.
    fn before(&self, object: &mut O) -> Result<bool, MachineError> {
        for callback in self.machine.before_callbacks() {
            if !callback.matches(self) {
                continue;
            }
            if callback.run(object, self)?.is_halt() {
                tracing::debug!(
                    attribute = self.attribute(),
                    event = %self.event,
                    from = %self.from_name,
                    to = %self.to_name,
                    "transition halted by before callback"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn persist(&self, object: &mut O) {
        tracing::debug!(
            attribute = self.attribute(),
            value = %self.to,
            "persisting state value"
        );
        self.machine.write(object, self.to.clone());
    }

    fn run_action(&mut self, object: &mut O) -> Result<bool, MachineError> {
        let Some(action) = self.action() else {
            self.result = None;
            return Ok(true);
        };

        let outcome = object.invoke(action)?;
        if outcome.is_halt() {
            tracing::debug!(attribute = self.attribute(), action, "action halted");
        }
        let ok = outcome.is_success();
        self.result = Some(ok);
        Ok(ok)
    }

    /// Run matching after callbacks. A halt skips the remaining ones.
    fn after(&self, object: &mut O) -> Result<(), MachineError> {
        for callback in self.machine.after_callbacks() {
            if !callback.matches(self) {
                continue;
            }
            if callback.run(object, self)?.is_halt() {
                tracing::debug!(
                    attribute = self.attribute(),
                    event = %self.event,
                    "after callbacks halted"
                );
                break;
            }
        }
        Ok(())
    }
}

impl<O: Stateful + 'static> fmt::Display for Transition<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transition attribute={:?} event={:?} from={} from_name={:?} to={} to_name={:?}",
            self.machine.attribute(),
            self.event,
            self.from,
            self.from_name,
            self.to,
            self.to_name
        )
    }
}

impl<O: Stateful + 'static> fmt::Debug for Transition<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("attribute", &self.machine.attribute())
            .field("event", &self.event)
            .field("from", &self.from)
            .field("from_name", &self.from_name)
            .field("to", &self.to)
            .field("to_name", &self.to_name)
            .field("args", &self.args)
            .field("result", &self.result)
            .field("success", &self.success)
            .finish()
    }
}
