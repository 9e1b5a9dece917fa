//! Errors raised by machine declaration and transition execution.

use thiserror::Error;

/// Errors from the state machine engine.
///
/// A missing transition for the current state and a halted callback are
/// not errors: both surface as a `false` result from `fire`/`perform`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("{kind} '{name}' is already defined")]
    DuplicateDefinition { kind: &'static str, name: String },

    #[error("{value} is not a known {attribute} value")]
    UnknownState { attribute: String, value: String },

    #[error("'{name}' is not a known state name")]
    UnknownStateName { name: String },

    #[error("'{name}' is not a known event")]
    UnknownEvent { name: String },

    #[error("no machine is registered for attribute '{attribute}'")]
    UnknownMachine { attribute: String },

    #[error("object does not respond to '{method}'")]
    UnknownMethod { method: String },

    #[error("behavior '{behavior}' is not defined for state '{state}'")]
    UndefinedBehavior { behavior: String, state: String },

    #[error("cannot perform multiple transitions in parallel for the same state machine / attribute '{attribute}'")]
    InvalidParallelTransition { attribute: String },

    #[error("cannot transition via '{event}' from '{from}'")]
    InvalidTransition { event: String, from: String },
}

impl MachineError {
    /// Returns whether this error was raised while declaring a machine
    /// rather than while running a transition.
    pub fn is_definition_error(&self) -> bool {
        matches!(self, MachineError::DuplicateDefinition { .. })
    }

    pub(crate) fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        MachineError::DuplicateDefinition {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn unknown_state_name(name: impl Into<String>) -> Self {
        MachineError::UnknownStateName { name: name.into() }
    }
}
