//! Problems found in a machine definition.

use thiserror::Error;

/// A single problem with how a machine was declared.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionViolation {
    #[error("no initial state is declared")]
    MissingInitialState,

    #[error("initial state '{name}' is configured but never declared")]
    UndeclaredInitialState { name: String },

    #[error("event '{event}' has no transition rules")]
    EmptyEvent { event: String },

    #[error("event '{event}' refers to undeclared state '{state}'")]
    UnknownRuleState { event: String, state: String },

    #[error("callback refers to undeclared state '{state}'")]
    UnknownCallbackState { state: String },
}
