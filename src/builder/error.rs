//! Errors raised while building a machine.

use crate::error::MachineError;
use crate::validation::DefinitionViolation;
use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("machine definition is invalid: {}", describe(.0))]
    InvalidDefinition(Vec<DefinitionViolation>),

    #[error(transparent)]
    Machine(#[from] MachineError),
}

fn describe(violations: &[DefinitionViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
