//! Fluent construction of machines.
//!
//! `MachineBuilder` collects options, states, events and callbacks and
//! validates the complete definition when it is built.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
