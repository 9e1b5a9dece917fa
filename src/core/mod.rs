//! Core state machine types.
//!
//! This module contains the building blocks a machine is made of:
//! - States and the collection that resolves an object's current state
//! - Name matchers and guard predicates used by transition rules
//! - The `Stateful` capability host objects implement
//! - Serializable transition history

mod collection;
mod guard;
mod history;
mod matcher;
mod outcome;
mod state;
mod stateful;

pub use collection::StateCollection;
pub use guard::{Guard, GuardContext};
pub use history::{TransitionHistory, TransitionRecord};
pub use matcher::{Matcher, Target};
pub use outcome::Outcome;
pub use state::{Behavior, State, StateValue};
pub use stateful::Stateful;
