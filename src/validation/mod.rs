//! Definition linting for machines.
//!
//! Checks are accumulated with `stillwater::Validation`, so a single call
//! reports every problem in a definition rather than the first one.
//!
//! # Example
//!
//! ```rust
//! use statewise::core::{State, Stateful};
//! use statewise::engine::Machine;
//! use serde_json::Value;
//! use stillwater::validation::Validation;
//!
//! # struct Door { state: Value }
//! # impl Stateful for Door {
//! #     fn read_attribute(&self, _: &str) -> Value { self.state.clone() }
//! #     fn write_attribute(&mut self, _: &str, value: Value) { self.state = value; }
//! # }
//! let mut machine: Machine<Door> = Machine::new("state");
//! machine.state(State::new("closed")).unwrap();
//! machine.event("open", |e| { e.transition("closed", "open"); }).unwrap();
//!
//! match machine.validate() {
//!     Validation::Failure(violations) => assert_eq!(violations.len(), 2),
//!     Validation::Success(_) => unreachable!(),
//! }
//! ```

mod rules;
mod violations;

pub use rules::Check;
pub use violations::DefinitionViolation;

use crate::core::Stateful;
use crate::engine::Machine;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Run every definition check against `machine`, accumulating all violations.
pub fn validate<O: Stateful + 'static>(
    machine: &Machine<O>,
) -> Validation<(), NonEmptyVec<DefinitionViolation>> {
    let mut checks = vec![rules::initial_state(machine)];
    checks.extend(rules::events_have_rules(machine));
    checks.extend(rules::rule_states(machine));
    checks.extend(rules::callback_states(machine));

    Validation::all_vec(checks).map(|_| ())
}
