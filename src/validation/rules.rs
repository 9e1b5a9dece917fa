//! Individual definition checks.

use crate::core::Stateful;
use crate::engine::Machine;
use crate::validation::violations::DefinitionViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of one check.
pub type Check = Validation<(), NonEmptyVec<DefinitionViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> DefinitionViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Exactly one state must be initial, and a configured initial state must exist.
pub fn initial_state<O: Stateful + 'static>(machine: &Machine<O>) -> Check {
    if let Some(name) = machine.options().initial.as_deref() {
        if !machine.states().contains(name) {
            return Validation::fail(DefinitionViolation::UndeclaredInitialState {
                name: name.to_string(),
            });
        }
    }
    let has_initial = machine.states().initial().is_some();
    check(has_initial, || DefinitionViolation::MissingInitialState)
}

/// Every event needs at least one rule.
pub fn events_have_rules<O: Stateful + 'static>(machine: &Machine<O>) -> Vec<Check> {
    machine
        .events()
        .iter()
        .map(|event| {
            let violation = || DefinitionViolation::EmptyEvent {
                event: event.name().to_string(),
            };
            check(!event.rules().is_empty(), violation)
        })
        .collect()
}

/// Rules may only name declared states.
pub fn rule_states<O: Stateful + 'static>(machine: &Machine<O>) -> Vec<Check> {
    let mut checks = Vec::new();
    for event in machine.events() {
        for state in event.known_states() {
            let violation = || DefinitionViolation::UnknownRuleState {
                event: event.name().to_string(),
                state: state.to_string(),
            };
            checks.push(check(machine.states().contains(state), violation));
        }
    }
    checks
}

/// Callback filters may only name declared states.
pub fn callback_states<O: Stateful + 'static>(machine: &Machine<O>) -> Vec<Check> {
    machine
        .before_callbacks()
        .iter()
        .chain(machine.after_callbacks())
        .flat_map(|callback| callback.known_states())
        .map(|state| {
            let violation = || DefinitionViolation::UnknownCallbackState {
                state: state.to_string(),
            };
            check(machine.states().contains(state), violation)
        })
        .collect()
}
