//! Property-based tests for matchers, guards and machines.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use statewise::core::{Guard, GuardContext, Matcher, State, Stateful, TransitionHistory};
use statewise::engine::{Callback, Machine};
use std::collections::HashSet;

const STATES: [&str; 4] = ["parked", "idling", "first_gear", "stalled"];
const EVENTS: [&str; 4] = ["ignite", "shift_up", "park", "stall"];

#[derive(Clone, Debug, Default)]
struct Vehicle {
    state: Value,
    after_count: usize,
}

impl Stateful for Vehicle {
    fn read_attribute(&self, _attribute: &str) -> Value {
        self.state.clone()
    }

    fn write_attribute(&mut self, _attribute: &str, value: Value) {
        self.state = value;
    }
}

fn vehicle_machine() -> Machine<Vehicle> {
    let mut machine = Machine::new("state");
    machine.state(State::new("parked").initial()).unwrap();
    machine.state(State::new("idling")).unwrap();
    machine.state(State::new("first_gear")).unwrap();
    machine.state(State::new("stalled")).unwrap();
    machine
        .event("ignite", |e| {
            e.transition(["parked", "stalled"], "idling");
        })
        .unwrap();
    machine
        .event("shift_up", |e| {
            e.transition("idling", "first_gear");
        })
        .unwrap();
    machine
        .event("park", |e| {
            e.transition(["idling", "first_gear"], "parked");
        })
        .unwrap();
    machine
        .event("stall", |e| {
            e.transition(Matcher::all_except(["parked"]), "stalled");
        })
        .unwrap();
    machine.after_transition(Callback::object(|v: &mut Vehicle| v.after_count += 1));
    machine
}

prop_compose! {
    fn arbitrary_state()(index in 0..STATES.len()) -> &'static str {
        STATES[index]
    }
}

prop_compose! {
    fn arbitrary_event()(index in 0..EVENTS.len()) -> &'static str {
        EVENTS[index]
    }
}

proptest! {
    #[test]
    fn complement_matcher_is_negation(
        excluded in prop::collection::vec(arbitrary_state(), 0..4),
        name in arbitrary_state(),
    ) {
        let only = Matcher::only(excluded.clone());
        let except = Matcher::all_except(excluded.clone());
        prop_assert_eq!(except.matches(name), !excluded.contains(&name));
        prop_assert_eq!(only.matches(name), !except.matches(name));
    }

    #[test]
    fn negated_guard_is_inverse(threshold in 0usize..10, count in 0usize..10) {
        let guard = Guard::new(move |v: &Vehicle| v.after_count >= threshold);
        let negated = guard.clone().negate();
        let object = Vehicle { after_count: count, ..Vehicle::default() };
        let ctx = GuardContext { from: "parked", to: "idling", event: "ignite", args: &[] };
        prop_assert_eq!(guard.check(&object, &ctx), !negated.check(&object, &ctx));
    }

    #[test]
    fn firing_keeps_object_in_a_declared_state(
        events in prop::collection::vec(arbitrary_event(), 0..20),
    ) {
        let machine = vehicle_machine();
        let mut object = Vehicle::default();
        machine.initialize_state(&mut object);
        let mut performed = 0;

        for event in events {
            let before = object.state.clone();
            let fired = machine.fire(&mut object, event).unwrap();
            if fired {
                performed += 1;
            } else {
                prop_assert_eq!(&object.state, &before);
            }
            prop_assert!(machine.current_state(&object).is_ok());
        }
        prop_assert_eq!(object.after_count, performed);
    }

    #[test]
    fn fire_succeeds_exactly_when_a_transition_applies(
        state in arbitrary_state(),
        event in arbitrary_event(),
    ) {
        let machine = vehicle_machine();
        let mut object = Vehicle { state: json!(state), ..Vehicle::default() };
        let applicable = machine.can_fire(&object, event).unwrap();
        prop_assert_eq!(machine.fire(&mut object, event).unwrap(), applicable);
    }

    #[test]
    fn explicit_values_round_trip(values in prop::collection::hash_set(any::<i64>(), 1..6)) {
        let values: Vec<i64> = values.into_iter().collect();
        let mut machine: Machine<Vehicle> = Machine::new("state");
        for (i, value) in values.iter().enumerate() {
            machine.state(State::new(format!("s{i}")).with_value(*value)).unwrap();
        }

        for (i, value) in values.iter().enumerate() {
            let object = Vehicle { state: json!(value), ..Vehicle::default() };
            let expected = format!("s{i}");
            prop_assert_eq!(machine.current_state(&object).unwrap().name(), expected.as_str());
        }
    }

    #[test]
    fn priority_lists_every_state_once(extra in prop::collection::vec("[a-z]{3,8}", 0..5)) {
        let mut machine = vehicle_machine();
        let mut declared: HashSet<String> = STATES.iter().map(|s| s.to_string()).collect();
        for name in extra {
            if declared.insert(name.clone()) {
                machine.state(State::new(name)).unwrap();
            }
        }

        let ordered: Vec<&str> = machine.states_by_priority().into_iter().map(State::name).collect();
        let unique: HashSet<&str> = ordered.iter().copied().collect();
        prop_assert_eq!(ordered.len(), declared.len());
        prop_assert_eq!(unique.len(), declared.len());
        prop_assert_eq!(ordered[0], "parked");
    }

    #[test]
    fn history_path_follows_successful_transitions(
        events in prop::collection::vec(arbitrary_event(), 1..12),
    ) {
        let machine = vehicle_machine();
        let mut object = Vehicle::default();
        machine.initialize_state(&mut object);
        let mut history = TransitionHistory::new();

        for event in events {
            if let Some(mut transition) = machine.transition_for(&object, event, &[]).unwrap() {
                transition.perform(&mut object).unwrap();
                history = history.record(transition.record());
            }
        }

        let path = history.path();
        if history.is_empty() {
            prop_assert!(path.is_empty());
        } else {
            prop_assert_eq!(path.len(), history.len() + 1);
            prop_assert_eq!(path[0], "parked");
            let current = machine.current_state(&object).unwrap().name();
            prop_assert_eq!(path.last().copied(), Some(current));
        }
    }
}
