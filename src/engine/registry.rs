//! The set of machines that drive one object type.

use super::machine::Machine;
use super::transition::Transition;
use crate::core::Stateful;
use crate::error::MachineError;

/// Machines for one object type, keyed by the attribute each one manages.
///
/// The registry is owned by the application and passed where it is
/// needed; there is no global registry.
pub struct MachineRegistry<O> {
    machines: Vec<Machine<O>>,
}

impl<O: Stateful + 'static> MachineRegistry<O> {
    pub fn new() -> Self {
        Self {
            machines: Vec::new(),
        }
    }

    /// Add a machine. Each attribute may be driven by only one machine.
    pub fn register(&mut self, machine: Machine<O>) -> Result<(), MachineError> {
        if self.get(machine.attribute()).is_some() {
            return Err(MachineError::duplicate("machine", machine.attribute()));
        }
        self.machines.push(machine);
        Ok(())
    }

    pub fn get(&self, attribute: &str) -> Option<&Machine<O>> {
        self.machines.iter().find(|m| m.attribute() == attribute)
    }

    pub fn fetch(&self, attribute: &str) -> Result<&Machine<O>, MachineError> {
        self.get(attribute).ok_or_else(|| MachineError::UnknownMachine {
            attribute: attribute.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Machine<O>> {
        self.machines.iter()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Give every unset attribute its machine's initial value.
    pub fn initialize_states(&self, object: &mut O) {
        for machine in &self.machines {
            machine.initialize_state(object);
        }
    }

    /// Fire one event per machine and perform the transitions together.
    ///
    /// Each pair names a machine attribute and an event of that machine.
    /// If any event has no applicable transition, nothing runs and the
    /// result is `false`.
    pub fn fire_events(
        &self,
        object: &mut O,
        events: &[(&str, &str)],
    ) -> Result<bool, MachineError> {
        let mut transitions = Vec::with_capacity(events.len());
        for &(attribute, event) in events {
            let machine = self.fetch(attribute)?;
            match machine.transition_for(object, event, &[])? {
                Some(transition) => transitions.push(transition),
                None => {
                    tracing::debug!(attribute, event, "no transition applies, skipping batch");
                    return Ok(false);
                }
            }
        }

        Transition::perform_all(object, &mut transitions, true)
    }
}

impl<O: Stateful + 'static> Default for MachineRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}
