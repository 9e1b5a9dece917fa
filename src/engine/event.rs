//! Named events and their guarded transition rules.

use super::machine::Machine;
use super::transition::Transition;
use crate::core::{Guard, GuardContext, Matcher, Stateful, Target};
use crate::error::MachineError;
use serde_json::Value;
use std::fmt;

/// One `from -> to` rule of an event, optionally guarded.
pub struct TransitionRule<O> {
    from: Matcher,
    to: Target,
    guards: Vec<Guard<O>>,
}

impl<O: 'static> TransitionRule<O> {
    pub fn new(from: impl Into<Matcher>, to: impl Into<Target>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            guards: Vec::new(),
        }
    }

    /// Only apply the rule when `predicate` holds.
    pub fn when<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Only apply the rule when `predicate` does not hold.
    pub fn unless<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate).negate())
    }

    pub fn guard(&mut self, guard: Guard<O>) -> &mut Self {
        self.guards.push(guard);
        self
    }

    pub fn from_matcher(&self) -> &Matcher {
        &self.from
    }

    pub fn target(&self) -> &Target {
        &self.to
    }

    fn applies(&self, object: &O, ctx: &GuardContext<'_>) -> bool {
        self.from.matches(ctx.from) && self.guards.iter().all(|g| g.check(object, ctx))
    }
}

impl<O> fmt::Debug for TransitionRule<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRule")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guards", &self.guards.len())
            .finish()
    }
}

/// A named trigger with an ordered list of transition rules.
///
/// Rules are evaluated in the order they were declared; the first whose
/// origin matcher accepts the current state and whose guards pass wins.
pub struct Event<O> {
    name: String,
    rules: Vec<TransitionRule<O>>,
}

impl<O: Stateful + 'static> Event<O> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[TransitionRule<O>] {
        &self.rules
    }

    /// Append a rule and return it for further guarding.
    pub fn transition(
        &mut self,
        from: impl Into<Matcher>,
        to: impl Into<Target>,
    ) -> &mut TransitionRule<O> {
        self.rules.push(TransitionRule::new(from, to));
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    /// State names referenced by the rules, in rule order.
    pub fn known_states(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for rule in &self.rules {
            for name in rule.from.known_names() {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
            if let Some(name) = rule.to.known_name() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Candidate transitions for the object's current state, lazily.
    ///
    /// Destination values are resolved as each candidate is produced.
    pub fn transitions_for<'m, 'o>(
        &'m self,
        machine: &'m Machine<O>,
        object: &'o O,
        args: &'o [Value],
    ) -> Result<impl Iterator<Item = Result<Transition<'m, O>, MachineError>> + 'o, MachineError>
    where
        'm: 'o,
    {
        let from = machine.current_state(object)?.name();
        let event = self.name.as_str();

        let applicable = self.rules.iter().filter(move |rule| {
            let ctx = GuardContext {
                from,
                to: rule.to.resolve(from),
                event,
                args,
            };
            rule.applies(object, &ctx)
        });

        Ok(applicable.map(move |rule| {
            Transition::new(machine, object, event, from, rule.to.resolve(from))
                .map(|t| t.with_args(args.to_vec()))
        }))
    }

    /// The first applicable transition, if any.
    pub fn transition_for<'m>(
        &'m self,
        machine: &'m Machine<O>,
        object: &O,
        args: &[Value],
    ) -> Result<Option<Transition<'m, O>>, MachineError> {
        self.transitions_for(machine, object, args)?
            .next()
            .transpose()
    }

    pub fn can_fire(&self, machine: &Machine<O>, object: &O) -> Result<bool, MachineError> {
        Ok(self.transition_for(machine, object, &[])?.is_some())
    }
}

impl<O> fmt::Debug for Event<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .finish()
    }
}
