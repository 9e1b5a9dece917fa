//! Before/after transition callbacks.

use super::transition::Transition;
use crate::core::{Matcher, Outcome, Stateful};
use crate::error::MachineError;
use std::fmt;
use std::sync::Arc;

type BareFn = Arc<dyn Fn() -> Outcome + Send + Sync>;
type ObjectFn<O> = Arc<dyn Fn(&mut O) -> Outcome + Send + Sync>;
type TransitionFn<O> = Arc<dyn Fn(&mut O, &Transition<'_, O>) -> Outcome + Send + Sync>;

fn transition_fn<O, F>(f: F) -> F
where
    F: Fn(&mut O, &Transition<'_, O>) -> Outcome + Send + Sync + 'static,
{
    f
}

/// What a callback calls when it runs.
pub enum CallbackTarget<O> {
    /// Takes no arguments.
    Bare(BareFn),
    /// Takes the object.
    Object(ObjectFn<O>),
    /// Takes the object and the transition being performed.
    Transition(TransitionFn<O>),
    /// A method resolved on the object through `Stateful::invoke`.
    Method(String),
}

impl<O> Clone for CallbackTarget<O> {
    fn clone(&self) -> Self {
        match self {
            CallbackTarget::Bare(f) => CallbackTarget::Bare(Arc::clone(f)),
            CallbackTarget::Object(f) => CallbackTarget::Object(Arc::clone(f)),
            CallbackTarget::Transition(f) => CallbackTarget::Transition(Arc::clone(f)),
            CallbackTarget::Method(name) => CallbackTarget::Method(name.clone()),
        }
    }
}

impl<O> fmt::Debug for CallbackTarget<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackTarget::Bare(_) => f.write_str("Bare"),
            CallbackTarget::Object(_) => f.write_str("Object"),
            CallbackTarget::Transition(_) => f.write_str("Transition"),
            CallbackTarget::Method(name) => write!(f, "Method({name})"),
        }
    }
}

/// A callback guarded by `from`, `to` and `on` filters.
///
/// Filters default to matching everything. `loopback` further restricts
/// the callback to transitions that leave the state unchanged.
///
/// # Example
///
/// ```rust
/// use statewise::engine::Callback;
/// use statewise::core::Matcher;
/// # use statewise::core::Stateful;
/// # use serde_json::Value;
/// # struct User { state: Value, activated: bool }
/// # impl Stateful for User {
/// #     fn read_attribute(&self, _: &str) -> Value { self.state.clone() }
/// #     fn write_attribute(&mut self, _: &str, value: Value) { self.state = value; }
/// # }
///
/// let stamp = Callback::object(|user: &mut User| user.activated = true)
///     .on("activate")
///     .from(Matcher::all_except(["deleted"]));
/// ```
pub struct Callback<O> {
    from: Matcher,
    to: Matcher,
    on: Matcher,
    loopback: bool,
    target: CallbackTarget<O>,
}

impl<O: Stateful + 'static> Callback<O> {
    pub fn new(target: CallbackTarget<O>) -> Self {
        Self {
            from: Matcher::All,
            to: Matcher::All,
            on: Matcher::All,
            loopback: false,
            target,
        }
    }

    /// Callback that takes no arguments.
    pub fn call<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        Self::new(CallbackTarget::Bare(Arc::new(move || f().into())))
    }

    /// Callback that receives the object.
    pub fn object<F, R>(f: F) -> Self
    where
        F: Fn(&mut O) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        let run = move |object: &mut O| -> Outcome { f(object).into() };
        Self::new(CallbackTarget::Object(Arc::new(run)))
    }

    /// Callback that receives the object and the transition.
    pub fn transition<F, R>(f: F) -> Self
    where
        F: Fn(&mut O, &Transition<'_, O>) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        let run = transition_fn::<O, _>(move |object, transition| f(object, transition).into());
        Self::new(CallbackTarget::Transition(Arc::new(run)))
    }

    /// Callback that invokes a named method on the object.
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(CallbackTarget::Method(name.into()))
    }

    pub fn from(mut self, matcher: impl Into<Matcher>) -> Self {
        self.from = matcher.into();
        self
    }

    pub fn to(mut self, matcher: impl Into<Matcher>) -> Self {
        self.to = matcher.into();
        self
    }

    pub fn on(mut self, matcher: impl Into<Matcher>) -> Self {
        self.on = matcher.into();
        self
    }

    /// Only run when the transition's origin and destination are the same.
    pub fn loopback(mut self) -> Self {
        self.loopback = true;
        self
    }

    /// State names this callback explicitly refers to.
    pub fn known_states(&self) -> impl Iterator<Item = &str> {
        self.from
            .known_names()
            .iter()
            .chain(self.to.known_names())
            .map(String::as_str)
    }

    /// Whether this callback applies to the transition.
    pub fn matches(&self, transition: &Transition<'_, O>) -> bool {
        self.from.matches(transition.from_name())
            && self.to.matches(transition.to_name())
            && self.on.matches(transition.event())
            && (!self.loopback || transition.is_loopback())
    }

    pub(crate) fn run(
        &self,
        object: &mut O,
        transition: &Transition<'_, O>,
    ) -> Result<Outcome, MachineError> {
        tracing::trace!(
            attribute = transition.attribute(),
            event = transition.event(),
            callback = ?self.target,
            "running transition callback"
        );
        let outcome = match &self.target {
            CallbackTarget::Bare(f) => f(),
            CallbackTarget::Object(f) => f(object),
            CallbackTarget::Transition(f) => f(object, transition),
            CallbackTarget::Method(name) => object.invoke(name)?,
        };
        Ok(outcome)
    }
}

impl<O> fmt::Debug for Callback<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("on", &self.on)
            .field("loopback", &self.loopback)
            .field("target", &self.target)
            .finish()
    }
}
