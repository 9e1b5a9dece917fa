//! States a machine can place its attribute in.
//!
//! A state pairs a name with the value persisted into the object's
//! attribute. Values are usually the state name itself, but may be any
//! JSON value, computed on each use, or recognized by a matcher when the
//! persisted value is not a fixed literal.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type ValueFn = Arc<dyn Fn() -> Value + Send + Sync>;
type ValueMatcher = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// State-scoped behavior, dispatched on the object's current state.
pub type Behavior<O> = Arc<dyn Fn(&O) -> Value + Send + Sync>;

/// The value a state persists into the managed attribute.
#[derive(Clone)]
pub enum StateValue {
    Static(Value),
    /// Evaluated every time the value is needed.
    Dynamic(ValueFn),
}

impl StateValue {
    pub fn resolve(&self) -> Value {
        match self {
            StateValue::Static(value) => value.clone(),
            StateValue::Dynamic(compute) => compute(),
        }
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Static(value) => write!(f, "{value}"),
            StateValue::Dynamic(_) => f.write_str("<dynamic>"),
        }
    }
}

/// A named state of a machine.
///
/// # Example
///
/// ```rust
/// use statewise::core::State;
/// use serde_json::{json, Value};
///
/// struct User;
///
/// let passive: State<User> = State::new("passive").initial();
/// assert_eq!(passive.value(), json!("passive"));
/// assert!(passive.is_initial());
///
/// let activated: State<User> = State::new("activated").matching(|v| !v.is_null());
/// assert!(activated.matches(&json!("2024-05-01T10:00:00Z")));
/// assert!(!activated.matches(&Value::Null));
/// ```
pub struct State<O> {
    name: String,
    value: StateValue,
    initial: bool,
    matcher: Option<ValueMatcher>,
    behaviors: BTreeMap<String, Behavior<O>>,
}

impl<O> State<O> {
    /// Create a state whose persisted value is its own name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: StateValue::Static(Value::String(name.clone())),
            name,
            initial: false,
            matcher: None,
            behaviors: BTreeMap::new(),
        }
    }

    /// Persist an explicit value instead of the state name.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = StateValue::Static(value.into());
        self
    }

    /// Persist a value computed at transition time.
    pub fn dynamic<F>(mut self, compute: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.value = StateValue::Dynamic(Arc::new(compute));
        self
    }

    /// Recognize stored values with a predicate rather than equality.
    pub fn matching<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    /// Attach a behavior that applies while the object is in this state.
    pub fn behavior<F>(mut self, name: impl Into<String>, behavior: F) -> Self
    where
        F: Fn(&O) -> Value + Send + Sync + 'static,
    {
        self.behaviors.insert(name.into(), Arc::new(behavior));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state's persisted value. Dynamic values are evaluated on each call.
    pub fn value(&self) -> Value {
        self.value.resolve()
    }

    /// The persisted value when it is a fixed literal.
    pub fn static_value(&self) -> Option<&Value> {
        match &self.value {
            StateValue::Static(value) => Some(value),
            StateValue::Dynamic(_) => None,
        }
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn has_matcher(&self) -> bool {
        self.matcher.is_some()
    }

    /// Whether a stored attribute value represents this state.
    pub fn matches(&self, value: &Value) -> bool {
        match &self.matcher {
            Some(matcher) => matcher(value),
            None => *value == self.value(),
        }
    }

    pub fn has_behaviors(&self) -> bool {
        !self.behaviors.is_empty()
    }

    pub fn behavior_names(&self) -> impl Iterator<Item = &str> {
        self.behaviors.keys().map(String::as_str)
    }

    pub fn find_behavior(&self, name: &str) -> Option<&Behavior<O>> {
        self.behaviors.get(name)
    }
}

impl<O> fmt::Debug for State<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("initial", &self.initial)
            .field("matcher", &self.matcher.is_some())
            .field("behaviors", &self.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Vehicle {
        speed: u64,
    }

    #[test]
    fn value_defaults_to_name() {
        let state: State<Vehicle> = State::new("parked");
        assert_eq!(state.name(), "parked");
        assert_eq!(state.value(), json!("parked"));
        assert_eq!(state.static_value(), Some(&json!("parked")));
        assert!(!state.is_initial());
    }

    #[test]
    fn explicit_value_is_used() {
        let state: State<Vehicle> = State::new("idling").with_value(1);
        assert_eq!(state.value(), json!(1));
        assert!(state.matches(&json!(1)));
        assert!(!state.matches(&json!("idling")));
    }

    #[test]
    fn dynamic_value_is_evaluated_each_time() {
        let counter = Arc::new(AtomicU64::new(0));
        let source = Arc::clone(&counter);
        let next = move || json!(source.fetch_add(1, Ordering::SeqCst));
        let state: State<Vehicle> = State::new("idling").dynamic(next);

        assert_eq!(state.value(), json!(0));
        assert_eq!(state.value(), json!(1));
        assert!(state.static_value().is_none());
    }

    #[test]
    fn matcher_overrides_equality() {
        let state: State<Vehicle> = State::new("activated").matching(|v| v.is_string());
        assert!(state.matches(&json!("2009-03-24")));
        assert!(!state.matches(&Value::Null));
        assert!(state.has_matcher());
    }

    #[test]
    fn behaviors_are_looked_up_by_name() {
        let doubled = |v: &Vehicle| json!(v.speed * 2);
        let state = State::new("first_gear").behavior("speed", doubled);

        assert!(state.has_behaviors());
        let speed = state.find_behavior("speed").expect("behavior defined");
        assert_eq!(speed(&Vehicle { speed: 5 }), json!(10));
        assert!(state.find_behavior("park").is_none());
        assert_eq!(state.behavior_names().collect::<Vec<_>>(), vec!["speed"]);
    }
}
