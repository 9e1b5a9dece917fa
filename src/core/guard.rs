//! Guard predicates for controlling transition rules.
//!
//! Guards are pure boolean functions evaluated against the object and the
//! candidate transition. They decide whether a rule applies without
//! touching the object.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The candidate transition a guard is evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct GuardContext<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub event: &'a str,
    pub args: &'a [Value],
}

type Predicate<O> = Arc<dyn Fn(&O, &GuardContext<'_>) -> bool + Send + Sync>;

fn predicate<O, F>(f: F) -> F
where
    F: Fn(&O, &GuardContext<'_>) -> bool + Send + Sync + 'static,
{
    f
}

/// Pure predicate that determines if a transition rule can apply.
///
/// # Example
///
/// ```rust
/// use statewise::core::{Guard, GuardContext};
///
/// struct Account {
///     password: Option<String>,
/// }
///
/// let has_password = Guard::new(|account: &Account| account.password.is_some());
/// let ctx = GuardContext { from: "passive", to: "pending", event: "register", args: &[] };
///
/// assert!(!has_password.check(&Account { password: None }, &ctx));
/// assert!(has_password.check(&Account { password: Some("secret".into()) }, &ctx));
/// ```
pub struct Guard<O> {
    predicate: Predicate<O>,
}

impl<O: 'static> Guard<O> {
    /// Create a guard from a predicate over the object alone.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&O) -> bool + Send + Sync + 'static,
    {
        let check = self::predicate::<O, _>(move |object, _ctx| predicate(object));
        Guard {
            predicate: Arc::new(check),
        }
    }

    /// Create a guard that also inspects the candidate transition.
    pub fn with_context<F>(predicate: F) -> Self
    where
        F: Fn(&O, &GuardContext<'_>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Invert the guard, as used by `unless` conditions.
    pub fn negate(self) -> Self {
        let inner = self.predicate;
        let check = self::predicate::<O, _>(move |object, ctx| !inner(object, ctx));
        Guard {
            predicate: Arc::new(check),
        }
    }
}

impl<O> Guard<O> {
    pub fn check(&self, object: &O, ctx: &GuardContext<'_>) -> bool {
        (self.predicate)(object, ctx)
    }
}

impl<O> Clone for Guard<O> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<O> fmt::Debug for Guard<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard")
    }
}
