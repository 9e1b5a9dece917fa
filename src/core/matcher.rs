//! Name matchers used by transition rules and callback filters.

use serde::{Deserialize, Serialize};

/// Matches state or event names.
///
/// `AllExcept` is evaluated against whatever name it is asked about, so
/// states declared after the matcher was built are covered automatically.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Matcher {
    #[default]
    All,
    Only(Vec<String>),
    AllExcept(Vec<String>),
}

impl Matcher {
    pub fn all() -> Self {
        Matcher::All
    }

    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn all_except<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::AllExcept(names.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Only(names) => names.iter().any(|n| n == name),
            Matcher::AllExcept(names) => !names.iter().any(|n| n == name),
        }
    }

    /// Names explicitly referenced by this matcher, in declaration order.
    pub fn known_names(&self) -> &[String] {
        match self {
            Matcher::All => &[],
            Matcher::Only(names) | Matcher::AllExcept(names) => names,
        }
    }

    /// Expand the matcher against a set of candidate names.
    pub fn filter<'a, I>(&self, names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().filter(|n| self.matches(n)).collect()
    }
}

impl From<&str> for Matcher {
    fn from(name: &str) -> Self {
        Matcher::Only(vec![name.to_string()])
    }
}

impl From<String> for Matcher {
    fn from(name: String) -> Self {
        Matcher::Only(vec![name])
    }
}

impl<const N: usize> From<[&str; N]> for Matcher {
    fn from(names: [&str; N]) -> Self {
        Matcher::only(names)
    }
}

impl From<Vec<&str>> for Matcher {
    fn from(names: Vec<&str>) -> Self {
        Matcher::only(names)
    }
}

impl From<&[&str]> for Matcher {
    fn from(names: &[&str]) -> Self {
        Matcher::only(names.iter().copied())
    }
}

/// Destination of a transition rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    State(String),
    /// Loop back to whatever state the object is currently in.
    Same,
}

impl Target {
    pub fn resolve<'a>(&'a self, from: &'a str) -> &'a str {
        match self {
            Target::State(name) => name,
            Target::Same => from,
        }
    }

    pub fn known_name(&self) -> Option<&str> {
        match self {
            Target::State(name) => Some(name),
            Target::Same => None,
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::State(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::State(name)
    }
}
