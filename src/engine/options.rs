//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Options describing how a machine drives its attribute.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust
/// use statewise::engine::MachineOptions;
///
/// let options = MachineOptions::from_json(r#"{"initial": "passive", "action": "save"}"#).unwrap();
/// assert_eq!(options.attribute, "state");
/// assert_eq!(options.initial.as_deref(), Some("passive"));
/// assert!(!options.use_transactions);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    /// The attribute on the host object this machine manages
    pub attribute: String,

    /// Name of the state new objects start in
    pub initial: Option<String>,

    /// Method invoked on the object after the new state is written
    pub action: Option<String>,

    /// Wrap transitions in the machine's transaction provider
    pub use_transactions: bool,

    /// Prefix/suffix applied to qualified state and event names
    pub namespace: Option<String>,
}

impl MachineOptions {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            attribute: "state".to_string(),
            initial: None,
            action: None,
            use_transactions: false,
            namespace: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_manage_state_without_action() {
        let options = MachineOptions::default();
        assert_eq!(options.attribute, "state");
        assert!(options.action.is_none());
        assert!(!options.use_transactions);
        assert!(options.namespace.is_none());
    }

    #[test]
    fn json_overrides_defaults() {
        let options = MachineOptions::from_json(
            r#"{"attribute": "status", "use_transactions": true, "namespace": "alarm"}"#,
        )
        .unwrap();

        assert_eq!(options.attribute, "status");
        assert!(options.use_transactions);
        assert_eq!(options.namespace.as_deref(), Some("alarm"));
        assert!(options.initial.is_none());
    }

    #[test]
    fn invalid_json_is_rejected() {
        let result = MachineOptions::from_json(r#"{"use_transactions": "yes"}"#);
        assert!(result.is_err());
    }
}
