//! The capability a host object exposes to the machines that drive it.

use super::outcome::Outcome;
use crate::error::MachineError;
use serde_json::Value;

/// Host object whose attributes are managed by one or more machines.
///
/// Attribute access is keyed by name so several machines can drive
/// distinct attributes of the same object. `invoke` is the narrow
/// callable-by-name capability used for configured actions and for
/// callbacks registered by method name.
///
/// # Example
///
/// ```rust
/// use statewise::core::{Outcome, Stateful};
/// use statewise::MachineError;
/// use serde_json::Value;
///
/// struct Vehicle {
///     state: Value,
///     saved: bool,
/// }
///
/// impl Stateful for Vehicle {
///     fn read_attribute(&self, _attribute: &str) -> Value {
///         self.state.clone()
///     }
///
///     fn write_attribute(&mut self, _attribute: &str, value: Value) {
///         self.state = value;
///     }
///
///     fn invoke(&mut self, method: &str) -> Result<Outcome, MachineError> {
///         match method {
///             "save" => {
///                 self.saved = true;
///                 Ok(Outcome::Success)
///             }
///             _ => Err(MachineError::UnknownMethod { method: method.to_string() }),
///         }
///     }
/// }
/// ```
pub trait Stateful {
    /// Read the stored value of `attribute`. Unset attributes read as `Value::Null`.
    fn read_attribute(&self, attribute: &str) -> Value;

    /// Store `value` into `attribute`.
    fn write_attribute(&mut self, attribute: &str, value: Value);

    /// Invoke a named method on the object.
    fn invoke(&mut self, method: &str) -> Result<Outcome, MachineError> {
        Err(MachineError::UnknownMethod {
            method: method.to_string(),
        })
    }
}
