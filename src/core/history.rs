//! Transition history tracking.
//!
//! Transitions themselves only live for one `perform` call. A
//! `TransitionRecord` is the serializable trace they leave behind, and a
//! `TransitionHistory` is an immutable, ordered log of those records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Record of a single performed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: Uuid,
    /// The attribute the owning machine manages
    pub attribute: String,
    pub event: String,
    pub from: Value,
    pub from_name: String,
    pub to: Value,
    pub to_name: String,
    /// Whether the transition (including its action) succeeded
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of transition records.
///
/// History is immutable: `record` returns a new history with the record
/// appended.
///
/// # Example
///
/// ```rust
/// use statewise::core::{TransitionHistory, TransitionRecord};
/// use serde_json::json;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let record = TransitionRecord {
///     id: Uuid::new_v4(),
///     attribute: "state".into(),
///     event: "register".into(),
///     from: json!("passive"),
///     from_name: "passive".into(),
///     to: json!("pending"),
///     to_name: "pending".into(),
///     success: true,
///     timestamp: Utc::now(),
/// };
///
/// let history = TransitionHistory::new().record(record);
/// assert_eq!(history.path(), vec!["passive", "pending"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: Vec<TransitionRecord>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// State names traversed by successful transitions: the first origin,
    /// then each destination.
    pub fn path(&self) -> Vec<&str> {
        let mut successful = self.records.iter().filter(|r| r.success).peekable();
        let mut path = Vec::new();
        if let Some(first) = successful.peek() {
            path.push(first.from_name.as_str());
        }
        path.extend(successful.map(|r| r.to_name.as_str()));
        path
    }

    /// Records belonging to one machine attribute.
    pub fn for_attribute<'a>(
        &'a self,
        attribute: &'a str,
    ) -> impl Iterator<Item = &'a TransitionRecord> {
        self.records.iter().filter(move |r| r.attribute == attribute)
    }

    /// Time between the first and last records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
