//! Reminder snapshot record.
//!
//! # Responsibility
//! - Carry the caller-owned reminder data the alarm engine evaluates.
//! - Keep wire names stable for snapshots produced by the web layer.
//!
//! # Invariants
//! - `reminder_date` and `created_at` are Unix epoch milliseconds.
//! - A `completed` reminder is inert for alerting purposes.

use serde::{Deserialize, Serialize};

/// Caller-owned reminder as seen by the alarm engine.
///
/// The engine only ever reads these; snapshots are replaced wholesale through
/// `AlarmEngine::start_monitoring`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Opaque identifier, unique within one snapshot.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Due time in epoch milliseconds.
    pub reminder_date: i64,
    #[serde(default)]
    pub completed: bool,
    /// Informational only.
    #[serde(default)]
    pub created_at: i64,
}

impl Reminder {
    /// Creates an open reminder with no description.
    pub fn new(id: impl Into<String>, title: impl Into<String>, reminder_date: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            reminder_date,
            completed: false,
            created_at: 0,
        }
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns whether this reminder can still raise an alert.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::Reminder;

    #[test]
    fn deserializes_web_snapshot_field_names() {
        let value = serde_json::json!({
            "id": "r-1",
            "title": "Call founder",
            "description": "Follow up on term sheet",
            "reminderDate": 1_700_000_000_000_i64,
            "completed": false,
            "createdAt": 1_699_000_000_000_i64
        });

        let reminder: Reminder = serde_json::from_value(value).expect("snapshot should parse");
        assert_eq!(reminder.id, "r-1");
        assert_eq!(reminder.reminder_date, 1_700_000_000_000);
        assert_eq!(
            reminder.description.as_deref(),
            Some("Follow up on term sheet")
        );
        assert!(reminder.is_active());
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let value = serde_json::json!({
            "id": "r-2",
            "title": "Board prep",
            "reminderDate": 42
        });

        let reminder: Reminder = serde_json::from_value(value).expect("minimal snapshot");
        assert_eq!(reminder, Reminder::new("r-2", "Board prep", 42));
    }
}
