use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Guid = String;

pub fn generate_guid() -> Guid {
    Uuid::new_v4().to_string()
}

/// Lifecycle status of a node or line instance.
///
/// Everything except `Deleted` is a "live" status. `Deleted` is only reachable
/// through a soft delete, and a restore returns the instance to the live status
/// it held before the delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Unknown,
    Draft,
    Prepared,
    Proposed,
    Approved,
    Rejected,
    #[default]
    Active,
    Deprecated,
    Other,
    Deleted,
}

impl Status {
    pub fn is_live(&self) -> bool {
        !matches!(self, Status::Deleted)
    }
}

impl std::fmt::Display for Status {
    /// Writes the serde wire name, such as `ACTIVE`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.write_str(&name),
            _ => Err(std::fmt::Error),
        }
    }
}

/// Audit fields maintained by the repository, never by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAttributes {
    pub created_by: String,
    pub create_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub update_time: DateTime<Utc>,
    pub version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&Status::Active).unwrap(), "\"ACTIVE\"");
        let status: Status = serde_json::from_str("\"DELETED\"").unwrap();
        assert_eq!(status, Status::Deleted);
        assert!(!status.is_live());
        assert!(Status::Draft.is_live());
        assert_eq!(Status::Deprecated.to_string(), "DEPRECATED");
    }
}
