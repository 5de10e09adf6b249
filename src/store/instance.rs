use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{FindRequest, Guid, SequencingOrder, Status, SystemAttributes};

/// Property bag of a repository instance, keyed by property name.
pub type InstanceProperties = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceHeader {
    pub guid: Guid,
    pub type_name: String,
    pub status: Status,
    /// Status held before a soft delete, used by restore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_on_delete: Option<Status>,
    pub created_by: String,
    pub create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub update_time: DateTime<Utc>,
    pub version: u64,
}

impl InstanceHeader {
    pub fn new(guid: Guid, type_name: &str, status: Status, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            guid,
            type_name: type_name.to_string(),
            status,
            status_on_delete: None,
            created_by: user_id.to_string(),
            create_time: now,
            updated_by: None,
            update_time: now,
            version: 1,
        }
    }

    /// Advances the header to the next version, stamped by `user_id`.
    pub fn touch(&mut self, user_id: &str) {
        self.updated_by = Some(user_id.to_string());
        self.update_time = Utc::now();
        self.version += 1;
    }

    pub fn system_attributes(&self) -> SystemAttributes {
        SystemAttributes {
            created_by: self.created_by.clone(),
            create_time: self.create_time,
            updated_by: self.updated_by.clone(),
            update_time: self.update_time,
            version: self.version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryClassification {
    pub name: String,
    #[serde(default)]
    pub properties: InstanceProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryEntity {
    pub header: InstanceHeader,
    pub properties: InstanceProperties,
    #[serde(default)]
    pub classifications: Vec<RepositoryClassification>,
}

impl RepositoryEntity {
    pub fn string_property(&self, name: &str) -> Option<String> {
        string_property(&self.properties, name)
    }
}

/// Lightweight reference to the entity at one end of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProxy {
    pub guid: Guid,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRelationship {
    pub header: InstanceHeader,
    pub end1: EntityProxy,
    pub end2: EntityProxy,
    pub properties: InstanceProperties,
}

impl RepositoryRelationship {
    /// The end that is not `guid`, or `None` when `guid` is on neither end.
    pub fn other_end(&self, guid: &str) -> Option<&EntityProxy> {
        if self.end1.guid == guid {
            Some(&self.end2)
        } else if self.end2.guid == guid {
            Some(&self.end1)
        } else {
            None
        }
    }
}

pub fn string_property(properties: &InstanceProperties, name: &str) -> Option<String> {
    properties
        .get(name)
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}

/// Paging, ordering and point-in-time part of a repository query.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub as_of_time: Option<DateTime<Utc>>,
    pub offset: usize,
    pub limit: Option<usize>,
    pub order: SequencingOrder,
    pub order_property: Option<String>,
}

impl From<&FindRequest> for PageRequest {
    fn from(request: &FindRequest) -> Self {
        Self {
            as_of_time: request.as_of_time,
            offset: request.offset(),
            limit: request.limit(),
            order: request.sequencing_order,
            order_property: request.sequencing_property.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityQuery {
    /// Matched against every string property; `None` matches everything.
    pub matcher: Option<Regex>,
    pub page: PageRequest,
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipQuery {
    pub type_name: Option<String>,
    pub page: PageRequest,
    /// Also match while the queried entity itself is deleted. The
    /// relationship and its other end must still be live.
    pub include_deleted_entity: bool,
}

impl RelationshipQuery {
    pub fn of_type(type_name: &str) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            ..Self::default()
        }
    }
}
