use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequencingOrder {
    /// Repository creation order.
    #[default]
    Any,
    Guid,
    CreationDateRecent,
    CreationDateOldest,
    LastUpdateRecent,
    LastUpdateOldest,
    PropertyAscending,
    PropertyDescending,
}

impl SequencingOrder {
    pub fn needs_property(&self) -> bool {
        matches!(
            self,
            SequencingOrder::PropertyAscending | SequencingOrder::PropertyDescending
        )
    }
}

/// Query descriptor shared by every find and relationship-page operation.
///
/// `page_size` of `None` or `0` means "the server maximum". The gateway
/// validates and bounds the request before it reaches a handler, after which
/// `page_size` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FindRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub starting_from: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    #[serde(default)]
    pub sequencing_order: SequencingOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequencing_property: Option<String>,
}

impl FindRequest {
    pub fn matching(search_criteria: impl Into<String>) -> Self {
        Self {
            search_criteria: Some(search_criteria.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, starting_from: i32, page_size: i32) -> Self {
        self.starting_from = starting_from;
        self.page_size = Some(page_size);
        self
    }

    /// Offset as an index. Negative offsets are rejected by validation.
    pub fn offset(&self) -> usize {
        usize::try_from(self.starting_from).unwrap_or(0)
    }

    /// Page length, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.page_size
            .filter(|size| *size > 0)
            .and_then(|size| usize::try_from(size).ok())
    }
}
