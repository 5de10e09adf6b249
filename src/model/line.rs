use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::model::node::overlay;
use crate::model::{Guid, NodeKind, Status, SystemAttributes};

/// The kinds of relationship ("line") between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineKind {
    TermAnchor,
    CategoryAnchor,
    CategoryHierarchyLink,
    TermCategorization,
    HasA,
    IsA,
    Synonym,
    Antonym,
    RelatedTerm,
    ReplacementTerm,
    Translation,
    ProjectScope,
}

impl LineKind {
    pub const ALL: [LineKind; 12] = [
        LineKind::TermAnchor,
        LineKind::CategoryAnchor,
        LineKind::CategoryHierarchyLink,
        LineKind::TermCategorization,
        LineKind::HasA,
        LineKind::IsA,
        LineKind::Synonym,
        LineKind::Antonym,
        LineKind::RelatedTerm,
        LineKind::ReplacementTerm,
        LineKind::Translation,
        LineKind::ProjectScope,
    ];

    /// Anchors are created and removed with the term or category they anchor.
    pub fn is_anchor(&self) -> bool {
        matches!(self, LineKind::TermAnchor | LineKind::CategoryAnchor)
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            LineKind::TermAnchor => "term-anchor",
            LineKind::CategoryAnchor => "category-anchor",
            LineKind::CategoryHierarchyLink => "category-hierarchy-link",
            LineKind::TermCategorization => "term-categorization",
            LineKind::HasA => "has-a",
            LineKind::IsA => "is-a",
            LineKind::Synonym => "synonym",
            LineKind::Antonym => "antonym",
            LineKind::RelatedTerm => "related-term",
            LineKind::ReplacementTerm => "replacement-term",
            LineKind::Translation => "translation",
            LineKind::ProjectScope => "project-scope",
        }
    }
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for LineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineKind::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == s)
            .ok_or_else(|| format!("'{}' is not a relationship type", s))
    }
}

/// One end of a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEnd {
    pub node_guid: Guid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LineEnd {
    pub fn new(node_guid: impl Into<Guid>) -> Self {
        Self {
            node_guid: node_guid.into(),
            node_type: None,
            name: None,
        }
    }
}

/// A typed, directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,
    pub line_type: LineKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end1: Option<LineEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end2: Option<LineEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_attributes: Option<SystemAttributes>,
}

impl Line {
    pub fn new(line_type: LineKind) -> Self {
        Self {
            guid: None,
            line_type,
            end1: None,
            end2: None,
            description: None,
            expression: None,
            steward: None,
            source: None,
            confidence: None,
            status: None,
            system_attributes: None,
        }
    }

    pub fn between(line_type: LineKind, end1: impl Into<Guid>, end2: impl Into<Guid>) -> Self {
        Self {
            end1: Some(LineEnd::new(end1)),
            end2: Some(LineEnd::new(end2)),
            ..Self::new(line_type)
        }
    }

    pub fn current_status(&self) -> Status {
        self.status.unwrap_or_default()
    }

    pub fn end1_guid(&self) -> Option<&str> {
        self.end1.as_ref().map(|end| end.node_guid.as_str())
    }

    pub fn end2_guid(&self) -> Option<&str> {
        self.end2.as_ref().map(|end| end.node_guid.as_str())
    }

    /// Applies an update payload to this (current) line. Ends never change.
    pub fn apply_update(&mut self, update: Line, is_replace: bool) {
        overlay(&mut self.description, update.description, is_replace);
        overlay(&mut self.expression, update.expression, is_replace);
        overlay(&mut self.steward, update.steward, is_replace);
        overlay(&mut self.source, update.source, is_replace);
        overlay(&mut self.confidence, update.confidence, is_replace);
        if update.status.is_some() {
            self.status = update.status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_parse_back() {
        for kind in LineKind::ALL {
            assert_eq!(kind.path_segment().parse::<LineKind>(), Ok(kind));
        }
        assert!("has_a".parse::<LineKind>().is_err());
    }

    #[test]
    fn test_line_merge_and_replace() {
        let mut current = Line {
            description: Some("same meaning".to_string()),
            steward: Some("alice".to_string()),
            ..Line::between(LineKind::Synonym, "a", "b")
        };
        current.apply_update(
            Line {
                confidence: Some(80),
                ..Line::new(LineKind::Synonym)
            },
            false,
        );
        assert_eq!(current.steward.as_deref(), Some("alice"));
        assert_eq!(current.confidence, Some(80));

        current.apply_update(Line::new(LineKind::Synonym), true);
        assert_eq!(current.steward, None);
        assert_eq!(current.end1_guid(), Some("a"));
    }
}
