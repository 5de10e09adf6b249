use serde::{Deserialize, Serialize};

use crate::model::NodeKind;

/// Classifications that can be attached to glossary content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "classificationName")]
pub enum Classification {
    Confidentiality {
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<i32>,
    },
    Confidence {
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<i32>,
    },
    Criticality {
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<i32>,
    },
    Retention {
        #[serde(skip_serializing_if = "Option::is_none")]
        basis: Option<String>,
    },
    SpineObject,
    SpineAttribute,
    ObjectIdentifier,
    Taxonomy,
    CanonicalVocabulary,
    SubjectAreaDefinition {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl Classification {
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Confidentiality { .. } => "Confidentiality",
            Classification::Confidence { .. } => "Confidence",
            Classification::Criticality { .. } => "Criticality",
            Classification::Retention { .. } => "Retention",
            Classification::SpineObject => "SpineObject",
            Classification::SpineAttribute => "SpineAttribute",
            Classification::ObjectIdentifier => "ObjectIdentifier",
            Classification::Taxonomy => "Taxonomy",
            Classification::CanonicalVocabulary => "CanonicalVocabulary",
            Classification::SubjectAreaDefinition { .. } => "SubjectArea",
        }
    }

    /// Whether this classification may be attached to a node of `kind`.
    pub fn valid_for(&self, kind: NodeKind) -> bool {
        match self {
            Classification::Confidentiality { .. }
            | Classification::Confidence { .. }
            | Classification::Criticality { .. }
            | Classification::Retention { .. } => kind != NodeKind::Project,
            Classification::SpineObject
            | Classification::SpineAttribute
            | Classification::ObjectIdentifier => kind == NodeKind::Term,
            Classification::Taxonomy | Classification::CanonicalVocabulary => {
                kind == NodeKind::Glossary
            }
            Classification::SubjectAreaDefinition { .. } => kind == NodeKind::Category,
        }
    }
}
