use serde::{Deserialize, Serialize};

use crate::model::{Classification, Guid, LineKind, Status, SystemAttributes};

/// The kinds of vertex the gateway serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Glossary,
    Term,
    Category,
    Project,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Glossary,
        NodeKind::Term,
        NodeKind::Category,
        NodeKind::Project,
    ];

    /// Entity type name used by the metadata repository.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Glossary => "Glossary",
            NodeKind::Term => "GlossaryTerm",
            NodeKind::Category => "GlossaryCategory",
            NodeKind::Project => "Project",
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<NodeKind> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == type_name)
    }

    /// Path segment of the REST collection for this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            NodeKind::Glossary => "glossaries",
            NodeKind::Term => "terms",
            NodeKind::Category => "categories",
            NodeKind::Project => "projects",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Glossary => "Glossary",
            NodeKind::Term => "Term",
            NodeKind::Category => "Category",
            NodeKind::Project => "Project",
        }
    }

    /// Terms and categories live inside exactly one glossary.
    pub fn requires_glossary_anchor(&self) -> bool {
        matches!(self, NodeKind::Term | NodeKind::Category)
    }

    /// The relationship that anchors this kind in its glossary.
    pub fn glossary_anchor(&self) -> Option<LineKind> {
        match self {
            NodeKind::Term => Some(LineKind::TermAnchor),
            NodeKind::Category => Some(LineKind::CategoryAnchor),
            NodeKind::Glossary | NodeKind::Project => None,
        }
    }

    /// Glossary names are unique among live glossaries.
    pub fn has_unique_name(&self) -> bool {
        matches!(self, NodeKind::Glossary)
    }

    /// Relationships in which this kind is the owning end (end1). A live
    /// relationship of one of these kinds blocks a delete.
    pub fn owned_content(&self) -> &'static [LineKind] {
        match self {
            NodeKind::Glossary => &[LineKind::TermAnchor, LineKind::CategoryAnchor],
            NodeKind::Category => &[LineKind::CategoryHierarchyLink],
            NodeKind::Term | NodeKind::Project => &[],
        }
    }

    /// Kind-specific text properties persisted alongside the common ones.
    pub fn extra_properties(&self) -> &'static [&'static str] {
        match self {
            NodeKind::Glossary => &["language", "usage"],
            NodeKind::Term => &["summary", "abbreviation", "examples", "usage"],
            NodeKind::Category | NodeKind::Project => &[],
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference to another node, e.g. the glossary a term is anchored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub guid: Guid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
}

impl NodeSummary {
    pub fn new(guid: impl Into<Guid>) -> Self {
        Self {
            guid: guid.into(),
            name: None,
            qualified_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSummary {
    pub guid: Guid,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaUsage {
    Icon,
    Thumbnail,
    Illustration,
    UsageGuidance,
    Other,
}

/// Media (images, documents) linked to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedMedia {
    pub guid: Guid,
    pub url: String,
    #[serde(default)]
    pub media_usage: Vec<MediaUsage>,
}

impl RelatedMedia {
    pub fn icon(&self) -> Option<IconSummary> {
        self.media_usage
            .contains(&MediaUsage::Icon)
            .then(|| IconSummary {
                guid: self.guid.clone(),
                url: self.url.clone(),
            })
    }
}

/// A glossary, term, category or project.
///
/// The same shape is used as the create/update payload, where every field is
/// optional, and as the response, where the repository has filled in `guid`,
/// `status` and `system_attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<Guid>,
    pub node_type: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Vec<Classification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glossary: Option<NodeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<NodeSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<IconSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_attributes: Option<SystemAttributes>,
}

impl Node {
    pub fn new(node_type: NodeKind) -> Self {
        Self {
            guid: None,
            node_type,
            name: None,
            qualified_name: None,
            description: None,
            summary: None,
            abbreviation: None,
            examples: None,
            usage: None,
            language: None,
            status: None,
            classifications: None,
            glossary: None,
            parent_category: None,
            icons: Vec::new(),
            system_attributes: None,
        }
    }

    pub fn named(node_type: NodeKind, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(node_type)
        }
    }

    pub fn current_status(&self) -> Status {
        self.status.unwrap_or_default()
    }

    /// Value of a text property by its repository property name.
    pub fn text_property(&self, property: &str) -> Option<&str> {
        match property {
            "name" => self.name.as_deref(),
            "qualifiedName" => self.qualified_name.as_deref(),
            "description" => self.description.as_deref(),
            "summary" => self.summary.as_deref(),
            "abbreviation" => self.abbreviation.as_deref(),
            "examples" => self.examples.as_deref(),
            "usage" => self.usage.as_deref(),
            "language" => self.language.as_deref(),
            _ => None,
        }
    }

    pub fn set_text_property(&mut self, property: &str, value: Option<String>) {
        let slot = match property {
            "name" => &mut self.name,
            "qualifiedName" => &mut self.qualified_name,
            "description" => &mut self.description,
            "summary" => &mut self.summary,
            "abbreviation" => &mut self.abbreviation,
            "examples" => &mut self.examples,
            "usage" => &mut self.usage,
            "language" => &mut self.language,
            _ => return,
        };
        *slot = value;
    }

    /// Applies an update payload to this (current) node.
    ///
    /// With `is_replace` every mutable field takes the supplied value, so a
    /// missing field is cleared. Otherwise only supplied fields overwrite.
    /// The qualified name and status are kept when not supplied in either mode,
    /// and anchors are never changed by an update.
    pub fn apply_update(&mut self, update: Node, is_replace: bool) {
        overlay(&mut self.name, update.name, is_replace);
        overlay(&mut self.description, update.description, is_replace);
        overlay(&mut self.summary, update.summary, is_replace);
        overlay(&mut self.abbreviation, update.abbreviation, is_replace);
        overlay(&mut self.examples, update.examples, is_replace);
        overlay(&mut self.usage, update.usage, is_replace);
        overlay(&mut self.language, update.language, is_replace);
        overlay(&mut self.classifications, update.classifications, is_replace);

        if update.qualified_name.is_some() {
            self.qualified_name = update.qualified_name;
        }
        if update.status.is_some() {
            self.status = update.status;
        }
    }
}

pub(crate) fn overlay<T>(target: &mut Option<T>, supplied: Option<T>, is_replace: bool) {
    if is_replace || supplied.is_some() {
        *target = supplied;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_term() -> Node {
        Node {
            guid: Some("term-1".to_string()),
            description: Some("legacy".to_string()),
            summary: Some("old summary".to_string()),
            qualified_name: Some("GlossaryTerm.customer".to_string()),
            status: Some(Status::Draft),
            ..Node::named(NodeKind::Term, "customer")
        }
    }

    #[test]
    fn test_merge_keeps_unsupplied_fields() {
        let mut current = legacy_term();
        let update = Node {
            summary: Some("new summary".to_string()),
            ..Node::named(NodeKind::Term, "customer")
        };

        current.apply_update(update, false);

        assert_eq!(current.description.as_deref(), Some("legacy"));
        assert_eq!(current.summary.as_deref(), Some("new summary"));
        assert_eq!(current.status, Some(Status::Draft));
    }

    #[test]
    fn test_replace_clears_unsupplied_fields() {
        let mut current = legacy_term();
        let update = Node::named(NodeKind::Term, "customer");

        current.apply_update(update, true);

        assert_eq!(current.description, None);
        assert_eq!(current.summary, None);
        assert_eq!(
            current.qualified_name.as_deref(),
            Some("GlossaryTerm.customer")
        );
        assert_eq!(current.status, Some(Status::Draft));
    }

    #[test]
    fn test_node_kind_type_names() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(NodeKind::from_type_name("RelatedMedia"), None);
    }

    #[test]
    fn test_node_payload_deserialization() {
        let json = r#"{"nodeType": "Term", "name": "customer", "glossary": {"guid": "g-1"}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type, NodeKind::Term);
        assert_eq!(node.glossary, Some(NodeSummary::new("g-1")));
        assert!(node.icons.is_empty());
    }
}
