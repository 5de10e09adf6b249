//! Mapping between gateway lines and repository relationships.
//!
//! Every line kind has its own mapper declaring the repository type name, the
//! node kinds allowed at each end and the properties the relationship carries.
//! `LineKind::mapper` selects the mapper for a kind.

use serde_json::Value;

use crate::model::{Line, LineEnd, LineKind, NodeKind};
use crate::store::{string_property, EntityProxy, InstanceProperties, RepositoryRelationship};

const TERM_RELATIONSHIP_PROPERTIES: &[&str] =
    &["description", "expression", "steward", "source", "confidence"];
const ANY_NODE: &[NodeKind] = &NodeKind::ALL;

pub trait LineMapper: Send + Sync {
    fn line_kind(&self) -> LineKind;
    fn type_name(&self) -> &'static str;
    fn end1_kinds(&self) -> &'static [NodeKind];
    fn end2_kinds(&self) -> &'static [NodeKind];
    fn property_names(&self) -> &'static [&'static str];

    /// Repository properties for `line`, restricted to what this kind carries.
    fn to_wire(&self, line: &Line) -> InstanceProperties {
        let mut properties = InstanceProperties::new();
        for name in self.property_names() {
            let value = match *name {
                "description" => line.description.clone().map(Value::String),
                "expression" => line.expression.clone().map(Value::String),
                "steward" => line.steward.clone().map(Value::String),
                "source" => line.source.clone().map(Value::String),
                "confidence" => line.confidence.map(Value::from),
                _ => None,
            };
            if let Some(value) = value {
                properties.insert(name.to_string(), value);
            }
        }
        properties
    }

    fn from_wire(&self, relationship: &RepositoryRelationship) -> Line {
        let properties = &relationship.properties;
        let header = &relationship.header;
        Line {
            guid: Some(header.guid.clone()),
            line_type: self.line_kind(),
            end1: Some(line_end(&relationship.end1)),
            end2: Some(line_end(&relationship.end2)),
            description: string_property(properties, "description"),
            expression: string_property(properties, "expression"),
            steward: string_property(properties, "steward"),
            source: string_property(properties, "source"),
            confidence: properties
                .get("confidence")
                .and_then(Value::as_i64)
                .and_then(|value| i32::try_from(value).ok()),
            status: Some(header.status),
            system_attributes: Some(header.system_attributes()),
        }
    }
}

fn line_end(proxy: &EntityProxy) -> LineEnd {
    LineEnd {
        node_guid: proxy.guid.clone(),
        node_type: NodeKind::from_type_name(&proxy.type_name),
        name: proxy.name.clone(),
    }
}

macro_rules! line_mapper {
    (
        $mapper:ident,
        $kind:ident,
        $type_name:literal,
        $end1:expr,
        $end2:expr,
        $properties:expr $(,)?
    ) => {
        pub struct $mapper;

        impl LineMapper for $mapper {
            fn line_kind(&self) -> LineKind {
                LineKind::$kind
            }

            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn end1_kinds(&self) -> &'static [NodeKind] {
                $end1
            }

            fn end2_kinds(&self) -> &'static [NodeKind] {
                $end2
            }

            fn property_names(&self) -> &'static [&'static str] {
                $properties
            }
        }
    };
}

line_mapper!(
    TermAnchorMapper,
    TermAnchor,
    "TermAnchor",
    &[NodeKind::Glossary],
    &[NodeKind::Term],
    &[],
);
line_mapper!(
    CategoryAnchorMapper,
    CategoryAnchor,
    "CategoryAnchor",
    &[NodeKind::Glossary],
    &[NodeKind::Category],
    &[],
);
line_mapper!(
    CategoryHierarchyLinkMapper,
    CategoryHierarchyLink,
    "CategoryHierarchyLink",
    &[NodeKind::Category],
    &[NodeKind::Category],
    &[],
);
line_mapper!(
    TermCategorizationMapper,
    TermCategorization,
    "TermCategorization",
    &[NodeKind::Category],
    &[NodeKind::Term],
    &["description"],
);
line_mapper!(
    HasAMapper,
    HasA,
    "TermHASARelationship",
    &[NodeKind::Term],
    &[NodeKind::Term],
    TERM_RELATIONSHIP_PROPERTIES,
);
line_mapper!(
    IsAMapper,
    IsA,
    "IsARelationship",
    &[NodeKind::Term],
    &[NodeKind::Term],
    TERM_RELATIONSHIP_PROPERTIES,
);
line_mapper!(
    SynonymMapper,
    Synonym,
    "Synonym",
    &[NodeKind::Term],
    &[NodeKind::Term],
    TERM_RELATIONSHIP_PROPERTIES,
);
line_mapper!(
    AntonymMapper,
    Antonym,
    "Antonym",
    &[NodeKind::Term],
    &[NodeKind::Term],
    TERM_RELATIONSHIP_PROPERTIES,
);
line_mapper!(
    RelatedTermMapper,
    RelatedTerm,
    "RelatedTerm",
    &[NodeKind::Term],
    &[NodeKind::Term],
    TERM_RELATIONSHIP_PROPERTIES,
);
line_mapper!(
    ReplacementTermMapper,
    ReplacementTerm,
    "ReplacementTerm",
    &[NodeKind::Term],
    &[NodeKind::Term],
    TERM_RELATIONSHIP_PROPERTIES,
);
line_mapper!(
    TranslationMapper,
    Translation,
    "Translation",
    &[NodeKind::Term],
    &[NodeKind::Term],
    TERM_RELATIONSHIP_PROPERTIES,
);
line_mapper!(
    ProjectScopeMapper,
    ProjectScope,
    "ProjectScope",
    &[NodeKind::Project],
    ANY_NODE,
    &["description"],
);

impl LineKind {
    pub fn mapper(&self) -> &'static dyn LineMapper {
        match self {
            LineKind::TermAnchor => &TermAnchorMapper,
            LineKind::CategoryAnchor => &CategoryAnchorMapper,
            LineKind::CategoryHierarchyLink => &CategoryHierarchyLinkMapper,
            LineKind::TermCategorization => &TermCategorizationMapper,
            LineKind::HasA => &HasAMapper,
            LineKind::IsA => &IsAMapper,
            LineKind::Synonym => &SynonymMapper,
            LineKind::Antonym => &AntonymMapper,
            LineKind::RelatedTerm => &RelatedTermMapper,
            LineKind::ReplacementTerm => &ReplacementTermMapper,
            LineKind::Translation => &TranslationMapper,
            LineKind::ProjectScope => &ProjectScopeMapper,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.mapper().type_name()
    }
}
