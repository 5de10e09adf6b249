use serde_json::Value;

use crate::error::{Result, SubjectAreaError};
use crate::model::{Classification, Node, NodeKind, RelatedMedia};
use crate::store::{InstanceProperties, RepositoryClassification, RepositoryEntity};

const COMMON_PROPERTIES: &[&str] = &["name", "qualifiedName", "description"];

pub const RELATED_MEDIA_TYPE: &str = "RelatedMedia";
pub const MEDIA_REFERENCE_TYPE: &str = "MediaReference";

fn property_names(kind: NodeKind) -> impl Iterator<Item = &'static str> {
    COMMON_PROPERTIES
        .iter()
        .chain(kind.extra_properties())
        .copied()
}

pub fn to_properties(node: &Node) -> InstanceProperties {
    property_names(node.node_type)
        .filter_map(|name| {
            node.text_property(name)
                .map(|value| (name.to_string(), Value::String(value.to_string())))
        })
        .collect()
}

/// Repository form of the node's classifications, rejecting any that are not
/// valid for the node's kind.
pub fn to_classifications(node: &Node) -> Result<Vec<RepositoryClassification>> {
    let Some(classifications) = &node.classifications else {
        return Ok(Vec::new());
    };

    classifications
        .iter()
        .map(|classification| {
            if !classification.valid_for(node.node_type) {
                return Err(SubjectAreaError::Classification {
                    classification: classification.name().to_string(),
                    message: format!("not valid for a {}", node.node_type),
                });
            }
            let mut properties = match serde_json::to_value(classification) {
                Ok(Value::Object(map)) => map.into_iter().collect::<InstanceProperties>(),
                Ok(_) => InstanceProperties::new(),
                Err(e) => return Err(SubjectAreaError::Unexpected(e.into())),
            };
            properties.remove("classificationName");
            Ok(RepositoryClassification {
                name: classification.name().to_string(),
                properties,
            })
        })
        .collect()
}

fn from_classification(classification: &RepositoryClassification) -> Option<Classification> {
    let mut object: serde_json::Map<String, Value> = classification
        .properties
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    // The wire name of SubjectAreaDefinition differs from its variant name.
    let variant = match classification.name.as_str() {
        "SubjectArea" => "SubjectAreaDefinition",
        other => other,
    };
    object.insert(
        "classificationName".to_string(),
        Value::String(variant.to_string()),
    );
    match serde_json::from_value(Value::Object(object)) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!(
                "Ignoring unreadable classification '{}': {}",
                classification.name,
                e
            );
            None
        }
    }
}

/// Maps a repository entity to a node. Anchors are not part of the entity and
/// are filled in by the handler.
pub fn from_entity(entity: &RepositoryEntity) -> Result<Node> {
    let kind = NodeKind::from_type_name(&entity.header.type_name).ok_or_else(|| {
        SubjectAreaError::property_server(format!(
            "entity '{}' has type '{}', which is not a glossary node type",
            entity.header.guid, entity.header.type_name
        ))
    })?;

    let mut node = Node::new(kind);
    for name in property_names(kind) {
        node.set_text_property(name, entity.string_property(name));
    }
    node.guid = Some(entity.header.guid.clone());
    node.status = Some(entity.header.status);
    node.system_attributes = Some(entity.header.system_attributes());
    if !entity.classifications.is_empty() {
        node.classifications = Some(
            entity
                .classifications
                .iter()
                .filter_map(from_classification)
                .collect(),
        );
    }
    Ok(node)
}

pub fn media_from_entity(entity: &RepositoryEntity) -> Option<RelatedMedia> {
    if entity.header.type_name != RELATED_MEDIA_TYPE {
        return None;
    }
    let url = entity.string_property("url")?;
    let media_usage = entity
        .properties
        .get("mediaUsage")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();
    Some(RelatedMedia {
        guid: entity.header.guid.clone(),
        url,
        media_usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::store::InstanceHeader;

    #[test]
    fn test_properties_follow_the_kind() {
        let node = Node {
            summary: Some("a summary".to_string()),
            language: Some("en".to_string()),
            ..Node::named(NodeKind::Term, "revenue")
        };
        let properties = to_properties(&node);
        assert_eq!(properties.get("name"), Some(&Value::String("revenue".to_string())));
        assert!(properties.contains_key("summary"));
        // language belongs to glossaries only
        assert!(!properties.contains_key("language"));
    }

    #[test]
    fn test_classifications_round_trip_through_entity() {
        let node = Node {
            classifications: Some(vec![
                Classification::Confidentiality { level: Some(2) },
                Classification::SubjectAreaDefinition {
                    name: Some("finance".to_string()),
                },
            ]),
            ..Node::named(NodeKind::Category, "ledgers")
        };
        let classifications = to_classifications(&node).unwrap();
        assert_eq!(classifications[1].name, "SubjectArea");

        let entity = RepositoryEntity {
            header: InstanceHeader::new("c1".to_string(), "GlossaryCategory", Status::Active, "u"),
            properties: to_properties(&node),
            classifications,
        };
        let mapped = from_entity(&entity).unwrap();
        assert_eq!(mapped.classifications, node.classifications);
        assert_eq!(mapped.name.as_deref(), Some("ledgers"));
    }

    #[test]
    fn test_invalid_classification_is_rejected() {
        let node = Node {
            classifications: Some(vec![Classification::SpineObject]),
            ..Node::named(NodeKind::Glossary, "finance")
        };
        let err = to_classifications(&node).unwrap_err();
        assert!(matches!(err, SubjectAreaError::Classification { .. }));
    }
}
