use regex::{Regex, RegexBuilder};
use std::sync::Arc;

use crate::error::{Result, SubjectAreaError};
use crate::handler::node_mapper::{
    from_entity, media_from_entity, to_classifications, to_properties, MEDIA_REFERENCE_TYPE,
};
use crate::handler::traits::NodeHandler;
use crate::model::{
    generate_guid, FindRequest, Line, LineKind, Node, NodeKind, NodeSummary, RelatedMedia,
    SequencingOrder, Status,
};
use crate::store::{
    EntityQuery, MetadataRepository, PageRequest, RelationshipQuery, RepositoryEntity,
    RepositoryError, RepositoryRelationship,
};

/// Node handler that maps one node kind onto repository entities.
pub struct RepositoryNodeHandler {
    kind: NodeKind,
    repository: Arc<dyn MetadataRepository>,
}

impl RepositoryNodeHandler {
    pub fn new(kind: NodeKind, repository: Arc<dyn MetadataRepository>) -> Self {
        Self { kind, repository }
    }

    /// Fetches an entity and checks that it is of this handler's kind.
    async fn entity(&self, user_id: &str, guid: &str) -> Result<RepositoryEntity> {
        let entity = self.repository.get_entity(user_id, guid).await?;
        if entity.header.type_name != self.kind.type_name() {
            return Err(SubjectAreaError::unrecognized_guid(guid));
        }
        Ok(entity)
    }

    /// Checks that `guid` names a live node of `kind`, for use as an anchor.
    async fn require_live(
        &self,
        user_id: &str,
        guid: &str,
        kind: NodeKind,
        parameter: &str,
    ) -> Result<()> {
        let entity = self.repository.get_entity(user_id, guid).await?;
        if entity.header.type_name != kind.type_name() {
            return Err(SubjectAreaError::invalid_parameter(
                parameter,
                format!("'{}' is not a {}", guid, kind),
            ));
        }
        if !entity.header.status.is_live() {
            return Err(SubjectAreaError::invalid_parameter(
                parameter,
                format!("{} '{}' is deleted", kind, guid),
            ));
        }
        Ok(())
    }

    /// Node form of an entity of any node kind, with its anchors resolved.
    async fn load(&self, user_id: &str, entity: RepositoryEntity) -> Result<Node> {
        let mut node = from_entity(&entity)?;
        if !entity.header.status.is_live() {
            return Ok(node);
        }
        let guid = entity.header.guid.as_str();
        match node.node_type {
            NodeKind::Term => {
                node.glossary = self.owner(user_id, guid, LineKind::TermAnchor).await?;
            }
            NodeKind::Category => {
                node.glossary = self.owner(user_id, guid, LineKind::CategoryAnchor).await?;
                node.parent_category = self
                    .owner(user_id, guid, LineKind::CategoryHierarchyLink)
                    .await?;
            }
            NodeKind::Glossary | NodeKind::Project => {}
        }
        Ok(node)
    }

    /// The end1 node of the live `via` relationship in which `guid` is end2.
    async fn owner(&self, user_id: &str, guid: &str, via: LineKind) -> Result<Option<NodeSummary>> {
        let query = RelationshipQuery::of_type(via.type_name());
        let relationships = self
            .repository
            .get_relationships_for_entity(user_id, guid, &query)
            .await?;
        Ok(relationships
            .into_iter()
            .find(|relationship| relationship.end2.guid == guid)
            .map(|relationship| NodeSummary {
                guid: relationship.end1.guid,
                name: relationship.end1.name,
                qualified_name: None,
            }))
    }

    /// Every live relationship of the node in repository order, optionally of
    /// one type. Paging is left to the caller so it applies after filtering.
    async fn relationships(
        &self,
        user_id: &str,
        guid: &str,
        type_name: Option<&str>,
        request: &FindRequest,
    ) -> Result<Vec<RepositoryRelationship>> {
        let query = RelationshipQuery {
            type_name: type_name.map(str::to_string),
            page: PageRequest {
                as_of_time: request.as_of_time,
                order: request.sequencing_order,
                order_property: request.sequencing_property.clone(),
                ..PageRequest::default()
            },
            ..RelationshipQuery::default()
        };
        Ok(self
            .repository
            .get_relationships_for_entity(user_id, guid, &query)
            .await?)
    }

    async fn link(&self, user_id: &str, via: LineKind, end1: &String, end2: &String) -> Result<()> {
        self.repository
            .add_relationship(
                user_id,
                via.type_name(),
                end1,
                end2,
                Default::default(),
                Status::Active,
            )
            .await?;
        Ok(())
    }
}

fn search_matcher(
    request: &FindRequest,
    exact_value: bool,
    ignore_case: bool,
) -> Result<Option<Regex>> {
    let Some(criteria) = request.search_criteria.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let pattern = if exact_value {
        format!("^{}$", regex::escape(criteria))
    } else {
        criteria.to_string()
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(ignore_case)
        .build()
        .map(Some)
        .map_err(|e| {
            SubjectAreaError::invalid_parameter(
                "searchCriteria",
                format!("'{}' is not a valid search expression: {}", criteria, e),
            )
        })
}

pub(crate) fn page<T>(items: Vec<T>, request: &FindRequest) -> Vec<T> {
    let skipped = items.into_iter().skip(request.offset());
    match request.limit() {
        Some(limit) => skipped.take(limit).collect(),
        None => skipped.collect(),
    }
}

#[async_trait::async_trait]
impl NodeHandler for RepositoryNodeHandler {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    async fn create(&self, user_id: &str, mut node: Node) -> Result<Node> {
        let glossary_guid = node.glossary.as_ref().map(|glossary| glossary.guid.clone());
        let parent_guid = node
            .parent_category
            .as_ref()
            .map(|parent| parent.guid.clone());

        if let Some(glossary_guid) = &glossary_guid {
            self.require_live(user_id, glossary_guid, NodeKind::Glossary, "glossary")
                .await?;
        }
        if let Some(parent_guid) = &parent_guid {
            self.require_live(user_id, parent_guid, NodeKind::Category, "parentCategory")
                .await?;
        }

        if node.qualified_name.is_none() {
            let suffix: String = generate_guid().chars().take(8).collect();
            node.qualified_name = Some(format!(
                "{}.{}@{}",
                self.kind.type_name(),
                node.name.as_deref().unwrap_or_default(),
                suffix
            ));
        }
        let classifications = to_classifications(&node)?;
        let entity = self
            .repository
            .add_entity(
                user_id,
                self.kind.type_name(),
                to_properties(&node),
                classifications,
                node.current_status(),
            )
            .await?;
        let guid = entity.header.guid.clone();

        let mut anchors = Vec::new();
        match self.kind {
            NodeKind::Term => anchors.extend(glossary_guid.map(|g| (LineKind::TermAnchor, g))),
            NodeKind::Category => {
                anchors.extend(glossary_guid.map(|g| (LineKind::CategoryAnchor, g)));
                anchors.extend(parent_guid.map(|p| (LineKind::CategoryHierarchyLink, p)));
            }
            NodeKind::Glossary | NodeKind::Project => {}
        }
        for (via, owner) in anchors {
            if let Err(e) = self.link(user_id, via, &owner, &guid).await {
                // Do not leave an unanchored node behind.
                if let Err(purge_error) = self.repository.purge_entity(user_id, &guid).await {
                    log::error!(
                        "Failed to remove unanchored {} '{}': {}",
                        self.kind,
                        guid,
                        purge_error
                    );
                }
                return Err(e);
            }
        }

        log::debug!("Created {} '{}'", self.kind, guid);
        self.load(user_id, entity).await
    }

    async fn get_by_guid(&self, user_id: &str, guid: &str) -> Result<Node> {
        let entity = self.entity(user_id, guid).await?;
        self.load(user_id, entity).await
    }

    async fn find(
        &self,
        user_id: &str,
        request: &FindRequest,
        exact_value: bool,
        ignore_case: bool,
    ) -> Result<Vec<Node>> {
        let query = EntityQuery {
            matcher: search_matcher(request, exact_value, ignore_case)?,
            page: PageRequest::from(request),
        };
        let entities = self
            .repository
            .find_entities(user_id, self.kind.type_name(), &query)
            .await?;

        let mut nodes = Vec::with_capacity(entities.len());
        for entity in entities {
            nodes.push(self.load(user_id, entity).await?);
        }
        Ok(nodes)
    }

    async fn update(
        &self,
        user_id: &str,
        guid: &str,
        node: Node,
        is_replace: bool,
    ) -> Result<Node> {
        let entity = self.entity(user_id, guid).await?;
        let mut current = from_entity(&entity)?;
        current.apply_update(node, is_replace);

        let classifications = to_classifications(&current)?;
        let updated = self
            .repository
            .update_entity(
                user_id,
                guid,
                to_properties(&current),
                classifications,
                current.current_status(),
            )
            .await?;
        self.load(user_id, updated).await
    }

    async fn delete(&self, user_id: &str, guid: &str, is_purge: bool) -> Result<Option<Node>> {
        self.entity(user_id, guid).await?;

        if is_purge {
            self.repository.purge_entity(user_id, guid).await?;
            return match self.repository.get_entity(user_id, guid).await {
                Err(RepositoryError::EntityNotKnown { .. }) => Ok(None),
                Ok(_) => Err(SubjectAreaError::InstanceNotPurged {
                    guid: guid.to_string(),
                }),
                Err(e) => Err(e.into()),
            };
        }

        let deleted = self.repository.delete_entity(user_id, guid).await?;
        if deleted.header.status != Status::Deleted {
            return Err(SubjectAreaError::InstanceNotDeleted {
                guid: guid.to_string(),
            });
        }
        self.load(user_id, deleted).await.map(Some)
    }

    async fn restore(&self, user_id: &str, guid: &str) -> Result<Node> {
        self.entity(user_id, guid).await?;
        if let Some(anchor) = self.kind.glossary_anchor() {
            let query = RelationshipQuery {
                include_deleted_entity: true,
                ..RelationshipQuery::of_type(anchor.type_name())
            };
            let anchored = self
                .repository
                .get_relationships_for_entity(user_id, guid, &query)
                .await?
                .iter()
                .any(|relationship| relationship.end2.guid == guid);
            if !anchored {
                return Err(SubjectAreaError::invalid_parameter(
                    "guid",
                    format!("{} '{}' has no live glossary to be restored into", self.kind, guid),
                ));
            }
        }
        let restored = self.repository.restore_entity(user_id, guid).await?;
        self.load(user_id, restored).await
    }

    async fn get_lines(
        &self,
        user_id: &str,
        guid: &str,
        line_kind: Option<LineKind>,
        request: &FindRequest,
    ) -> Result<Vec<Line>> {
        self.entity(user_id, guid).await?;
        let type_name = line_kind.map(|kind| kind.type_name());
        let lines = self
            .relationships(user_id, guid, type_name, request)
            .await?
            .iter()
            .filter_map(|relationship| {
                LineKind::ALL
                    .into_iter()
                    .find(|kind| kind.type_name() == relationship.header.type_name)
                    .map(|kind| kind.mapper().from_wire(relationship))
            })
            .collect();
        Ok(page(lines, request))
    }

    async fn get_owned_lines(
        &self,
        user_id: &str,
        guid: &str,
        line_kind: LineKind,
    ) -> Result<Vec<Line>> {
        self.entity(user_id, guid).await?;
        let query = RelationshipQuery {
            include_deleted_entity: true,
            ..RelationshipQuery::of_type(line_kind.type_name())
        };
        Ok(self
            .repository
            .get_relationships_for_entity(user_id, guid, &query)
            .await?
            .iter()
            .filter(|relationship| relationship.end1.guid == guid)
            .map(|relationship| line_kind.mapper().from_wire(relationship))
            .collect())
    }

    async fn get_related(
        &self,
        user_id: &str,
        guid: &str,
        via: LineKind,
        request: &FindRequest,
    ) -> Result<Vec<Node>> {
        self.entity(user_id, guid).await?;
        let mapper = via.mapper();
        let owning = mapper.end1_kinds().contains(&self.kind);

        let others: Vec<String> = self
            .relationships(user_id, guid, Some(mapper.type_name()), request)
            .await?
            .into_iter()
            .filter_map(|relationship| {
                if owning && relationship.end1.guid == guid {
                    Some(relationship.end2.guid)
                } else if !owning && relationship.end2.guid == guid {
                    Some(relationship.end1.guid)
                } else {
                    None
                }
            })
            .collect();

        let mut nodes = Vec::new();
        for other in page(others, request) {
            let entity = self.repository.get_entity(user_id, &other).await?;
            nodes.push(self.load(user_id, entity).await?);
        }
        Ok(nodes)
    }

    async fn get_related_media(&self, user_id: &str, guid: &str) -> Result<Vec<RelatedMedia>> {
        let request = FindRequest {
            sequencing_order: SequencingOrder::Any,
            ..FindRequest::default()
        };
        let relationships = self
            .relationships(user_id, guid, Some(MEDIA_REFERENCE_TYPE), &request)
            .await?;

        let mut media = Vec::new();
        for relationship in relationships.iter().filter(|r| r.end1.guid == guid) {
            let entity = self
                .repository
                .get_entity(user_id, &relationship.end2.guid)
                .await?;
            media.extend(media_from_entity(&entity));
        }
        Ok(media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRepository;

    fn handlers() -> (RepositoryNodeHandler, RepositoryNodeHandler, Arc<InMemoryRepository>) {
        let repository = Arc::new(InMemoryRepository::default());
        (
            RepositoryNodeHandler::new(NodeKind::Glossary, repository.clone()),
            RepositoryNodeHandler::new(NodeKind::Term, repository.clone()),
            repository,
        )
    }

    #[tokio::test]
    async fn test_term_create_anchors_in_glossary() {
        let (glossaries, terms, _) = handlers();
        let glossary = glossaries
            .create("tester", Node::named(NodeKind::Glossary, "finance"))
            .await
            .unwrap();
        let glossary_guid = glossary.guid.clone().unwrap();

        let term = terms
            .create(
                "tester",
                Node {
                    glossary: Some(NodeSummary::new(glossary_guid.clone())),
                    ..Node::named(NodeKind::Term, "revenue")
                },
            )
            .await
            .unwrap();

        let anchor = term.glossary.unwrap();
        assert_eq!(anchor.guid, glossary_guid);
        assert_eq!(anchor.name.as_deref(), Some("finance"));
        assert!(term
            .qualified_name
            .unwrap()
            .starts_with("GlossaryTerm.revenue@"));

        let content = glossaries
            .get_related("tester", &glossary_guid, LineKind::TermAnchor, &FindRequest::default())
            .await
            .unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].name.as_deref(), Some("revenue"));
    }

    #[tokio::test]
    async fn test_term_create_rejects_missing_glossary() {
        let (_, terms, repository) = handlers();
        let err = terms
            .create(
                "tester",
                Node {
                    glossary: Some(NodeSummary::new("no-such-glossary")),
                    ..Node::named(NodeKind::Term, "revenue")
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_unrecognized());
        assert_eq!(repository.entity_count(), 0);
    }

    #[tokio::test]
    async fn test_get_by_guid_checks_the_kind() {
        let (glossaries, terms, _) = handlers();
        let glossary = glossaries
            .create("tester", Node::named(NodeKind::Glossary, "finance"))
            .await
            .unwrap();
        let err = terms
            .get_by_guid("tester", glossary.guid.as_deref().unwrap())
            .await
            .unwrap_err();
        assert!(err.is_unrecognized());
    }

    #[tokio::test]
    async fn test_get_by_name_is_exact() {
        let (glossaries, _, _) = handlers();
        for name in ["finance", "finance-archive", "Finance"] {
            glossaries
                .create("tester", Node::named(NodeKind::Glossary, name))
                .await
                .unwrap();
        }

        let found = glossaries.get_by_name("tester", "finance").await.unwrap();
        assert_eq!(found.len(), 1);

        let err = glossaries.get_by_name("tester", "fin").await.unwrap_err();
        assert!(err.is_unrecognized());
    }

    #[tokio::test]
    async fn test_invalid_search_expression() {
        let (glossaries, _, _) = handlers();
        let err = glossaries
            .find("tester", &FindRequest::matching("(unclosed"), false, false)
            .await
            .unwrap_err();
        assert_eq!(err.parameter(), Some("searchCriteria"));
    }
}
