use chrono::{DateTime, Utc};
use itertools::Itertools;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use crate::model::{generate_guid, Guid, SequencingOrder, Status};
use crate::store::{
    string_property, EntityProxy, EntityQuery, EntityStore, InstanceHeader, InstanceProperties,
    PageRequest, RelationshipQuery, RelationshipStore, RepositoryClassification, RepositoryEntity,
    RepositoryError, RepositoryRelationship, RepositoryResult,
};

/// Capabilities of the in-memory repository.
#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    pub soft_delete_supported: bool,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            soft_delete_supported: true,
        }
    }
}

trait Versionable: Clone {
    fn header(&self) -> &InstanceHeader;
    fn header_mut(&mut self) -> &mut InstanceHeader;
}

impl Versionable for RepositoryEntity {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut InstanceHeader {
        &mut self.header
    }
}

impl Versionable for RepositoryRelationship {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut InstanceHeader {
        &mut self.header
    }
}

/// Current version of an instance plus every version it replaced.
///
/// The history is never trimmed, so it grows by one entry per update for as
/// long as the instance exists.
#[derive(Debug)]
struct Versioned<T> {
    sequence: u64,
    current: T,
    history: Vec<T>,
}

impl<T: Versionable> Versioned<T> {
    fn new(sequence: u64, instance: T) -> Self {
        Self {
            sequence,
            current: instance,
            history: Vec::new(),
        }
    }

    fn at(&self, as_of_time: Option<DateTime<Utc>>) -> Option<&T> {
        match as_of_time {
            None => Some(&self.current),
            Some(time) if self.current.header().update_time <= time => Some(&self.current),
            Some(time) => self
                .history
                .iter()
                .rev()
                .find(|version| version.header().update_time <= time),
        }
    }

    /// Records a new version derived from the current one.
    fn advance(&mut self, user_id: &str, change: impl FnOnce(&mut T)) -> T {
        let mut next = self.current.clone();
        change(&mut next);
        next.header_mut().touch(user_id);
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
        self.current.clone()
    }
}

#[derive(Debug, Default)]
struct RepositoryState {
    next_sequence: u64,
    entities: HashMap<Guid, Versioned<RepositoryEntity>>,
    relationships: HashMap<Guid, Versioned<RepositoryRelationship>>,
}

impl RepositoryState {
    fn sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    fn entity_live_at(&self, guid: &str, as_of_time: Option<DateTime<Utc>>) -> bool {
        self.entities
            .get(guid)
            .and_then(|stored| stored.at(as_of_time))
            .map(|entity| entity.header.status.is_live())
            .unwrap_or(false)
    }

    fn proxy(&self, guid: &str) -> RepositoryResult<EntityProxy> {
        let stored = self
            .entities
            .get(guid)
            .ok_or_else(|| RepositoryError::EntityNotKnown {
                guid: guid.to_string(),
            })?;
        Ok(EntityProxy {
            guid: guid.to_string(),
            type_name: stored.current.header.type_name.clone(),
            name: stored.current.string_property("name"),
        })
    }

    /// Relationship with end names refreshed from the current entities.
    fn with_current_ends(
        &self,
        mut relationship: RepositoryRelationship,
    ) -> RepositoryRelationship {
        for end in [&mut relationship.end1, &mut relationship.end2] {
            if let Some(stored) = self.entities.get(&end.guid) {
                end.name = stored.current.string_property("name");
            }
        }
        relationship
    }
}

/// Repository connector that keeps every instance in process memory.
///
/// All reads and writes take the state lock for the duration of a single
/// primitive, so concurrent updates to one instance are last-write-wins.
#[derive(Debug)]
pub struct InMemoryRepository {
    options: RepositoryOptions,
    available: AtomicBool,
    state: RwLock<RepositoryState>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(RepositoryOptions::default())
    }
}

impl InMemoryRepository {
    pub fn new(options: RepositoryOptions) -> Self {
        Self {
            options,
            available: AtomicBool::new(true),
            state: RwLock::new(RepositoryState::default()),
        }
    }

    /// Simulates losing (or regaining) the connection to the repository.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, AtomicOrdering::SeqCst);
    }

    pub fn entity_count(&self) -> usize {
        self.state.read().entities.len()
    }

    fn ensure_available(&self) -> RepositoryResult<()> {
        if self.available.load(AtomicOrdering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::Unavailable {
                reason: "in-memory repository is offline".to_string(),
            })
        }
    }

    fn ensure_soft_delete(&self) -> RepositoryResult<()> {
        if self.options.soft_delete_supported {
            Ok(())
        } else {
            Err(RepositoryError::FunctionNotSupported {
                function: "soft delete".to_string(),
            })
        }
    }
}

fn compare_headers(
    order: SequencingOrder,
    a: &InstanceHeader,
    b: &InstanceHeader,
) -> Ordering {
    match order {
        SequencingOrder::Guid => a.guid.cmp(&b.guid),
        SequencingOrder::CreationDateRecent => b.create_time.cmp(&a.create_time),
        SequencingOrder::CreationDateOldest => a.create_time.cmp(&b.create_time),
        SequencingOrder::LastUpdateRecent => b.update_time.cmp(&a.update_time),
        SequencingOrder::LastUpdateOldest => a.update_time.cmp(&b.update_time),
        SequencingOrder::Any
        | SequencingOrder::PropertyAscending
        | SequencingOrder::PropertyDescending => Ordering::Equal,
    }
}

fn compare_properties(
    page: &PageRequest,
    a: &InstanceProperties,
    b: &InstanceProperties,
) -> Ordering {
    let Some(property) = page.order_property.as_deref() else {
        return Ordering::Equal;
    };
    let left = string_property(a, property);
    let right = string_property(b, property);
    // Instances without the property sort last in both directions.
    let ordering = match (&left, &right) {
        (Some(l), Some(r)) => l.cmp(r),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    match page.order {
        SequencingOrder::PropertyAscending => ordering,
        SequencingOrder::PropertyDescending => ordering.reverse(),
        _ => Ordering::Equal,
    }
}

/// Sorts `(sequence, instance)` pairs and cuts out the requested page.
/// Ties always fall back to creation order so results are repeatable.
fn page_of<T: Versionable>(
    page: &PageRequest,
    candidates: Vec<(u64, T)>,
    properties: impl Fn(&T) -> &InstanceProperties,
) -> Vec<T> {
    let sorted = candidates.into_iter().sorted_by(|(seq_a, a), (seq_b, b)| {
        compare_headers(page.order, a.header(), b.header())
            .then_with(|| compare_properties(page, properties(a), properties(b)))
            .then_with(|| seq_a.cmp(seq_b))
    });
    let skipped = sorted.skip(page.offset).map(|(_, instance)| instance);
    match page.limit {
        Some(limit) => skipped.take(limit).collect(),
        None => skipped.collect(),
    }
}

#[async_trait::async_trait]
impl EntityStore for InMemoryRepository {
    async fn add_entity(
        &self,
        user_id: &str,
        type_name: &str,
        properties: InstanceProperties,
        classifications: Vec<RepositoryClassification>,
        status: Status,
    ) -> RepositoryResult<RepositoryEntity> {
        self.ensure_available()?;
        let guid = generate_guid();
        let entity = RepositoryEntity {
            header: InstanceHeader::new(guid.clone(), type_name, status, user_id),
            properties,
            classifications,
        };

        let mut state = self.state.write();
        let sequence = state.sequence();
        state
            .entities
            .insert(guid, Versioned::new(sequence, entity.clone()));
        Ok(entity)
    }

    async fn get_entity(&self, _user_id: &str, guid: &str) -> RepositoryResult<RepositoryEntity> {
        self.ensure_available()?;
        self.state
            .read()
            .entities
            .get(guid)
            .map(|stored| stored.current.clone())
            .ok_or_else(|| RepositoryError::EntityNotKnown {
                guid: guid.to_string(),
            })
    }

    async fn find_entities(
        &self,
        _user_id: &str,
        type_name: &str,
        query: &EntityQuery,
    ) -> RepositoryResult<Vec<RepositoryEntity>> {
        self.ensure_available()?;
        let state = self.state.read();
        let candidates = state
            .entities
            .values()
            .filter_map(|stored| {
                stored
                    .at(query.page.as_of_time)
                    .map(|entity| (stored.sequence, entity))
            })
            .filter(|(_, entity)| {
                entity.header.type_name == type_name && entity.header.status.is_live()
            })
            .filter(|(_, entity)| match &query.matcher {
                Some(matcher) => entity
                    .properties
                    .values()
                    .filter_map(|value| value.as_str())
                    .any(|value| matcher.is_match(value)),
                None => true,
            })
            .map(|(sequence, entity)| (sequence, entity.clone()))
            .collect();

        Ok(page_of(&query.page, candidates, |entity| &entity.properties))
    }

    async fn update_entity(
        &self,
        user_id: &str,
        guid: &str,
        properties: InstanceProperties,
        classifications: Vec<RepositoryClassification>,
        status: Status,
    ) -> RepositoryResult<RepositoryEntity> {
        self.ensure_available()?;
        let mut state = self.state.write();
        let stored = state
            .entities
            .get_mut(guid)
            .ok_or_else(|| RepositoryError::EntityNotKnown {
                guid: guid.to_string(),
            })?;
        if !stored.current.header.status.is_live() {
            return Err(RepositoryError::EntityDeleted {
                guid: guid.to_string(),
            });
        }

        Ok(stored.advance(user_id, |entity| {
            entity.properties = properties;
            entity.classifications = classifications;
            entity.header.status = status;
        }))
    }

    async fn delete_entity(&self, user_id: &str, guid: &str) -> RepositoryResult<RepositoryEntity> {
        self.ensure_available()?;
        self.ensure_soft_delete()?;
        let mut state = self.state.write();
        let stored = state
            .entities
            .get_mut(guid)
            .ok_or_else(|| RepositoryError::EntityNotKnown {
                guid: guid.to_string(),
            })?;
        if !stored.current.header.status.is_live() {
            return Err(RepositoryError::AlreadyDeleted {
                guid: guid.to_string(),
            });
        }

        Ok(stored.advance(user_id, |entity| {
            entity.header.status_on_delete = Some(entity.header.status);
            entity.header.status = Status::Deleted;
        }))
    }

    async fn purge_entity(&self, _user_id: &str, guid: &str) -> RepositoryResult<()> {
        self.ensure_available()?;
        let mut state = self.state.write();
        if state.entities.remove(guid).is_none() {
            return Err(RepositoryError::EntityNotKnown {
                guid: guid.to_string(),
            });
        }
        state.relationships.retain(|_, stored| {
            stored.current.end1.guid != guid && stored.current.end2.guid != guid
        });
        Ok(())
    }

    async fn restore_entity(
        &self,
        user_id: &str,
        guid: &str,
    ) -> RepositoryResult<RepositoryEntity> {
        self.ensure_available()?;
        let mut state = self.state.write();
        let stored = state
            .entities
            .get_mut(guid)
            .ok_or_else(|| RepositoryError::EntityNotKnown {
                guid: guid.to_string(),
            })?;
        if stored.current.header.status.is_live() {
            return Err(RepositoryError::NotDeleted {
                guid: guid.to_string(),
            });
        }

        Ok(stored.advance(user_id, |entity| {
            entity.header.status = entity.header.status_on_delete.take().unwrap_or_default();
        }))
    }
}

#[async_trait::async_trait]
impl RelationshipStore for InMemoryRepository {
    async fn add_relationship(
        &self,
        user_id: &str,
        type_name: &str,
        end1: &Guid,
        end2: &Guid,
        properties: InstanceProperties,
        status: Status,
    ) -> RepositoryResult<RepositoryRelationship> {
        self.ensure_available()?;
        let mut state = self.state.write();
        let end1 = state.proxy(end1)?;
        let end2 = state.proxy(end2)?;
        for end in [&end1, &end2] {
            if !state.entity_live_at(&end.guid, None) {
                return Err(RepositoryError::EntityDeleted {
                    guid: end.guid.clone(),
                });
            }
        }

        let guid = generate_guid();
        let relationship = RepositoryRelationship {
            header: InstanceHeader::new(guid.clone(), type_name, status, user_id),
            end1,
            end2,
            properties,
        };
        let sequence = state.sequence();
        state
            .relationships
            .insert(guid, Versioned::new(sequence, relationship.clone()));
        Ok(relationship)
    }

    async fn get_relationship(
        &self,
        _user_id: &str,
        guid: &str,
    ) -> RepositoryResult<RepositoryRelationship> {
        self.ensure_available()?;
        let state = self.state.read();
        let relationship = state
            .relationships
            .get(guid)
            .map(|stored| stored.current.clone())
            .ok_or_else(|| RepositoryError::RelationshipNotKnown {
                guid: guid.to_string(),
            })?;
        Ok(state.with_current_ends(relationship))
    }

    async fn update_relationship(
        &self,
        user_id: &str,
        guid: &str,
        properties: InstanceProperties,
        status: Status,
    ) -> RepositoryResult<RepositoryRelationship> {
        self.ensure_available()?;
        let mut state = self.state.write();
        let stored = state
            .relationships
            .get_mut(guid)
            .ok_or_else(|| RepositoryError::RelationshipNotKnown {
                guid: guid.to_string(),
            })?;
        if !stored.current.header.status.is_live() {
            return Err(RepositoryError::AlreadyDeleted {
                guid: guid.to_string(),
            });
        }

        let updated = stored.advance(user_id, |relationship| {
            relationship.properties = properties;
            relationship.header.status = status;
        });
        Ok(state.with_current_ends(updated))
    }

    async fn delete_relationship(
        &self,
        user_id: &str,
        guid: &str,
    ) -> RepositoryResult<RepositoryRelationship> {
        self.ensure_available()?;
        self.ensure_soft_delete()?;
        let mut state = self.state.write();
        let stored = state
            .relationships
            .get_mut(guid)
            .ok_or_else(|| RepositoryError::RelationshipNotKnown {
                guid: guid.to_string(),
            })?;
        if !stored.current.header.status.is_live() {
            return Err(RepositoryError::AlreadyDeleted {
                guid: guid.to_string(),
            });
        }

        let deleted = stored.advance(user_id, |relationship| {
            relationship.header.status_on_delete = Some(relationship.header.status);
            relationship.header.status = Status::Deleted;
        });
        Ok(state.with_current_ends(deleted))
    }

    async fn purge_relationship(&self, _user_id: &str, guid: &str) -> RepositoryResult<()> {
        self.ensure_available()?;
        match self.state.write().relationships.remove(guid) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::RelationshipNotKnown {
                guid: guid.to_string(),
            }),
        }
    }

    async fn restore_relationship(
        &self,
        user_id: &str,
        guid: &str,
    ) -> RepositoryResult<RepositoryRelationship> {
        self.ensure_available()?;
        let mut state = self.state.write();
        let stored = state
            .relationships
            .get_mut(guid)
            .ok_or_else(|| RepositoryError::RelationshipNotKnown {
                guid: guid.to_string(),
            })?;
        if stored.current.header.status.is_live() {
            return Err(RepositoryError::NotDeleted {
                guid: guid.to_string(),
            });
        }

        let restored = stored.advance(user_id, |relationship| {
            relationship.header.status = relationship
                .header
                .status_on_delete
                .take()
                .unwrap_or_default();
        });
        Ok(state.with_current_ends(restored))
    }

    async fn get_relationships_for_entity(
        &self,
        _user_id: &str,
        entity_guid: &str,
        query: &RelationshipQuery,
    ) -> RepositoryResult<Vec<RepositoryRelationship>> {
        self.ensure_available()?;
        let state = self.state.read();
        if !state.entities.contains_key(entity_guid) {
            return Err(RepositoryError::EntityNotKnown {
                guid: entity_guid.to_string(),
            });
        }

        let as_of_time = query.page.as_of_time;
        let candidates = state
            .relationships
            .values()
            .filter_map(|stored| {
                stored
                    .at(as_of_time)
                    .map(|relationship| (stored.sequence, relationship))
            })
            .filter(|(_, relationship)| relationship.other_end(entity_guid).is_some())
            .filter(|(_, relationship)| match &query.type_name {
                Some(type_name) => &relationship.header.type_name == type_name,
                None => true,
            })
            .filter(|(_, relationship)| {
                let other_live = relationship
                    .other_end(entity_guid)
                    .map_or(false, |other| state.entity_live_at(&other.guid, as_of_time));
                relationship.header.status.is_live()
                    && other_live
                    && (query.include_deleted_entity
                        || state.entity_live_at(entity_guid, as_of_time))
            })
            .map(|(sequence, relationship)| {
                (sequence, state.with_current_ends(relationship.clone()))
            })
            .collect();

        Ok(page_of(&query.page, candidates, |relationship| {
            &relationship.properties
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    fn props(name: &str) -> InstanceProperties {
        let mut properties = InstanceProperties::new();
        properties.insert("name".to_string(), json!(name));
        properties
    }

    async fn add(repo: &InMemoryRepository, type_name: &str, name: &str) -> RepositoryEntity {
        repo.add_entity("tester", type_name, props(name), Vec::new(), Status::Draft)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_soft_delete_and_restore_keeps_prior_status() {
        let repo = InMemoryRepository::default();
        let entity = add(&repo, "Glossary", "finance").await;

        let deleted = repo.delete_entity("tester", &entity.header.guid).await.unwrap();
        assert_eq!(deleted.header.status, Status::Deleted);
        assert_eq!(deleted.header.status_on_delete, Some(Status::Draft));

        let restored = repo
            .restore_entity("tester", &entity.header.guid)
            .await
            .unwrap();
        assert_eq!(restored.header.status, Status::Draft);
        assert_eq!(restored.header.version, 3);
    }

    #[tokio::test]
    async fn test_restore_of_live_entity_is_rejected() {
        let repo = InMemoryRepository::default();
        let entity = add(&repo, "Glossary", "finance").await;

        let err = repo
            .restore_entity("tester", &entity.header.guid)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotDeleted { .. }));
    }

    #[tokio::test]
    async fn test_purge_removes_entity_and_relationships() {
        let repo = InMemoryRepository::default();
        let glossary = add(&repo, "Glossary", "finance").await;
        let term = add(&repo, "GlossaryTerm", "revenue").await;
        let anchor = repo
            .add_relationship(
                "tester",
                "TermAnchor",
                &glossary.header.guid,
                &term.header.guid,
                InstanceProperties::new(),
                Status::Active,
            )
            .await
            .unwrap();

        repo.purge_entity("tester", &term.header.guid).await.unwrap();

        assert!(matches!(
            repo.get_entity("tester", &term.header.guid).await,
            Err(RepositoryError::EntityNotKnown { .. })
        ));
        assert!(matches!(
            repo.get_relationship("tester", &anchor.header.guid).await,
            Err(RepositoryError::RelationshipNotKnown { .. })
        ));
    }

    #[tokio::test]
    async fn test_relationships_hidden_while_an_end_is_deleted() {
        let repo = InMemoryRepository::default();
        let glossary = add(&repo, "Glossary", "finance").await;
        let term = add(&repo, "GlossaryTerm", "revenue").await;
        repo.add_relationship(
            "tester",
            "TermAnchor",
            &glossary.header.guid,
            &term.header.guid,
            InstanceProperties::new(),
            Status::Active,
        )
        .await
        .unwrap();

        let query = RelationshipQuery::of_type("TermAnchor");
        let live = repo
            .get_relationships_for_entity("tester", &glossary.header.guid, &query)
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].end2.name.as_deref(), Some("revenue"));

        repo.delete_entity("tester", &term.header.guid).await.unwrap();
        let live = repo
            .get_relationships_for_entity("tester", &glossary.header.guid, &query)
            .await
            .unwrap();
        assert!(live.is_empty());

        repo.restore_entity("tester", &term.header.guid).await.unwrap();
        let live = repo
            .get_relationships_for_entity("tester", &glossary.header.guid, &query)
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_entity_still_sees_its_live_relationships() {
        let repo = InMemoryRepository::default();
        let glossary = add(&repo, "Glossary", "finance").await;
        let term = add(&repo, "GlossaryTerm", "revenue").await;
        repo.add_relationship(
            "tester",
            "TermAnchor",
            &glossary.header.guid,
            &term.header.guid,
            InstanceProperties::new(),
            Status::Active,
        )
        .await
        .unwrap();
        repo.delete_entity("tester", &glossary.header.guid).await.unwrap();

        let hidden = RelationshipQuery::of_type("TermAnchor");
        let live = repo
            .get_relationships_for_entity("tester", &glossary.header.guid, &hidden)
            .await
            .unwrap();
        assert!(live.is_empty());

        let query = RelationshipQuery {
            include_deleted_entity: true,
            ..hidden
        };
        let owned = repo
            .get_relationships_for_entity("tester", &glossary.header.guid, &query)
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);

        // the other end must still be live
        let seen_from_term = repo
            .get_relationships_for_entity("tester", &term.header.guid, &query)
            .await
            .unwrap();
        assert!(seen_from_term.is_empty());
    }

    #[tokio::test]
    async fn test_find_orders_filters_and_pages() {
        let repo = InMemoryRepository::default();
        for name in ["delta", "alpha", "charlie", "bravo"] {
            add(&repo, "GlossaryTerm", name).await;
        }
        add(&repo, "Glossary", "alphabet").await;

        let query = EntityQuery {
            matcher: None,
            page: PageRequest {
                order: SequencingOrder::PropertyAscending,
                order_property: Some("name".to_string()),
                offset: 1,
                limit: Some(2),
                ..PageRequest::default()
            },
        };
        let page = repo
            .find_entities("tester", "GlossaryTerm", &query)
            .await
            .unwrap();
        let names: Vec<String> = page
            .iter()
            .filter_map(|entity| entity.string_property("name"))
            .collect();
        assert_eq!(names, vec!["bravo", "charlie"]);

        let query = EntityQuery {
            matcher: Some(Regex::new("^alpha").unwrap()),
            page: PageRequest::default(),
        };
        let found = repo.find_entities("tester", "GlossaryTerm", &query).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_find_as_of_time_sees_old_version() {
        let repo = InMemoryRepository::default();
        let entity = add(&repo, "Glossary", "finance").await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let before_update = Utc::now();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.update_entity(
            "tester",
            &entity.header.guid,
            props("treasury"),
            Vec::new(),
            Status::Active,
        )
        .await
        .unwrap();

        let query = EntityQuery {
            matcher: None,
            page: PageRequest {
                as_of_time: Some(before_update),
                ..PageRequest::default()
            },
        };
        let found = repo.find_entities("tester", "Glossary", &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].string_property("name").as_deref(), Some("finance"));
    }

    #[tokio::test]
    async fn test_capabilities_and_availability() {
        let repo = InMemoryRepository::new(RepositoryOptions {
            soft_delete_supported: false,
        });
        let entity = add(&repo, "Glossary", "finance").await;
        assert!(matches!(
            repo.delete_entity("tester", &entity.header.guid).await,
            Err(RepositoryError::FunctionNotSupported { .. })
        ));

        repo.set_available(false);
        assert!(matches!(
            repo.get_entity("tester", &entity.header.guid).await,
            Err(RepositoryError::Unavailable { .. })
        ));
    }
}
