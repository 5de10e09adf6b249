use crate::model::{Guid, Status};
use crate::store::{
    EntityQuery, InstanceProperties, RelationshipQuery, RepositoryClassification,
    RepositoryEntity, RepositoryRelationship, RepositoryResult,
};

/// Entity primitives of a metadata repository connector.
///
/// `get_entity` returns soft-deleted entities; finds only return live ones.
/// Purged entities are gone and report `EntityNotKnown`.
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    async fn add_entity(
        &self,
        user_id: &str,
        type_name: &str,
        properties: InstanceProperties,
        classifications: Vec<RepositoryClassification>,
        status: Status,
    ) -> RepositoryResult<RepositoryEntity>;
    async fn get_entity(&self, user_id: &str, guid: &str) -> RepositoryResult<RepositoryEntity>;
    async fn find_entities(
        &self,
        user_id: &str,
        type_name: &str,
        query: &EntityQuery,
    ) -> RepositoryResult<Vec<RepositoryEntity>>;
    /// Replaces the properties, classifications and status of an entity.
    async fn update_entity(
        &self,
        user_id: &str,
        guid: &str,
        properties: InstanceProperties,
        classifications: Vec<RepositoryClassification>,
        status: Status,
    ) -> RepositoryResult<RepositoryEntity>;
    async fn delete_entity(&self, user_id: &str, guid: &str) -> RepositoryResult<RepositoryEntity>;
    /// Removes the entity and every relationship attached to it.
    async fn purge_entity(&self, user_id: &str, guid: &str) -> RepositoryResult<()>;
    async fn restore_entity(&self, user_id: &str, guid: &str) -> RepositoryResult<RepositoryEntity>;
}

/// Relationship primitives of a metadata repository connector.
#[async_trait::async_trait]
pub trait RelationshipStore: Send + Sync {
    async fn add_relationship(
        &self,
        user_id: &str,
        type_name: &str,
        end1: &Guid,
        end2: &Guid,
        properties: InstanceProperties,
        status: Status,
    ) -> RepositoryResult<RepositoryRelationship>;
    async fn get_relationship(
        &self,
        user_id: &str,
        guid: &str,
    ) -> RepositoryResult<RepositoryRelationship>;
    async fn update_relationship(
        &self,
        user_id: &str,
        guid: &str,
        properties: InstanceProperties,
        status: Status,
    ) -> RepositoryResult<RepositoryRelationship>;
    async fn delete_relationship(
        &self,
        user_id: &str,
        guid: &str,
    ) -> RepositoryResult<RepositoryRelationship>;
    async fn purge_relationship(&self, user_id: &str, guid: &str) -> RepositoryResult<()>;
    async fn restore_relationship(
        &self,
        user_id: &str,
        guid: &str,
    ) -> RepositoryResult<RepositoryRelationship>;
    /// Live relationships attached to an entity. A relationship is live when
    /// it and both of its ends are live.
    async fn get_relationships_for_entity(
        &self,
        user_id: &str,
        entity_guid: &str,
        query: &RelationshipQuery,
    ) -> RepositoryResult<Vec<RepositoryRelationship>>;
}

pub trait MetadataRepository: EntityStore + RelationshipStore + Send + Sync {}
impl<T: EntityStore + RelationshipStore + Send + Sync> MetadataRepository for T {}
