use std::sync::Arc;

use crate::error::{Result, SubjectAreaError};
use crate::handler::line_mapper::LineMapper;
use crate::handler::traits::LineHandler;
use crate::model::{Line, LineKind, NodeKind, Status};
use crate::store::{MetadataRepository, RepositoryError, RepositoryRelationship};

/// Line handler that maps one line kind onto repository relationships.
pub struct RepositoryLineHandler {
    kind: LineKind,
    repository: Arc<dyn MetadataRepository>,
}

impl RepositoryLineHandler {
    pub fn new(kind: LineKind, repository: Arc<dyn MetadataRepository>) -> Self {
        Self { kind, repository }
    }

    fn mapper(&self) -> &'static dyn LineMapper {
        self.kind.mapper()
    }

    async fn relationship(&self, user_id: &str, guid: &str) -> Result<RepositoryRelationship> {
        let relationship = self.repository.get_relationship(user_id, guid).await?;
        if relationship.header.type_name != self.mapper().type_name() {
            return Err(SubjectAreaError::unrecognized_guid(guid));
        }
        Ok(relationship)
    }

    /// Checks that the node at one end is of a kind this line accepts there.
    async fn check_end(
        &self,
        user_id: &str,
        guid: &str,
        allowed: &[NodeKind],
        parameter: &str,
    ) -> Result<()> {
        let entity = self.repository.get_entity(user_id, guid).await?;
        let accepted = NodeKind::from_type_name(&entity.header.type_name)
            .map(|kind| allowed.contains(&kind))
            .unwrap_or(false);
        if !accepted {
            return Err(SubjectAreaError::invalid_parameter(
                parameter,
                format!(
                    "a {} cannot be at {} of a {} relationship",
                    entity.header.type_name, parameter, self.kind
                ),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl LineHandler for RepositoryLineHandler {
    fn kind(&self) -> LineKind {
        self.kind
    }

    async fn create(&self, user_id: &str, line: Line) -> Result<Line> {
        let mapper = self.mapper();
        let (Some(end1), Some(end2)) = (line.end1_guid(), line.end2_guid()) else {
            return Err(SubjectAreaError::invalid_parameter(
                "end1",
                "both ends of a relationship are required",
            ));
        };
        self.check_end(user_id, end1, mapper.end1_kinds(), "end1").await?;
        self.check_end(user_id, end2, mapper.end2_kinds(), "end2").await?;

        let relationship = self
            .repository
            .add_relationship(
                user_id,
                mapper.type_name(),
                &end1.to_string(),
                &end2.to_string(),
                mapper.to_wire(&line),
                line.current_status(),
            )
            .await?;
        log::debug!("Created {} '{}'", self.kind, relationship.header.guid);
        Ok(mapper.from_wire(&relationship))
    }

    async fn get_by_guid(&self, user_id: &str, guid: &str) -> Result<Line> {
        let relationship = self.relationship(user_id, guid).await?;
        Ok(self.mapper().from_wire(&relationship))
    }

    async fn update(
        &self,
        user_id: &str,
        guid: &str,
        line: Line,
        is_replace: bool,
    ) -> Result<Line> {
        let mapper = self.mapper();
        let mut current = mapper.from_wire(&self.relationship(user_id, guid).await?);
        current.apply_update(line, is_replace);

        let updated = self
            .repository
            .update_relationship(
                user_id,
                guid,
                mapper.to_wire(&current),
                current.current_status(),
            )
            .await?;
        Ok(mapper.from_wire(&updated))
    }

    async fn delete(&self, user_id: &str, guid: &str, is_purge: bool) -> Result<Option<Line>> {
        self.relationship(user_id, guid).await?;

        if is_purge {
            self.repository.purge_relationship(user_id, guid).await?;
            return match self.repository.get_relationship(user_id, guid).await {
                Err(RepositoryError::RelationshipNotKnown { .. }) => Ok(None),
                Ok(_) => Err(SubjectAreaError::InstanceNotPurged {
                    guid: guid.to_string(),
                }),
                Err(e) => Err(e.into()),
            };
        }

        let deleted = self.repository.delete_relationship(user_id, guid).await?;
        if deleted.header.status != Status::Deleted {
            return Err(SubjectAreaError::InstanceNotDeleted {
                guid: guid.to_string(),
            });
        }
        Ok(Some(self.mapper().from_wire(&deleted)))
    }

    async fn restore(&self, user_id: &str, guid: &str) -> Result<Line> {
        self.relationship(user_id, guid).await?;
        let restored = self.repository.restore_relationship(user_id, guid).await?;
        Ok(self.mapper().from_wire(&restored))
    }
}
