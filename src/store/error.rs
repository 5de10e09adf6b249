use crate::model::Guid;

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Failures reported by a metadata repository connector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("entity '{guid}' is not known to the repository")]
    EntityNotKnown { guid: Guid },

    #[error("relationship '{guid}' is not known to the repository")]
    RelationshipNotKnown { guid: Guid },

    #[error("instance '{guid}' is not deleted")]
    NotDeleted { guid: Guid },

    #[error("instance '{guid}' is already deleted")]
    AlreadyDeleted { guid: Guid },

    #[error("entity '{guid}' is deleted")]
    EntityDeleted { guid: Guid },

    #[error("function '{function}' is not supported")]
    FunctionNotSupported { function: String },

    #[error("repository unavailable: {reason}")]
    Unavailable { reason: String },
}
