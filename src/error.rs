use crate::model::{ErrorKind, Guid, NodeKind, Status};
use crate::store::RepositoryError;

pub type Result<T, E = SubjectAreaError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Guid,
    Name,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierKind::Guid => f.write_str("guid"),
            IdentifierKind::Name => f.write_str("name"),
        }
    }
}

/// Failures raised by the validation gate, instance router and handlers.
#[derive(Debug, thiserror::Error)]
pub enum SubjectAreaError {
    #[error("invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("user '{user_id}' is not authorized to use server '{server_name}'")]
    UserNotAuthorized { user_id: String, server_name: String },

    #[error("the metadata server is unreachable: {reason}")]
    MetadataServerUnreachable { reason: String },

    #[error("unrecognized {identifier} '{value}'")]
    UnrecognizedIdentifier {
        identifier: IdentifierKind,
        value: String,
    },

    #[error("function '{function}' is not supported by the metadata repository")]
    FunctionNotSupported { function: String },

    #[error("status {status} is not supported here: {message}")]
    StatusNotSupported { status: Status, message: String },

    #[error("classification '{classification}' could not be applied: {message}")]
    Classification {
        classification: String,
        message: String,
    },

    #[error("instance '{guid}' is not deleted")]
    InstanceNotDeleted { guid: Guid },

    #[error("instance '{guid}' was not purged")]
    InstanceNotPurged { guid: Guid },

    #[error("{kind} '{guid}' cannot be deleted while it has content")]
    ContentPreventedDelete { kind: NodeKind, guid: Guid },

    #[error("property server error: {message}")]
    PropertyServerError { message: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Static description of how an error kind is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub http_code: u16,
    pub error_id: &'static str,
    pub system_action: &'static str,
    pub user_action: &'static str,
}

impl SubjectAreaError {
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        SubjectAreaError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn unrecognized_guid(guid: impl Into<String>) -> Self {
        SubjectAreaError::UnrecognizedIdentifier {
            identifier: IdentifierKind::Guid,
            value: guid.into(),
        }
    }

    pub fn unrecognized_name(name: impl Into<String>) -> Self {
        SubjectAreaError::UnrecognizedIdentifier {
            identifier: IdentifierKind::Name,
            value: name.into(),
        }
    }

    pub fn property_server(message: impl Into<String>) -> Self {
        SubjectAreaError::PropertyServerError {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.descriptor().kind
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, SubjectAreaError::UnrecognizedIdentifier { .. })
    }

    /// Name of the offending request parameter, when there is one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            SubjectAreaError::InvalidParameter { parameter, .. } => Some(parameter),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        match self {
            SubjectAreaError::InvalidParameter { .. } => ErrorDescriptor {
                kind: ErrorKind::InvalidParameter,
                http_code: 400,
                error_id: "OMAS-SUBJECT-AREA-400-001",
                system_action: "The system is unable to process the request because a parameter is missing or invalid.",
                user_action: "Correct the named parameter and retry the request.",
            },
            SubjectAreaError::StatusNotSupported { .. } => ErrorDescriptor {
                kind: ErrorKind::StatusNotSupported,
                http_code: 400,
                error_id: "OMAS-SUBJECT-AREA-400-002",
                system_action: "The system rejected the requested status change.",
                user_action: "Use delete to remove an instance; supply a live status on create and update.",
            },
            SubjectAreaError::Classification { .. } => ErrorDescriptor {
                kind: ErrorKind::ClassificationError,
                http_code: 400,
                error_id: "OMAS-SUBJECT-AREA-400-003",
                system_action: "The system did not change the classifications of the instance.",
                user_action: "Supply only classifications that are valid for this type of node.",
            },
            SubjectAreaError::UserNotAuthorized { .. } => ErrorDescriptor {
                kind: ErrorKind::UserNotAuthorized,
                http_code: 403,
                error_id: "OMAS-SUBJECT-AREA-403-001",
                system_action: "The system refused the request because the user is not authorized for this server.",
                user_action: "Ask the server administrator to grant access to this user.",
            },
            SubjectAreaError::UnrecognizedIdentifier { .. } => ErrorDescriptor {
                kind: ErrorKind::UnrecognizedIdentifier,
                http_code: 404,
                error_id: "OMAS-SUBJECT-AREA-404-001",
                system_action: "The system could not find an instance with the supplied identifier.",
                user_action: "Check the identifier; the instance may have been purged.",
            },
            SubjectAreaError::ContentPreventedDelete { .. } => ErrorDescriptor {
                kind: ErrorKind::ContentPreventedDelete,
                http_code: 409,
                error_id: "OMAS-SUBJECT-AREA-409-001",
                system_action: "The system did not delete the instance because it still owns live content.",
                user_action: "Delete the owned content first, then retry the delete.",
            },
            SubjectAreaError::InstanceNotDeleted { .. } => ErrorDescriptor {
                kind: ErrorKind::InstanceNotDeleted,
                http_code: 409,
                error_id: "OMAS-SUBJECT-AREA-409-002",
                system_action: "The instance is not in the deleted state.",
                user_action: "Only soft-deleted instances can be restored.",
            },
            SubjectAreaError::InstanceNotPurged { .. } => ErrorDescriptor {
                kind: ErrorKind::InstanceNotPurged,
                http_code: 500,
                error_id: "OMAS-SUBJECT-AREA-500-002",
                system_action: "The metadata repository did not confirm the purge.",
                user_action: "Retry the purge and check the repository logs.",
            },
            SubjectAreaError::PropertyServerError { .. } => ErrorDescriptor {
                kind: ErrorKind::PropertyServerError,
                http_code: 500,
                error_id: "OMAS-SUBJECT-AREA-500-003",
                system_action: "The server configuration is inconsistent and the request was not processed.",
                user_action: "Report this to the server administrator.",
            },
            SubjectAreaError::Unexpected(_) => ErrorDescriptor {
                kind: ErrorKind::InternalError,
                http_code: 500,
                error_id: "OMAS-SUBJECT-AREA-500-001",
                system_action: "An unexpected error occurred and the request was abandoned.",
                user_action: "Report this to the server administrator; the details are in the server log.",
            },
            SubjectAreaError::FunctionNotSupported { .. } => ErrorDescriptor {
                kind: ErrorKind::FunctionNotSupported,
                http_code: 501,
                error_id: "OMAS-SUBJECT-AREA-501-001",
                system_action: "The metadata repository does not support the requested function.",
                user_action: "Use a supported alternative, for example purge instead of soft delete.",
            },
            SubjectAreaError::MetadataServerUnreachable { .. } => ErrorDescriptor {
                kind: ErrorKind::MetadataServerUnreachable,
                http_code: 503,
                error_id: "OMAS-SUBJECT-AREA-503-001",
                system_action: "The system could not reach the metadata repository.",
                user_action: "Check that the metadata server is running and retry.",
            },
        }
    }
}

impl From<RepositoryError> for SubjectAreaError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::EntityNotKnown { guid }
            | RepositoryError::RelationshipNotKnown { guid } => {
                SubjectAreaError::unrecognized_guid(guid)
            }
            RepositoryError::NotDeleted { guid } => SubjectAreaError::InstanceNotDeleted { guid },
            RepositoryError::AlreadyDeleted { guid } => SubjectAreaError::invalid_parameter(
                "guid",
                format!("instance '{}' is already deleted", guid),
            ),
            RepositoryError::EntityDeleted { guid } => SubjectAreaError::invalid_parameter(
                "guid",
                format!("instance '{}' is deleted", guid),
            ),
            RepositoryError::FunctionNotSupported { function } => {
                SubjectAreaError::FunctionNotSupported { function }
            }
            RepositoryError::Unavailable { reason } => {
                SubjectAreaError::MetadataServerUnreachable { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_to_kinds() {
        let err: SubjectAreaError = RepositoryError::EntityNotKnown {
            guid: "g".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedIdentifier);

        let err: SubjectAreaError = RepositoryError::Unavailable {
            reason: "down".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::MetadataServerUnreachable);
        assert_eq!(err.descriptor().http_code, 503);

        let err: SubjectAreaError = RepositoryError::NotDeleted {
            guid: "g".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InstanceNotDeleted);
    }

    #[test]
    fn test_error_ids_are_unique() {
        let errors = vec![
            SubjectAreaError::invalid_parameter("userId", "missing"),
            SubjectAreaError::UserNotAuthorized {
                user_id: "u".to_string(),
                server_name: "s".to_string(),
            },
            SubjectAreaError::MetadataServerUnreachable {
                reason: "r".to_string(),
            },
            SubjectAreaError::unrecognized_guid("g"),
            SubjectAreaError::FunctionNotSupported {
                function: "f".to_string(),
            },
            SubjectAreaError::StatusNotSupported {
                status: Status::Deleted,
                message: "m".to_string(),
            },
            SubjectAreaError::Classification {
                classification: "c".to_string(),
                message: "m".to_string(),
            },
            SubjectAreaError::InstanceNotDeleted {
                guid: "g".to_string(),
            },
            SubjectAreaError::InstanceNotPurged {
                guid: "g".to_string(),
            },
            SubjectAreaError::ContentPreventedDelete {
                kind: NodeKind::Glossary,
                guid: "g".to_string(),
            },
            SubjectAreaError::property_server("p"),
            SubjectAreaError::Unexpected(anyhow::anyhow!("boom")),
        ];
        let mut ids: Vec<&str> = errors.iter().map(|e| e.descriptor().error_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), errors.len());
    }
}
