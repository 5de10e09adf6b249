use serde::{Deserialize, Serialize};

/// Discriminant of an error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidParameter,
    UserNotAuthorized,
    MetadataServerUnreachable,
    UnrecognizedIdentifier,
    FunctionNotSupported,
    StatusNotSupported,
    ClassificationError,
    InstanceNotDeleted,
    InstanceNotPurged,
    ContentPreventedDelete,
    PropertyServerError,
    InternalError,
}

/// Error payload of a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub http_code: u16,
    pub error_id: String,
    /// Component that raised the error.
    pub class_name: String,
    /// Operation that was being performed.
    pub operation: String,
    pub message: String,
    pub system_action: String,
    pub user_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// Every gateway operation answers with exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "responseCategory")]
pub enum OmasResponse<T> {
    Single { result: T },
    List { results: Vec<T> },
    Void,
    Error { error: ErrorResponse },
}

impl<T> OmasResponse<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, OmasResponse::Error { .. })
    }

    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            OmasResponse::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(|error| error.kind)
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            OmasResponse::Single { result } => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<T> {
        match self {
            OmasResponse::Single { result } => Some(result),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&[T]> {
        match self {
            OmasResponse::List { results } => Some(results),
            _ => None,
        }
    }

    pub fn http_code(&self) -> u16 {
        self.error().map(|error| error.http_code).unwrap_or(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_is_tagged() {
        let single: OmasResponse<String> = OmasResponse::Single {
            result: "x".to_string(),
        };
        let json = serde_json::to_value(&single).unwrap();
        assert_eq!(json["responseCategory"], "Single");
        assert_eq!(json["result"], "x");

        let void: OmasResponse<String> = OmasResponse::Void;
        let json = serde_json::to_value(&void).unwrap();
        assert_eq!(json, serde_json::json!({"responseCategory": "Void"}));
        assert_eq!(void.http_code(), 200);
    }
}
