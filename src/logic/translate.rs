//! Turns operation outcomes into response envelopes.

use crate::error::{Result, SubjectAreaError};
use crate::model::{ErrorResponse, OmasResponse};

/// Names the component and operation an envelope reports errors against.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub component: String,
    pub operation: String,
}

impl OperationContext {
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            operation: operation.into(),
        }
    }
}

pub fn error_response(context: &OperationContext, error: &SubjectAreaError) -> ErrorResponse {
    let descriptor = error.descriptor();
    let message = match error {
        SubjectAreaError::Unexpected(e) => {
            log::error!(
                "{}.{} failed unexpectedly: {:#}",
                context.component,
                context.operation,
                e
            );
            format!("{} failed because of an internal error", context.operation)
        }
        checked => {
            log::warn!("{}.{} failed: {}", context.component, context.operation, checked);
            checked.to_string()
        }
    };
    ErrorResponse {
        kind: descriptor.kind,
        http_code: descriptor.http_code,
        error_id: descriptor.error_id.to_string(),
        class_name: context.component.clone(),
        operation: context.operation.clone(),
        message,
        system_action: descriptor.system_action.to_string(),
        user_action: descriptor.user_action.to_string(),
        parameter: error.parameter().map(str::to_string),
    }
}

/// Envelope for a failure that never reached a dispatcher, such as a panic
/// or an unreadable request body.
pub fn internal_error<T>(
    context: &OperationContext,
    message: impl Into<String>,
) -> OmasResponse<T> {
    failure(
        context,
        SubjectAreaError::Unexpected(anyhow::anyhow!(message.into())),
    )
}

pub fn failure<T>(context: &OperationContext, error: SubjectAreaError) -> OmasResponse<T> {
    OmasResponse::Error {
        error: error_response(context, &error),
    }
}

pub fn single<T>(context: &OperationContext, result: Result<T>) -> OmasResponse<T> {
    match result {
        Ok(result) => OmasResponse::Single { result },
        Err(e) => failure(context, e),
    }
}

pub fn list<T>(context: &OperationContext, result: Result<Vec<T>>) -> OmasResponse<T> {
    match result {
        Ok(results) => OmasResponse::List { results },
        Err(e) => failure(context, e),
    }
}

/// `Some` becomes a single result and `None` an empty success.
pub fn optional<T>(context: &OperationContext, result: Result<Option<T>>) -> OmasResponse<T> {
    match result {
        Ok(Some(result)) => OmasResponse::Single { result },
        Ok(None) => OmasResponse::Void,
        Err(e) => failure(context, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorKind;

    fn context() -> OperationContext {
        OperationContext::new("GlossaryDispatcher", "getGlossary")
    }

    #[test]
    fn test_checked_error_keeps_message_and_parameter() {
        let response: OmasResponse<String> = single(
            &context(),
            Err(SubjectAreaError::invalid_parameter("guid", "a guid must be supplied")),
        );
        let error = response.error().unwrap();
        assert_eq!(error.kind, ErrorKind::InvalidParameter);
        assert_eq!(error.http_code, 400);
        assert_eq!(error.error_id, "OMAS-SUBJECT-AREA-400-001");
        assert_eq!(error.class_name, "GlossaryDispatcher");
        assert_eq!(error.operation, "getGlossary");
        assert_eq!(error.parameter.as_deref(), Some("guid"));
        assert!(error.message.contains("a guid must be supplied"));
    }

    #[test]
    fn test_unexpected_error_hides_detail() {
        let response: OmasResponse<String> = single(
            &context(),
            Err(SubjectAreaError::Unexpected(anyhow::anyhow!("secret connection string"))),
        );
        let error = response.error().unwrap();
        assert_eq!(error.kind, ErrorKind::InternalError);
        assert_eq!(error.http_code, 500);
        assert!(!error.message.contains("secret"));
    }

    #[test]
    fn test_outcomes() {
        let found: OmasResponse<u8> = optional(&context(), Ok(Some(1)));
        assert_eq!(found.result(), Some(&1));
        let purged: OmasResponse<u8> = optional(&context(), Ok(None));
        assert_eq!(purged, OmasResponse::Void);
        let empty: OmasResponse<u8> = list(&context(), Ok(Vec::new()));
        assert_eq!(empty.results(), Some(&[][..]));
        assert_eq!(empty.http_code(), 200);
    }
}
