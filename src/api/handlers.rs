use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SubjectAreaError;
use crate::logic::translate::{self, OperationContext};
use crate::logic::SubjectAreaGateway;
use crate::model::{FindRequest, Line, LineKind, Node, NodeKind, OmasResponse, SequencingOrder};

pub type AppState = Arc<SubjectAreaGateway>;

const COMPONENT: &str = "SubjectAreaRestServices";

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

impl<T: Serialize> IntoResponse for OmasResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Converts a panic in a request handler into an internal-error envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    let context = OperationContext::new(COMPONENT, "request");
    translate::internal_error::<()>(&context, detail).into_response()
}

#[derive(Debug, Deserialize)]
pub struct UserPath {
    pub server: String,
    pub user: String,
}

#[derive(Debug, Deserialize)]
pub struct InstancePath {
    pub server: String,
    pub user: String,
    pub guid: String,
}

#[derive(Debug, Deserialize)]
pub struct LinePath {
    pub server: String,
    pub user: String,
    pub line_kind: String,
}

#[derive(Debug, Deserialize)]
pub struct LineInstancePath {
    pub server: String,
    pub user: String,
    pub line_kind: String,
    pub guid: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuery {
    #[serde(default)]
    pub is_replace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    #[serde(default)]
    pub is_purge: bool,
}

/// Find parameters as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindQuery {
    pub search_criteria: Option<String>,
    pub as_of_time: Option<DateTime<Utc>>,
    pub starting_from: Option<i32>,
    pub page_size: Option<i32>,
    pub sequencing_order: Option<SequencingOrder>,
    pub sequencing_property: Option<String>,
    #[serde(default)]
    pub exact_value: bool,
    #[serde(default)]
    pub ignore_case: bool,
}

impl FindQuery {
    pub fn to_request(&self) -> FindRequest {
        FindRequest {
            search_criteria: self.search_criteria.clone(),
            as_of_time: self.as_of_time,
            starting_from: self.starting_from.unwrap_or(0),
            page_size: self.page_size,
            sequencing_order: self.sequencing_order.unwrap_or_default(),
            sequencing_property: self.sequencing_property.clone(),
        }
    }
}

fn context(operation: String) -> OperationContext {
    OperationContext::new(COMPONENT, operation)
}

fn bad_body<T>(operation: String, rejection: JsonRejection) -> OmasResponse<T> {
    translate::failure(
        &context(operation),
        SubjectAreaError::invalid_parameter("body", rejection.body_text()),
    )
}

fn bad_query<T>(operation: String, rejection: QueryRejection) -> OmasResponse<T> {
    translate::failure(
        &context(operation),
        SubjectAreaError::invalid_parameter("query", rejection.body_text()),
    )
}

fn line_kind(operation: &str, segment: &str) -> Result<LineKind, OmasResponse<Line>> {
    LineKind::from_str(segment).map_err(|message| {
        translate::failure(
            &context(operation.to_string()),
            SubjectAreaError::invalid_parameter("lineType", message),
        )
    })
}

// Node handlers. The kind comes from the route, see routes::node_routes.

pub async fn create_node(
    kind: NodeKind,
    State(gateway): State<AppState>,
    Path(path): Path<UserPath>,
    body: Result<Json<Node>, JsonRejection>,
) -> OmasResponse<Node> {
    match body {
        Ok(Json(node)) => gateway.nodes(kind).create(&path.server, &path.user, node).await,
        Err(rejection) => bad_body(format!("create{}", kind.label()), rejection),
    }
}

pub async fn find_nodes(
    kind: NodeKind,
    State(gateway): State<AppState>,
    Path(path): Path<UserPath>,
    query: Result<Query<FindQuery>, QueryRejection>,
) -> OmasResponse<Node> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(format!("find{}", kind.label()), rejection),
    };
    gateway
        .nodes(kind)
        .find(
            &path.server,
            &path.user,
            &query.to_request(),
            query.exact_value,
            query.ignore_case,
        )
        .await
}

pub async fn get_node(
    kind: NodeKind,
    State(gateway): State<AppState>,
    Path(path): Path<InstancePath>,
) -> OmasResponse<Node> {
    gateway
        .nodes(kind)
        .get(&path.server, &path.user, &path.guid)
        .await
}

pub async fn update_node(
    kind: NodeKind,
    State(gateway): State<AppState>,
    Path(path): Path<InstancePath>,
    query: Result<Query<UpdateQuery>, QueryRejection>,
    body: Result<Json<Node>, JsonRejection>,
) -> OmasResponse<Node> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(format!("update{}", kind.label()), rejection),
    };
    match body {
        Ok(Json(node)) => {
            gateway
                .nodes(kind)
                .update(&path.server, &path.user, &path.guid, node, query.is_replace)
                .await
        }
        Err(rejection) => bad_body(format!("update{}", kind.label()), rejection),
    }
}

pub async fn delete_node(
    kind: NodeKind,
    State(gateway): State<AppState>,
    Path(path): Path<InstancePath>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> OmasResponse<Node> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(format!("delete{}", kind.label()), rejection),
    };
    gateway
        .nodes(kind)
        .delete(&path.server, &path.user, &path.guid, query.is_purge)
        .await
}

pub async fn restore_node(
    kind: NodeKind,
    State(gateway): State<AppState>,
    Path(path): Path<InstancePath>,
) -> OmasResponse<Node> {
    gateway
        .nodes(kind)
        .restore(&path.server, &path.user, &path.guid)
        .await
}

pub async fn node_relationships(
    kind: NodeKind,
    State(gateway): State<AppState>,
    Path(path): Path<InstancePath>,
    query: Result<Query<FindQuery>, QueryRejection>,
) -> OmasResponse<Line> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return bad_query(format!("get{}Relationships", kind.label()), rejection)
        }
    };
    gateway
        .nodes(kind)
        .relationships(&path.server, &path.user, &path.guid, &query.to_request())
        .await
}

pub async fn related_nodes(
    kind: NodeKind,
    via: LineKind,
    State(gateway): State<AppState>,
    Path(path): Path<InstancePath>,
    query: Result<Query<FindQuery>, QueryRejection>,
) -> OmasResponse<Node> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(format!("get{}{}", kind.label(), via), rejection),
    };
    gateway
        .nodes(kind)
        .related(&path.server, &path.user, &path.guid, via, &query.to_request())
        .await
}

// Line handlers. The kind is the `line_kind` path segment.

pub async fn create_line(
    State(gateway): State<AppState>,
    Path(path): Path<LinePath>,
    body: Result<Json<Line>, JsonRejection>,
) -> OmasResponse<Line> {
    let kind = match line_kind("createLine", &path.line_kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    match body {
        Ok(Json(line)) => {
            gateway
                .relationships(kind)
                .create(&path.server, &path.user, line)
                .await
        }
        Err(rejection) => bad_body(format!("create{}", kind), rejection),
    }
}

pub async fn get_line(
    State(gateway): State<AppState>,
    Path(path): Path<LineInstancePath>,
) -> OmasResponse<Line> {
    match line_kind("getLine", &path.line_kind) {
        Ok(kind) => {
            gateway
                .relationships(kind)
                .get(&path.server, &path.user, &path.guid)
                .await
        }
        Err(response) => response,
    }
}

pub async fn update_line(
    State(gateway): State<AppState>,
    Path(path): Path<LineInstancePath>,
    query: Result<Query<UpdateQuery>, QueryRejection>,
    body: Result<Json<Line>, JsonRejection>,
) -> OmasResponse<Line> {
    let kind = match line_kind("updateLine", &path.line_kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(format!("update{}", kind), rejection),
    };
    match body {
        Ok(Json(line)) => {
            gateway
                .relationships(kind)
                .update(&path.server, &path.user, &path.guid, line, query.is_replace)
                .await
        }
        Err(rejection) => bad_body(format!("update{}", kind), rejection),
    }
}

pub async fn delete_line(
    State(gateway): State<AppState>,
    Path(path): Path<LineInstancePath>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> OmasResponse<Line> {
    let kind = match line_kind("deleteLine", &path.line_kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_query(format!("delete{}", kind), rejection),
    };
    gateway
        .relationships(kind)
        .delete(&path.server, &path.user, &path.guid, query.is_purge)
        .await
}

pub async fn restore_line(
    State(gateway): State<AppState>,
    Path(path): Path<LineInstancePath>,
) -> OmasResponse<Line> {
    match line_kind("restoreLine", &path.line_kind) {
        Ok(kind) => {
            gateway
                .relationships(kind)
                .restore(&path.server, &path.user, &path.guid)
                .await
        }
        Err(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorKind;

    #[test]
    fn test_find_query_defaults() {
        let request = FindQuery::default().to_request();
        assert_eq!(request, FindRequest::default());
    }

    #[test]
    fn test_find_query_from_query_string() {
        let query: FindQuery = serde_json::from_value(serde_json::json!({
            "searchCriteria": "rev.*",
            "pageSize": 5,
            "sequencingOrder": "PROPERTY_ASCENDING",
            "sequencingProperty": "name",
            "ignoreCase": true
        }))
        .unwrap();
        let request = query.to_request();
        assert_eq!(request.page_size, Some(5));
        assert_eq!(request.sequencing_order, SequencingOrder::PropertyAscending);
        assert!(query.ignore_case);
        assert!(!query.exact_value);
    }

    #[test]
    fn test_unknown_line_kind() {
        let response = line_kind("getLine", "is-similar-to").unwrap_err();
        assert_eq!(response.error_kind(), Some(ErrorKind::InvalidParameter));
        assert_eq!(line_kind("getLine", "has-a").unwrap(), LineKind::HasA);
    }

    #[test]
    fn test_panic_becomes_internal_error() {
        let response = panic_response(Box::new("boom".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
