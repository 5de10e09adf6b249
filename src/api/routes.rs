use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::handlers::{
    self, AppState, DeleteQuery, FindQuery, InstancePath, UpdateQuery, UserPath,
};
use crate::model::{LineKind, Node, NodeKind};

pub const BASE_PATH: &str =
    "/servers/:server/open-metadata/access-services/subject-area/users/:user";

/// Collection routes for one node kind, with the kind bound into each handler.
fn node_routes(kind: NodeKind) -> Router<AppState> {
    let collection = format!("{}/{}", BASE_PATH, kind.collection());
    let instance = format!("{}/:guid", collection);

    let mut router = Router::new()
        .route(
            &collection,
            post(
                move |state: State<AppState>,
                      path: Path<UserPath>,
                      body: Result<Json<Node>, JsonRejection>| {
                    handlers::create_node(kind, state, path, body)
                },
            )
            .get(
                move |state: State<AppState>,
                      path: Path<UserPath>,
                      query: Result<Query<FindQuery>, QueryRejection>| {
                    handlers::find_nodes(kind, state, path, query)
                },
            ),
        )
        .route(
            &instance,
            get(move |state: State<AppState>, path: Path<InstancePath>| {
                handlers::get_node(kind, state, path)
            })
            .put(
                move |state: State<AppState>,
                      path: Path<InstancePath>,
                      query: Result<Query<UpdateQuery>, QueryRejection>,
                      body: Result<Json<Node>, JsonRejection>| {
                    handlers::update_node(kind, state, path, query, body)
                },
            )
            .delete(
                move |state: State<AppState>,
                      path: Path<InstancePath>,
                      query: Result<Query<DeleteQuery>, QueryRejection>| {
                    handlers::delete_node(kind, state, path, query)
                },
            ),
        )
        .route(
            &format!("{}/restore", instance),
            post(move |state: State<AppState>, path: Path<InstancePath>| {
                handlers::restore_node(kind, state, path)
            }),
        )
        .route(
            &format!("{}/relationships", instance),
            get(
                move |state: State<AppState>,
                      path: Path<InstancePath>,
                      query: Result<Query<FindQuery>, QueryRejection>| {
                    handlers::node_relationships(kind, state, path, query)
                },
            ),
        );

    for (segment, via) in related_collections(kind) {
        router = router.route(
            &format!("{}/{}", instance, segment),
            get(
                move |state: State<AppState>,
                      path: Path<InstancePath>,
                      query: Result<Query<FindQuery>, QueryRejection>| {
                    handlers::related_nodes(kind, *via, state, path, query)
                },
            ),
        );
    }
    router
}

/// Sub-collections reachable from a node, and the line kind that reaches them.
fn related_collections(kind: NodeKind) -> &'static [(&'static str, LineKind)] {
    match kind {
        NodeKind::Glossary => &[
            ("terms", LineKind::TermAnchor),
            ("categories", LineKind::CategoryAnchor),
        ],
        NodeKind::Category => &[
            ("terms", LineKind::TermCategorization),
            ("categories", LineKind::CategoryHierarchyLink),
        ],
        NodeKind::Term | NodeKind::Project => &[],
    }
}

pub fn create_router() -> Router<AppState> {
    let relationships = format!("{}/relationships/:line_kind", BASE_PATH);
    let relationship = format!("{}/:guid", relationships);

    let router = NodeKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(node_routes(kind)));

    router
        // Health check
        .route("/health", get(handlers::health_check))
        // Relationships
        .route(&relationships, post(handlers::create_line))
        .route(
            &relationship,
            get(handlers::get_line)
                .put(handlers::update_line)
                .delete(handlers::delete_line),
        )
        .route(
            &format!("{}/restore", relationship),
            post(handlers::restore_line),
        )
        .layer(ServiceBuilder::new().layer(CatchPanicLayer::custom(handlers::panic_response)))
}
