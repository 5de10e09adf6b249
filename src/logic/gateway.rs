use std::sync::Arc;

use crate::logic::line_dispatch::LineDispatcher;
use crate::logic::node_dispatch::NodeDispatcher;
use crate::logic::router::TenantRegistry;
use crate::model::{LineKind, NodeKind};

/// Entry point for every subject-area operation.
#[derive(Clone)]
pub struct SubjectAreaGateway {
    registry: Arc<TenantRegistry>,
}

impl SubjectAreaGateway {
    pub fn new(registry: Arc<TenantRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TenantRegistry {
        &self.registry
    }

    pub fn nodes(&self, kind: NodeKind) -> NodeDispatcher<'_> {
        NodeDispatcher::new(kind, &self.registry)
    }

    pub fn glossaries(&self) -> NodeDispatcher<'_> {
        self.nodes(NodeKind::Glossary)
    }

    pub fn terms(&self) -> NodeDispatcher<'_> {
        self.nodes(NodeKind::Term)
    }

    pub fn categories(&self) -> NodeDispatcher<'_> {
        self.nodes(NodeKind::Category)
    }

    pub fn projects(&self) -> NodeDispatcher<'_> {
        self.nodes(NodeKind::Project)
    }

    pub fn relationships(&self, kind: LineKind) -> LineDispatcher<'_> {
        LineDispatcher::new(kind, &self.registry)
    }
}
