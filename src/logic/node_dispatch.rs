use crate::error::{Result, SubjectAreaError};
use crate::handler::NodeHandler;
use crate::logic::router::TenantRegistry;
use crate::logic::translate::{self, OperationContext};
use crate::logic::validate::{
    validate_find_request, validate_guid, validate_name, validate_node_kind,
    validate_status_for_write, validate_user_id,
};
use crate::model::{FindRequest, Line, LineKind, Node, NodeKind, OmasResponse, RelatedMedia, Status};

/// Runs the node operations of one kind: validate, route to the tenant's
/// handler, then translate the outcome into an envelope.
pub struct NodeDispatcher<'a> {
    kind: NodeKind,
    registry: &'a TenantRegistry,
}

impl<'a> NodeDispatcher<'a> {
    pub fn new(kind: NodeKind, registry: &'a TenantRegistry) -> Self {
        Self { kind, registry }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    fn context(&self, operation: String) -> OperationContext {
        OperationContext::new(format!("{}Dispatcher", self.kind.label()), operation)
    }

    fn operation(&self, verb: &str) -> OperationContext {
        self.context(format!("{}{}", verb, self.kind.label()))
    }

    fn handler(
        &self,
        user_id: &str,
        server_name: &str,
        context: &OperationContext,
    ) -> Result<std::sync::Arc<dyn NodeHandler>> {
        self.registry
            .resolve(user_id, server_name, &context.operation)?
            .node_handler(self.kind)
    }

    pub async fn create(&self, server_name: &str, user_id: &str, node: Node) -> OmasResponse<Node> {
        let context = self.operation("create");
        log::debug!("{} on '{}' by '{}'", context.operation, server_name, user_id);
        let result = self.try_create(server_name, user_id, node, &context).await;
        translate::single(&context, result)
    }

    async fn try_create(
        &self,
        server_name: &str,
        user_id: &str,
        node: Node,
        context: &OperationContext,
    ) -> Result<Node> {
        validate_user_id(user_id)?;
        validate_node_kind(self.kind, &node)?;
        let name = validate_name("name", node.name.as_deref())
            .map_err(|e| match self.kind {
                NodeKind::Glossary => {
                    SubjectAreaError::invalid_parameter("name", "a glossary must have a name")
                }
                _ => e,
            })?
            .to_string();
        validate_status_for_write(node.status)?;
        if self.kind.requires_glossary_anchor() {
            validate_guid(
                "glossary",
                node.glossary.as_ref().map(|glossary| glossary.guid.as_str()),
            )?;
        }

        let handler = self.handler(user_id, server_name, context)?;
        if self.kind.has_unique_name() {
            match handler.get_by_name(user_id, &name).await {
                Ok(existing) if !existing.is_empty() => {
                    return Err(SubjectAreaError::invalid_parameter(
                        "name",
                        format!("a {} named '{}' already exists", self.kind, name),
                    ));
                }
                Ok(_) => {}
                Err(e) if e.is_unrecognized() => {}
                Err(e) => return Err(e),
            }
        }

        let created = handler.create(user_id, node).await?;
        log::info!(
            "Created {} '{}' on '{}'",
            self.kind,
            created.guid.as_deref().unwrap_or_default(),
            server_name
        );
        Ok(created)
    }

    pub async fn get(&self, server_name: &str, user_id: &str, guid: &str) -> OmasResponse<Node> {
        let context = self.operation("get");
        let result = self.try_get(server_name, user_id, guid, &context).await;
        translate::single(&context, result)
    }

    async fn try_get(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
        context: &OperationContext,
    ) -> Result<Node> {
        validate_user_id(user_id)?;
        validate_guid("guid", Some(guid))?;
        let handler = self.handler(user_id, server_name, context)?;
        let mut node = handler.get_by_guid(user_id, guid).await?;

        if self.kind == NodeKind::Glossary {
            match handler.get_related_media(user_id, guid).await {
                Ok(media) => {
                    node.icons = media.iter().filter_map(RelatedMedia::icon).take(1).collect();
                }
                Err(e) => log::warn!("Could not resolve icons of glossary '{}': {}", guid, e),
            }
        }
        Ok(node)
    }

    pub async fn get_by_name(
        &self,
        server_name: &str,
        user_id: &str,
        name: &str,
    ) -> OmasResponse<Node> {
        let context = self.context(format!("get{}ByName", self.kind.label()));
        let result: Result<Vec<Node>> = async {
            validate_user_id(user_id)?;
            validate_name("name", Some(name))?;
            self.handler(user_id, server_name, &context)?
                .get_by_name(user_id, name)
                .await
        }
        .await;
        translate::list(&context, result)
    }

    pub async fn find(
        &self,
        server_name: &str,
        user_id: &str,
        request: &FindRequest,
        exact_value: bool,
        ignore_case: bool,
    ) -> OmasResponse<Node> {
        let context = self.operation("find");
        let result: Result<Vec<Node>> = async {
            validate_user_id(user_id)?;
            let instance = self
                .registry
                .resolve(user_id, server_name, &context.operation)?;
            let request = validate_find_request(request, instance.max_page_size())?;
            instance
                .node_handler(self.kind)?
                .find(user_id, &request, exact_value, ignore_case)
                .await
        }
        .await;
        translate::list(&context, result)
    }

    pub async fn update(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
        node: Node,
        is_replace: bool,
    ) -> OmasResponse<Node> {
        let context = self.operation("update");
        let result: Result<Node> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            validate_node_kind(self.kind, &node)?;
            validate_status_for_write(node.status)?;
            if is_replace {
                validate_name("name", node.name.as_deref())?;
            }

            let handler = self.handler(user_id, server_name, &context)?;
            let current = handler.get_by_guid(user_id, guid).await?;
            if current.current_status() == Status::Deleted {
                return Err(SubjectAreaError::invalid_parameter(
                    "guid",
                    "cannot update a deleted instance",
                ));
            }
            handler.update(user_id, guid, node, is_replace).await
        }
        .await;
        translate::single(&context, result)
    }

    pub async fn delete(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
        is_purge: bool,
    ) -> OmasResponse<Node> {
        let context = self.operation(if is_purge { "purge" } else { "delete" });
        let result: Result<Option<Node>> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            let handler = self.handler(user_id, server_name, &context)?;

            for content in self.kind.owned_content() {
                let lines = handler.get_owned_lines(user_id, guid, *content).await?;
                if !lines.is_empty() {
                    return Err(SubjectAreaError::ContentPreventedDelete {
                        kind: self.kind,
                        guid: guid.to_string(),
                    });
                }
            }

            let deleted = handler.delete(user_id, guid, is_purge).await?;
            log::info!(
                "{} {} '{}' on '{}'",
                if is_purge { "Purged" } else { "Deleted" },
                self.kind,
                guid,
                server_name
            );
            Ok(deleted)
        }
        .await;
        translate::optional(&context, result)
    }

    pub async fn restore(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
    ) -> OmasResponse<Node> {
        let context = self.operation("restore");
        let result: Result<Node> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            let restored = self
                .handler(user_id, server_name, &context)?
                .restore(user_id, guid)
                .await?;
            log::info!("Restored {} '{}' on '{}'", self.kind, guid, server_name);
            Ok(restored)
        }
        .await;
        translate::single(&context, result)
    }

    /// Live lines attached to the node.
    pub async fn relationships(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
        request: &FindRequest,
    ) -> OmasResponse<Line> {
        let context = self.context(format!("get{}Relationships", self.kind.label()));
        let result: Result<Vec<Line>> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            let instance = self
                .registry
                .resolve(user_id, server_name, &context.operation)?;
            let request = validate_find_request(request, instance.max_page_size())?;
            instance
                .node_handler(self.kind)?
                .get_lines(user_id, guid, None, &request)
                .await
        }
        .await;
        translate::list(&context, result)
    }

    /// Nodes joined to this one by live lines of kind `via`, such as the
    /// terms of a glossary or the subcategories of a category.
    pub async fn related(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
        via: LineKind,
        request: &FindRequest,
    ) -> OmasResponse<Node> {
        let context = self.context(format!("get{}{}", self.kind.label(), via));
        let result: Result<Vec<Node>> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            let mapper = via.mapper();
            if !mapper.end1_kinds().contains(&self.kind)
                && !mapper.end2_kinds().contains(&self.kind)
            {
                return Err(SubjectAreaError::invalid_parameter(
                    "lineType",
                    format!("a {} is never at either end of a {}", self.kind, via),
                ));
            }
            let instance = self
                .registry
                .resolve(user_id, server_name, &context.operation)?;
            let request = validate_find_request(request, instance.max_page_size())?;
            instance
                .node_handler(self.kind)?
                .get_related(user_id, guid, via, &request)
                .await
        }
        .await;
        translate::list(&context, result)
    }
}
