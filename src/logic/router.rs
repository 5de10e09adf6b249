use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::TenantConfig;
use crate::error::{Result, SubjectAreaError};
use crate::handler::{LineHandler, NodeHandler, RepositoryLineHandler, RepositoryNodeHandler};
use crate::model::{LineKind, NodeKind};
use crate::store::MetadataRepository;

/// Everything needed to serve requests for one named server.
pub struct ServerInstance {
    server_name: String,
    max_page_size: usize,
    authorized_users: Option<HashSet<String>>,
    node_handlers: HashMap<NodeKind, Arc<dyn NodeHandler>>,
    line_handlers: HashMap<LineKind, Arc<dyn LineHandler>>,
}

impl ServerInstance {
    /// An instance with no handlers; add them with `with_node_handler` and
    /// `with_line_handler`.
    pub fn new(config: &TenantConfig) -> Self {
        let authorized_users = (!config.authorized_users.is_empty())
            .then(|| config.authorized_users.iter().cloned().collect());
        Self {
            server_name: config.server_name.clone(),
            max_page_size: config.max_page_size,
            authorized_users,
            node_handlers: HashMap::new(),
            line_handlers: HashMap::new(),
        }
    }

    /// An instance whose handlers for every node and line kind share one repository.
    pub fn with_repository(config: &TenantConfig, repository: Arc<dyn MetadataRepository>) -> Self {
        let instance = NodeKind::ALL.into_iter().fold(Self::new(config), |instance, kind| {
            instance.with_node_handler(Arc::new(RepositoryNodeHandler::new(
                kind,
                repository.clone(),
            )))
        });
        LineKind::ALL.into_iter().fold(instance, |instance, kind| {
            instance.with_line_handler(Arc::new(RepositoryLineHandler::new(
                kind,
                repository.clone(),
            )))
        })
    }

    pub fn with_node_handler(mut self, handler: Arc<dyn NodeHandler>) -> Self {
        self.node_handlers.insert(handler.kind(), handler);
        self
    }

    pub fn with_line_handler(mut self, handler: Arc<dyn LineHandler>) -> Self {
        self.line_handlers.insert(handler.kind(), handler);
        self
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    pub fn is_authorized(&self, user_id: &str) -> bool {
        self.authorized_users
            .as_ref()
            .map_or(true, |users| users.contains(user_id))
    }

    pub fn node_handler(&self, kind: NodeKind) -> Result<Arc<dyn NodeHandler>> {
        self.node_handlers.get(&kind).cloned().ok_or_else(|| {
            SubjectAreaError::property_server(format!(
                "server '{}' has no handler for {}",
                self.server_name, kind
            ))
        })
    }

    pub fn line_handler(&self, kind: LineKind) -> Result<Arc<dyn LineHandler>> {
        self.line_handlers.get(&kind).cloned().ok_or_else(|| {
            SubjectAreaError::property_server(format!(
                "server '{}' has no handler for {}",
                self.server_name, kind
            ))
        })
    }
}

/// The server instances hosted by this process, keyed by server name.
#[derive(Default)]
pub struct TenantRegistry {
    instances: RwLock<HashMap<String, Arc<ServerInstance>>>,
}

impl TenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance, replacing any previous one of the same name.
    pub fn register(&self, instance: ServerInstance) {
        log::info!("Registering server instance '{}'", instance.server_name);
        self.instances
            .write()
            .insert(instance.server_name.clone(), Arc::new(instance));
    }

    pub fn deregister(&self, server_name: &str) -> bool {
        let removed = self.instances.write().remove(server_name).is_some();
        if removed {
            log::info!("Deregistered server instance '{}'", server_name);
        }
        removed
    }

    pub fn server_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.instances.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Finds the instance serving `server_name` and checks that `user_id` may use it.
    pub fn resolve(
        &self,
        user_id: &str,
        server_name: &str,
        operation: &str,
    ) -> Result<Arc<ServerInstance>> {
        let instance = self
            .instances
            .read()
            .get(server_name)
            .cloned()
            .ok_or_else(|| {
                SubjectAreaError::invalid_parameter(
                    "serverName",
                    format!("server '{}' is not known; {} cannot run", server_name, operation),
                )
            })?;

        if !instance.is_authorized(user_id) {
            return Err(SubjectAreaError::UserNotAuthorized {
                user_id: user_id.to_string(),
                server_name: server_name.to_string(),
            });
        }
        Ok(instance)
    }
}
