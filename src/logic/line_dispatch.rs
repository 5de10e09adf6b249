use crate::error::{Result, SubjectAreaError};
use crate::handler::LineHandler;
use crate::logic::router::TenantRegistry;
use crate::logic::translate::{self, OperationContext};
use crate::logic::validate::{
    validate_guid, validate_line_kind, validate_maintainable, validate_status_for_write,
    validate_user_id,
};
use crate::model::{Line, LineKind, OmasResponse, Status};

/// Runs the line operations of one kind.
pub struct LineDispatcher<'a> {
    kind: LineKind,
    registry: &'a TenantRegistry,
}

impl<'a> LineDispatcher<'a> {
    pub fn new(kind: LineKind, registry: &'a TenantRegistry) -> Self {
        Self { kind, registry }
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    fn operation(&self, verb: &str) -> OperationContext {
        OperationContext::new(
            format!("{}Dispatcher", self.kind),
            format!("{}{}", verb, self.kind),
        )
    }

    fn handler(
        &self,
        user_id: &str,
        server_name: &str,
        context: &OperationContext,
    ) -> Result<std::sync::Arc<dyn LineHandler>> {
        self.registry
            .resolve(user_id, server_name, &context.operation)?
            .line_handler(self.kind)
    }

    pub async fn create(&self, server_name: &str, user_id: &str, line: Line) -> OmasResponse<Line> {
        let context = self.operation("create");
        log::debug!("{} on '{}' by '{}'", context.operation, server_name, user_id);
        let result: Result<Line> = async {
            validate_user_id(user_id)?;
            validate_line_kind(self.kind, &line)?;
            validate_guid("end1", line.end1_guid())?;
            validate_guid("end2", line.end2_guid())?;
            validate_status_for_write(line.status)?;
            self.handler(user_id, server_name, &context)?
                .create(user_id, line)
                .await
        }
        .await;
        translate::single(&context, result)
    }

    pub async fn get(&self, server_name: &str, user_id: &str, guid: &str) -> OmasResponse<Line> {
        let context = self.operation("get");
        let result: Result<Line> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            self.handler(user_id, server_name, &context)?
                .get_by_guid(user_id, guid)
                .await
        }
        .await;
        translate::single(&context, result)
    }

    pub async fn update(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
        line: Line,
        is_replace: bool,
    ) -> OmasResponse<Line> {
        let context = self.operation("update");
        let result: Result<Line> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            validate_line_kind(self.kind, &line)?;
            validate_status_for_write(line.status)?;

            let handler = self.handler(user_id, server_name, &context)?;
            let current = handler.get_by_guid(user_id, guid).await?;
            if current.current_status() == Status::Deleted {
                return Err(SubjectAreaError::invalid_parameter(
                    "guid",
                    "cannot update a deleted instance",
                ));
            }
            handler.update(user_id, guid, line, is_replace).await
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
    ) -> OmasResponse<Line> {
        let context = self.operation(if is_purge { "purge" } else { "delete" });
        let result: Result<Option<Line>> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            validate_maintainable(self.kind)?;
            self.handler(user_id, server_name, &context)?
                .delete(user_id, guid, is_purge)
                .await
        }
        .await;
        translate::optional(&context, result)
    }

    pub async fn restore(
        &self,
        server_name: &str,
        user_id: &str,
        guid: &str,
    ) -> OmasResponse<Line> {
        let context = self.operation("restore");
        let result: Result<Line> = async {
            validate_user_id(user_id)?;
            validate_guid("guid", Some(guid))?;
            validate_maintainable(self.kind)?;
            self.handler(user_id, server_name, &context)?
                .restore(user_id, guid)
                .await
        }
        .await;
        translate::single(&context, result)
    }
}
