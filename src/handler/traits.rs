use crate::error::{Result, SubjectAreaError};
use crate::model::{FindRequest, Line, LineKind, Node, NodeKind, RelatedMedia};

/// Persists and retrieves the nodes of one kind.
///
/// Handlers trust their input: the dispatcher has already validated it.
#[async_trait::async_trait]
pub trait NodeHandler: Send + Sync {
    fn kind(&self) -> NodeKind;

    async fn create(&self, user_id: &str, node: Node) -> Result<Node>;

    async fn get_by_guid(&self, user_id: &str, guid: &str) -> Result<Node>;

    async fn find(
        &self,
        user_id: &str,
        request: &FindRequest,
        exact_value: bool,
        ignore_case: bool,
    ) -> Result<Vec<Node>>;

    /// Applies `node` to the stored instance, replacing or merging its fields.
    async fn update(&self, user_id: &str, guid: &str, node: Node, is_replace: bool)
        -> Result<Node>;

    /// Soft delete returns the node in `DELETED` status; purge returns `None`.
    async fn delete(&self, user_id: &str, guid: &str, is_purge: bool) -> Result<Option<Node>>;

    async fn restore(&self, user_id: &str, guid: &str) -> Result<Node>;

    /// Live lines attached to the node, optionally only those of one kind.
    async fn get_lines(
        &self,
        user_id: &str,
        guid: &str,
        line_kind: Option<LineKind>,
        request: &FindRequest,
    ) -> Result<Vec<Line>>;

    /// Live lines of `line_kind` that the node owns as end1 and whose end2 is
    /// live, whatever the status of the node itself.
    async fn get_owned_lines(
        &self,
        user_id: &str,
        guid: &str,
        line_kind: LineKind,
    ) -> Result<Vec<Line>>;

    /// Nodes at the other end of the live lines of `via` attached to the node.
    async fn get_related(
        &self,
        user_id: &str,
        guid: &str,
        via: LineKind,
        request: &FindRequest,
    ) -> Result<Vec<Node>>;

    async fn get_related_media(&self, user_id: &str, guid: &str) -> Result<Vec<RelatedMedia>>;

    /// Live nodes whose name is exactly `name`, in repository order.
    /// An empty match is reported as an unrecognized name.
    async fn get_by_name(&self, user_id: &str, name: &str) -> Result<Vec<Node>> {
        let request = FindRequest::matching(name);
        let matches: Vec<Node> = self
            .find(user_id, &request, true, false)
            .await?
            .into_iter()
            .filter(|node| node.name.as_deref() == Some(name))
            .collect();
        if matches.is_empty() {
            return Err(SubjectAreaError::unrecognized_name(name));
        }
        Ok(matches)
    }
}

/// Persists and retrieves the lines of one kind.
#[async_trait::async_trait]
pub trait LineHandler: Send + Sync {
    fn kind(&self) -> LineKind;

    async fn create(&self, user_id: &str, line: Line) -> Result<Line>;

    async fn get_by_guid(&self, user_id: &str, guid: &str) -> Result<Line>;

    async fn update(&self, user_id: &str, guid: &str, line: Line, is_replace: bool)
        -> Result<Line>;

    async fn delete(&self, user_id: &str, guid: &str, is_purge: bool) -> Result<Option<Line>>;

    async fn restore(&self, user_id: &str, guid: &str) -> Result<Line>;
}
