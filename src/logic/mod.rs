pub mod gateway;
pub mod line_dispatch;
pub mod node_dispatch;
pub mod router;
pub mod translate;
pub mod validate;

pub use gateway::SubjectAreaGateway;
pub use line_dispatch::LineDispatcher;
pub use node_dispatch::NodeDispatcher;
pub use router::{ServerInstance, TenantRegistry};
pub use translate::OperationContext;
pub use validate::*;
