pub mod line_handler;
pub mod line_mapper;
pub mod node_handler;
pub mod node_mapper;
pub mod traits;

pub use line_handler::*;
pub use line_mapper::*;
pub use node_handler::RepositoryNodeHandler;
pub use traits::*;
