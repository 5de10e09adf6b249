pub mod classification;
pub mod common;
pub mod find;
pub mod line;
pub mod node;
pub mod response;

pub use classification::*;
pub use common::*;
pub use find::*;
pub use line::*;
pub use node::*;
pub use response::*;
