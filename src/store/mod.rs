pub mod error;
pub mod instance;
pub mod memory;
pub mod traits;

pub use error::*;
pub use instance::*;
pub use memory::*;
pub use traits::*;
