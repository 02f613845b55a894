pub mod config;
pub mod error;
pub mod invocation;
pub mod result;

pub use config::*;
pub use error::*;
pub use invocation::*;
pub use result::*;
