mod registry;

pub use registry::{Tool, ToolRegistry};
