pub mod executor;
pub mod renderer;
pub mod strategy;

pub use executor::*;
pub use renderer::*;
pub use strategy::*;
