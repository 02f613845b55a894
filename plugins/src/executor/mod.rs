pub mod renderers;
pub mod strategies;

pub use renderers::{JsonlRendererPlugin, TextRendererPlugin};
pub use strategies::{AdaptiveConcurrencyPlugin, FixedConcurrencyPlugin};
