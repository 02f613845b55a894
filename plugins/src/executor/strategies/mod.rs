pub mod concurrency;

pub use concurrency::{AdaptiveConcurrencyPlugin, FixedConcurrencyPlugin};
