//! toolflow-cli library, exposes modules for unit tests

pub mod batch;
pub mod commands;
pub mod logging;
