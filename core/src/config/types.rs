use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::executor::types::ExecutorConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub executor: ExecutorConfig,
}

/// `[logging]` table. Logs never go to stdout, which carries run output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Log to stderr
    pub console: bool,
    /// Also log to `toolflow.<pid>.log` under `directory`
    pub file: bool,
    /// `EnvFilter` directives such as `info` or `toolflow_core=debug`;
    /// `RUST_LOG` wins when set
    pub level: String,
    /// Log file directory, the OS temp dir when unset
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            console: true,
            file: false,
            level: "warn".to_string(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    pub fn log_dir(&self) -> PathBuf {
        match &self.directory {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => std::env::temp_dir().join("toolflow"),
        }
    }
}
