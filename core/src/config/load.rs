use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;

/// Get the toolflow data directory: `$TOOLFLOW_HOME` or `~/.toolflow`
pub fn get_toolflow_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("TOOLFLOW_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".toolflow"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: <data dir>/config.toml
    let data_config = get_toolflow_data_dir()?.join("config.toml");

    // Priority 2: ./toolflow.toml (current directory)
    let local_config = Path::new("toolflow.toml");

    let mut cfg = if data_config.exists() {
        load_from_path(&data_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());

    tracing::debug!(
        max_parallelism = cfg.executor.max_parallelism,
        format = %cfg.executor.output.format,
        "config loaded"
    );

    Ok(cfg)
}

/// Apply `TOOLFLOW_*` overrides. Blank or unparsable values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("TOOLFLOW_MAX_PARALLELISM") {
        match v.trim().parse::<usize>() {
            Ok(n) if n > 0 => cfg.executor.max_parallelism = n,
            _ => tracing::warn!(value = %v, "ignoring invalid TOOLFLOW_MAX_PARALLELISM"),
        }
    }
    if let Some(v) = get("TOOLFLOW_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = get("TOOLFLOW_OUTPUT_FORMAT") {
        cfg.executor.output.format = v;
    }
}
