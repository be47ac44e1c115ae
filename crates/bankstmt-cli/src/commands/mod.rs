//! Subcommand implementations and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use bankstmt_core::{DocumentKind, ProcessedStatement, StatementConfig, StatementProcessor};

/// Configuration from `--config`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StatementConfig> {
    if let Some(path) = config_path {
        return StatementConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to read config file {}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return StatementConfig::from_file(&default_path)
            .with_context(|| format!("Failed to read config file {}", default_path.display()));
    }

    Ok(StatementConfig::default())
}

/// Read and normalize one file on the blocking pool.
pub async fn process_file(path: &Path, config: StatementConfig) -> anyhow::Result<ProcessedStatement> {
    let kind = DocumentKind::from_path(path);
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    debug!("Read {} bytes from {} as {}", data.len(), path.display(), kind.as_str());

    let processed =
        tokio::task::spawn_blocking(move || StatementProcessor::new(config).process(&data, kind))
            .await??;
    Ok(processed)
}
