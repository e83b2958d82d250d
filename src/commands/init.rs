//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub config_path: PathBuf,
    pub force: bool,
}

impl InitOptions {
    /// Resolve the target file: a `.toml` path is used as-is, anything else
    /// is treated as a directory
    pub fn for_path(path: Option<&Path>, force: bool) -> Self {
        let config_path = match path {
            Some(path) if path.extension().is_some_and(|e| e == "toml") => path.to_path_buf(),
            Some(path) => path.join("config.toml"),
            None => Config::default_config_path(),
        };
        Self { config_path, force }
    }
}

/// Write a default configuration file
pub async fn cmd_init(options: InitOptions) -> Result<PathBuf> {
    let InitOptions { config_path, force } = options;

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    let mut config = Config::default();
    config.paths.base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    config.paths.config_file = config_path.clone();
    config.validate()?;
    config.save()?;

    info!("Initialized storyqa config at {}", config_path.display());
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let tmp = TempDir::new().unwrap();
        let options = InitOptions::for_path(Some(tmp.path()), false);
        let path = cmd_init(options).await.unwrap();

        assert_eq!(path, tmp.path().join("config.toml"));
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.index.name, "rag-demo");
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("custom.toml");
        std::fs::write(&file, "timeout_secs = 5\n").unwrap();

        let err = cmd_init(InitOptions::for_path(Some(&file), false))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        cmd_init(InitOptions::for_path(Some(&file), true)).await.unwrap();
        let loaded = Config::load(&file).unwrap();
        assert_eq!(loaded.timeout_secs, 60);
    }
}
