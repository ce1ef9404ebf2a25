use crate::config::{user_config_path, write_default_config, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct InitConfig {
    pub force: bool,
    pub user: bool,
}

pub fn init_config(config: InitConfig) -> Result<PathBuf> {
    let path = if config.user {
        user_config_path().context("No user config directory on this platform")?
    } else {
        PathBuf::from(CONFIG_FILE_NAME)
    };
    write_config_at(&path, config.force)?;
    println!("Created {} configuration file", path.display());
    Ok(path)
}

fn write_config_at(path: &Path, force: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::io::ensure_dir(parent)?;
    }
    match write_default_config(path, force) {
        Ok(()) => Ok(()),
        Err(crate::config::ConfigError::AlreadyExists { .. }) => {
            anyhow::bail!("Configuration file already exists. Use --force to overwrite.")
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        write_config_at(&path, false).unwrap();
        let err = write_config_at(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        write_config_at(&path, true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(crate::config::parse_config(&written).is_ok());
    }
}
