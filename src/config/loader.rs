use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::MethodscopeConfig;
use super::ConfigError;

/// Project-level config file name.
pub const CONFIG_FILE_NAME: &str = ".methodscope.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_config(contents: &str) -> Result<MethodscopeConfig, ConfigError> {
    let config = toml::from_str::<MethodscopeConfig>(contents).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
    })?;

    if let Some(charts) = &config.charts {
        if !(charts.width > 0.0 && charts.height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "charts.width/height",
                message: format!("must be positive, got {}x{}", charts.width, charts.height),
            });
        }
        if charts.mount_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "charts.mount_max_attempts",
                message: "must be at least 1".to_string(),
            });
        }
    }

    Ok(config)
}

/// Try loading config from a specific path; `None` if missing or broken.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<MethodscopeConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// `<config dir>/methodscope/config.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("methodscope").join("config.toml"))
}

/// Search `start` and its ancestors, then the user config file.
pub fn load_config_from(start: PathBuf, user_config: Option<&Path>) -> MethodscopeConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .or_else(|| user_config.and_then(try_load_config_from_path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            MethodscopeConfig::default()
        })
}

pub fn load_config() -> MethodscopeConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return MethodscopeConfig::default();
        }
    };
    load_config_from(current, user_config_path().as_deref())
}

/// Load an explicitly named config file. Unlike discovery, errors are returned.
pub fn load_config_from_path(path: &Path) -> Result<MethodscopeConfig, ConfigError> {
    let contents = read_config_file(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_config(&contents)
}

/// Write the default config to `path`. Refuses to overwrite unless `force`.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let contents = toml::to_string_pretty(&MethodscopeConfig::with_all_sections()).map_err(|e| {
        ConfigError::Serialize {
            message: e.to_string(),
        }
    })?;
    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}
