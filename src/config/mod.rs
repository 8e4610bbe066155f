pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given.
pub const LOCAL_CONFIG_FILE: &str = "devstack.toml";

/// Load configuration from file or use defaults
///
/// An explicit `path` must exist. Otherwise `./devstack.toml` and then
/// `<config dir>/devstack/config.toml` are tried before falling back to
/// defaults.
pub fn load_config(path: Option<&Path>) -> Result<types::Config> {
    let candidate = match path {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::InvalidFile(format!(
                    "{} does not exist",
                    path.display()
                ))
                .into());
            }
            Some(path.to_path_buf())
        }
        None => default_locations().into_iter().find(|p| p.is_file()),
    };

    let Some(file) = candidate else {
        log::debug!("No configuration file found, using defaults");
        return Ok(types::Config::default());
    };

    log::debug!("Loading configuration from {}", file.display());
    let content = fs::read_to_string(&file)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<types::Config> {
    let config: types::Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("devstack").join("config.toml"));
    }
    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DevstackError;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
[runtime]
container_runtime = "podman"

[ports]
web = 8000
"#,
        )
        .unwrap();

        assert_eq!(config.runtime.container_runtime, "podman");
        assert_eq!(config.runtime.init_timeout_secs, 900);
        assert_eq!(config.ports.web, Some(8000));
        assert_eq!(config.ports.cache, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = parse_config("[ports]\nhttp = 80\n").unwrap_err();
        assert!(matches!(err, DevstackError::Toml(_)));
    }

    #[test]
    fn test_blank_runtime_is_rejected() {
        let err = parse_config("[runtime]\ncontainer_runtime = \" \"\n").unwrap_err();
        assert!(matches!(err, DevstackError::Config(_)));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("devstack.toml");
        fs::write(&file, "[php]\nextra_extensions = [\"intl\"]\n").unwrap();

        let config = load_config(Some(&file)).unwrap();
        assert_eq!(config.php.extra_extensions, vec!["intl"]);
    }
}
