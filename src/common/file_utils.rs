use crate::error::{ConfigError, ProvisionError, SecurityError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolves a base directory for provisioning to an absolute path.
///
/// Container bind mounts need absolute host paths, so relative input is
/// canonicalized. The directory must exist.
pub fn validate_project_path(path: &Path) -> Result<PathBuf, ConfigError> {
    let canonical = match path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            // canonicalize can fail on valid paths on Windows; fall back to an
            // absolute join when the path exists
            if path.exists() {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            } else {
                return Err(ConfigError::InvalidValue {
                    field: "path".to_string(),
                    reason: format!("invalid path '{}': {}", path.display(), e),
                });
            }
        }
    };

    if !canonical.is_dir() {
        return Err(ConfigError::InvalidValue {
            field: "path".to_string(),
            reason: format!("'{}' is not a directory", canonical.display()),
        });
    }

    Ok(canonical)
}

/// Checks that a project name is a single directory name below the base path.
///
/// Absolute names, separators, `.` and `..` are rejected, so
/// `base.join(name)` always stays directly inside `base`.
pub fn validate_project_name(name: &str) -> Result<(), SecurityError> {
    if name.trim().is_empty() {
        return Err(SecurityError::InvalidPath(
            "project name must not be empty".to_string(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(SecurityError::PathTraversal(name.to_string()));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        (Some(Component::ParentDir), None) | (Some(Component::CurDir), None) => {
            Err(SecurityError::PathTraversal(name.to_string()))
        }
        _ => Err(SecurityError::InvalidPath(format!(
            "project name '{}' must be a single directory name",
            name
        ))),
    }
}

/// Creates a directory and its parents; an existing directory is not an error.
pub fn ensure_dir(path: &Path) -> Result<(), ProvisionError> {
    fs::create_dir_all(path).map_err(|source| ProvisionError::FilesystemWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces the file content with `contents`.
pub fn write_text(path: &Path, contents: &str) -> Result<(), ProvisionError> {
    fs::write(path, contents).map_err(|source| ProvisionError::FilesystemWrite {
        path: path.to_path_buf(),
        source,
    })
}
