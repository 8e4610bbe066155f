//! # Asset Generation
//!
//! Pure renderers turn a [`FrameworkDescriptor`] into text assets; the
//! [`AssetWriter`] materializes them under a project root.
//!
//! Generated files (relative to the project root):
//! - `docker/<runtime>/Dockerfile`
//! - `docker/<runtime>/local.ini`
//! - `docker/<web>/conf.d/app.conf`
//!
//! Writes to one project root must not run concurrently.

use crate::common::file_utils;
use crate::compose::ServiceGraph;
use crate::error::{ProvisionError, Result};
use crate::framework::descriptor::FrameworkDescriptor;
use std::path::{Path, PathBuf};

pub mod compose_gen;
pub mod dockerfile_gen;
pub mod ini_gen;
pub mod nginx_gen;

/// Default file name for a rendered service graph.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// A generated file: path relative to the project root and its full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAsset {
    pub relative_path: PathBuf,
    pub contents: String,
}

impl GeneratedAsset {
    pub fn new(relative_path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            contents: contents.into(),
        }
    }
}

pub(crate) fn runtime_asset_dir(descriptor: &FrameworkDescriptor) -> String {
    format!("docker/{}", descriptor.runtime.service)
}

pub(crate) fn web_config_dir(descriptor: &FrameworkDescriptor) -> String {
    format!("docker/{}/conf.d", descriptor.web.service)
}

/// Renders the runtime and web server assets for a descriptor.
pub fn render_assets(descriptor: &FrameworkDescriptor) -> Vec<GeneratedAsset> {
    let runtime_dir = runtime_asset_dir(descriptor);
    vec![
        GeneratedAsset::new(
            format!("{}/Dockerfile", runtime_dir),
            dockerfile_gen::generate(&descriptor.runtime),
        ),
        GeneratedAsset::new(
            format!("{}/local.ini", runtime_dir),
            ini_gen::generate(&descriptor.runtime),
        ),
        GeneratedAsset::new(
            format!("{}/app.conf", web_config_dir(descriptor)),
            nginx_gen::generate(&descriptor.web, &descriptor.runtime),
        ),
    ]
}

/// Renders a service graph as a Compose file asset.
pub fn render_compose(graph: &ServiceGraph) -> Result<GeneratedAsset> {
    Ok(GeneratedAsset::new(COMPOSE_FILE, graph.to_yaml()?))
}

/// Writes assets below a project root that must already exist.
#[derive(Debug, Clone)]
pub struct AssetWriter {
    root: PathBuf,
}

impl AssetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates missing directories and overwrites files. Returns the absolute
    /// paths written, in asset order.
    pub fn write_all(
        &self,
        assets: &[GeneratedAsset],
    ) -> std::result::Result<Vec<PathBuf>, ProvisionError> {
        if !self.root.is_dir() {
            return Err(ProvisionError::FilesystemWrite {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "project directory does not exist",
                ),
            });
        }

        let mut written = Vec::with_capacity(assets.len());
        for asset in assets {
            let path = self.root.join(&asset.relative_path);
            if let Some(parent) = path.parent() {
                file_utils::ensure_dir(parent)?;
            }
            file_utils::write_text(&path, &asset.contents)?;
            log::debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::php::laravel;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_asset_paths() {
        let assets = render_assets(&laravel::descriptor());
        let paths: Vec<_> = assets.iter().map(|a| a.relative_path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("docker/php/Dockerfile"),
                PathBuf::from("docker/php/local.ini"),
                PathBuf::from("docker/nginx/conf.d/app.conf"),
            ]
        );
    }

    #[test]
    fn test_write_all_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let writer = AssetWriter::new(temp_dir.path());

        let first = vec![GeneratedAsset::new("docker/a/file.txt", "first")];
        let second = vec![GeneratedAsset::new("docker/a/file.txt", "second")];
        writer.write_all(&first).unwrap();
        let written = writer.write_all(&second).unwrap();

        assert_eq!(written, vec![temp_dir.path().join("docker/a/file.txt")]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "second");
    }

    #[test]
    fn test_missing_root_is_filesystem_failure() {
        let temp_dir = TempDir::new().unwrap();
        let writer = AssetWriter::new(temp_dir.path().join("absent"));

        let err = writer
            .write_all(&render_assets(&laravel::descriptor()))
            .unwrap_err();
        assert!(matches!(err, ProvisionError::FilesystemWrite { .. }));
        assert!(!temp_dir.path().join("absent").exists());
    }

    #[test]
    fn test_compose_asset() {
        let graph = compose_gen::generate(&laravel::descriptor());
        let asset = render_compose(&graph).unwrap();
        assert_eq!(asset.relative_path, PathBuf::from(COMPOSE_FILE));
        assert!(asset.contents.contains("services:"));
        assert!(asset.contents.contains("8080:80"));
    }
}
