//! PHP family: an FPM runtime behind nginx, with MySQL and Redis, scaffolded
//! through Composer. Variants differ only in their descriptor.

pub mod laravel;
pub mod symfony;

use super::descriptor::*;
use super::{Framework, FrameworkOptions};
use crate::compose::ServiceGraph;
use crate::error::{Result, SecurityError};
use crate::generator::{self, compose_gen, AssetWriter};
use crate::initializer::ProjectInitializer;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const FPM_PORT: u16 = 9000;

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Runtime shared by the PHP frameworks; variants pick image and extensions.
pub fn runtime(image: &str, extensions: &[&str]) -> RuntimeSpec {
    RuntimeSpec {
        service: "php".to_string(),
        image: image.to_string(),
        system_packages: strings(&[
            "git",
            "curl",
            "libpng-dev",
            "libonig-dev",
            "libxml2-dev",
            "zip",
            "unzip",
        ]),
        extensions: strings(extensions),
        extension_installer: "docker-php-ext-install".to_string(),
        internal_port: FPM_PORT,
        workdir: "/var/www/html".to_string(),
        ini_target: "/usr/local/etc/php/conf.d/local.ini".to_string(),
        ini_settings: vec![
            ("upload_max_filesize".to_string(), "40M".to_string()),
            ("post_max_size".to_string(), "40M".to_string()),
            ("memory_limit".to_string(), "512M".to_string()),
        ],
        bootstrap_command: concat!(
            "curl -sS https://getcomposer.org/installer",
            " | php -- --install-dir=/usr/local/bin --filename=composer"
        )
        .to_string(),
    }
}

pub fn composer() -> PackageManagerSpec {
    PackageManagerSpec {
        image: "composer:latest".to_string(),
        create_command: "create-project".to_string(),
    }
}

pub fn nginx() -> WebServerSpec {
    WebServerSpec {
        service: "nginx".to_string(),
        image: "nginx:alpine".to_string(),
        internal_port: 80,
        config_dir: "/etc/nginx/conf.d".to_string(),
        document_root: "public".to_string(),
        front_controller: "index.php".to_string(),
    }
}

pub fn mysql() -> DatabaseSpec {
    DatabaseSpec {
        service: "mysql".to_string(),
        image: "mysql:8.0".to_string(),
        internal_port: 3306,
        data_dir: "/var/lib/mysql".to_string(),
        volume: "mysql-data".to_string(),
        environment: [
            ("MYSQL_DATABASE", "${DB_DATABASE}"),
            ("MYSQL_USER", "${DB_USERNAME}"),
            ("MYSQL_PASSWORD", "${DB_PASSWORD}"),
            ("MYSQL_ROOT_PASSWORD", "${DB_ROOT_PASSWORD}"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    }
}

pub fn redis() -> CacheSpec {
    CacheSpec {
        service: "redis".to_string(),
        image: "redis:alpine".to_string(),
        internal_port: 6379,
    }
}

/// A PHP framework bound to one project directory.
#[derive(Debug)]
pub struct PhpFramework {
    descriptor: FrameworkDescriptor,
    options: FrameworkOptions,
}

impl PhpFramework {
    pub fn new(descriptor: FrameworkDescriptor, options: FrameworkOptions) -> Self {
        Self { descriptor, options }
    }

    pub fn project_root(&self) -> std::result::Result<PathBuf, SecurityError> {
        self.options.project_root()
    }

    pub fn initializer(&self) -> ProjectInitializer {
        ProjectInitializer::new(
            &self.descriptor,
            &self.options.container_runtime,
            &self.options.project_name,
            &self.options.base_path,
        )
    }
}

impl Framework for PhpFramework {
    fn descriptor(&self) -> &FrameworkDescriptor {
        &self.descriptor
    }

    fn try_initialize_project(&self) -> Result<()> {
        let project_root = self.project_root()?;
        self.initializer().run(self.options.runner.as_ref())?;
        log::info!(
            "✅ {} project created at {}",
            self.descriptor.display_name,
            project_root.display()
        );
        Ok(())
    }

    fn configure_docker(&self) -> ServiceGraph {
        compose_gen::generate(&self.descriptor)
    }

    fn default_ports(&self) -> BTreeMap<String, u16> {
        self.descriptor.ports.as_map()
    }

    fn try_setup_development_environment(&self) -> Result<Vec<PathBuf>> {
        let writer = AssetWriter::new(self.project_root()?);
        let written = writer.write_all(&generator::render_assets(&self.descriptor))?;
        log::info!(
            "Wrote {} Docker assets for {} into {}",
            written.len(),
            self.descriptor.display_name,
            writer.root().display()
        );
        Ok(written)
    }
}
