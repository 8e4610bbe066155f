use super::{composer, mysql, nginx, redis, runtime};
use crate::framework::descriptor::{FrameworkDescriptor, PortTable};

pub const TEMPLATE: &str = "symfony/skeleton";

pub const EXTENSIONS: &[&str] = &["pdo_mysql", "intl", "opcache", "zip"];

pub fn descriptor() -> FrameworkDescriptor {
    let mut runtime = runtime("php:8.2-fpm", EXTENSIONS);
    runtime.system_packages.push("libicu-dev".to_string());
    runtime.system_packages.push("libzip-dev".to_string());

    FrameworkDescriptor {
        name: "symfony".to_string(),
        display_name: "Symfony".to_string(),
        template_id: TEMPLATE.to_string(),
        runtime,
        package_manager: composer(),
        web: nginx(),
        database: mysql(),
        cache: redis(),
        ports: PortTable {
            web: 8000,
            ..PortTable::default()
        },
    }
}
