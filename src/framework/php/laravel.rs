use super::{composer, mysql, nginx, redis, runtime};
use crate::framework::descriptor::{FrameworkDescriptor, PortTable};

pub const TEMPLATE: &str = "laravel/laravel";

pub const EXTENSIONS: &[&str] = &["pdo_mysql", "mbstring", "exif", "pcntl", "bcmath", "gd"];

pub fn descriptor() -> FrameworkDescriptor {
    FrameworkDescriptor {
        name: "laravel".to_string(),
        display_name: "Laravel".to_string(),
        template_id: TEMPLATE.to_string(),
        runtime: runtime("php:8.2-fpm", EXTENSIONS),
        package_manager: composer(),
        web: nginx(),
        database: mysql(),
        cache: redis(),
        ports: PortTable::default(),
    }
}
