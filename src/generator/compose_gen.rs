use crate::compose::{ServiceGraph, ServiceRole, ServiceSpec};
use crate::framework::descriptor::FrameworkDescriptor;

/// Builds the four-service development topology for a descriptor.
///
/// The runtime depends on the database and the web server on the runtime;
/// database and cache have no dependencies, so the graph is acyclic. Database
/// credentials stay `${VAR}` placeholders.
pub fn generate(descriptor: &FrameworkDescriptor) -> ServiceGraph {
    let runtime = &descriptor.runtime;
    let web = &descriptor.web;
    let database = &descriptor.database;
    let cache = &descriptor.cache;
    let ports = &descriptor.ports;

    let source_mount = format!(".:{}:cached", runtime.workdir);

    let runtime_service = ServiceSpec::from_build(
        ServiceRole::Runtime,
        ".",
        format!("{}/Dockerfile", super::runtime_asset_dir(descriptor)),
    )
    .volume(source_mount.clone())
    .volume(format!(
        "./{}/local.ini:{}:ro",
        super::runtime_asset_dir(descriptor),
        runtime.ini_target
    ))
    .depends_on(database.service.clone());

    let web_service = ServiceSpec::from_image(ServiceRole::Web, web.image.clone())
        .port(ports.web, web.internal_port)
        .volume(source_mount)
        .volume(format!(
            "./{}:{}:ro",
            super::web_config_dir(descriptor),
            web.config_dir
        ))
        .depends_on(runtime.service.clone());

    let mut database_service =
        ServiceSpec::from_image(ServiceRole::Database, database.image.clone())
            .port(ports.database, database.internal_port)
            .volume(format!("{}:{}:cached", database.volume, database.data_dir));
    for (key, value) in &database.environment {
        database_service = database_service.env(key.clone(), value.clone());
    }

    let cache_service = ServiceSpec::from_image(ServiceRole::Cache, cache.image.clone())
        .port(ports.cache, cache.internal_port);

    ServiceGraph::new()
        .with_service(runtime.service.clone(), runtime_service)
        .with_service(web.service.clone(), web_service)
        .with_service(database.service.clone(), database_service)
        .with_service(cache.service.clone(), cache_service)
        .with_volume(database.volume.clone())
}
