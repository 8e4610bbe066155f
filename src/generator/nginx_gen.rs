use crate::framework::descriptor::{RuntimeSpec, WebServerSpec};
use std::path::Path;

/// Renders the virtual host: static and catch-all requests go to the front
/// controller, script requests are proxied to the runtime over FastCGI.
pub fn generate(web: &WebServerSpec, runtime: &RuntimeSpec) -> String {
    let script_extension = Path::new(&web.front_controller)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("php");
    let root = if web.document_root.is_empty() {
        runtime.workdir.clone()
    } else {
        format!("{}/{}", runtime.workdir.trim_end_matches('/'), web.document_root)
    };

    format!(
        r#"server {{
    listen {listen};
    index {controller} index.html;
    server_name localhost;
    root {root};

    location / {{
        try_files $uri $uri/ /{controller}?$query_string;
    }}

    location ~ \.{ext}$ {{
        fastcgi_pass {upstream}:{upstream_port};
        fastcgi_index {controller};
        fastcgi_param SCRIPT_FILENAME $realpath_root$fastcgi_script_name;
        include fastcgi_params;
    }}
}}
"#,
        listen = web.internal_port,
        controller = web.front_controller,
        root = root,
        ext = script_extension,
        upstream = runtime.service,
        upstream_port = runtime.internal_port,
    )
}
