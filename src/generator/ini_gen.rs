use crate::framework::descriptor::RuntimeSpec;

/// Renders `local.ini` as `key=value` lines.
pub fn generate(runtime: &RuntimeSpec) -> String {
    runtime
        .ini_settings
        .iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect()
}
