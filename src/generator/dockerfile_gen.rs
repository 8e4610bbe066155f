use crate::framework::descriptor::RuntimeSpec;

/// Renders the runtime image Dockerfile.
///
/// Extensions are space-joined in descriptor order. Steps whose input list
/// is empty are left out.
pub fn generate(runtime: &RuntimeSpec) -> String {
    let mut sections = vec![format!("FROM {}", runtime.image)];

    if !runtime.system_packages.is_empty() {
        let packages = runtime
            .system_packages
            .iter()
            .map(|package| format!("    {}", package))
            .collect::<Vec<_>>()
            .join(" \\\n");
        sections.push(format!(
            "# Install dependencies\nRUN apt-get update && apt-get install -y \\\n{}",
            packages
        ));
    }

    if !runtime.extensions.is_empty() {
        sections.push(format!(
            "# Install extensions\nRUN {} \\\n    {}",
            runtime.extension_installer,
            runtime.extensions.join(" ")
        ));
    }

    if !runtime.bootstrap_command.is_empty() {
        sections.push(format!("# Install package manager\nRUN {}", runtime.bootstrap_command));
    }

    sections.push(format!("WORKDIR {}", runtime.workdir));

    let mut content = sections.join("\n\n");
    content.push('\n');
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::php::laravel;

    #[test]
    fn test_from_line_uses_runtime_image() {
        let mut runtime = laravel::descriptor().runtime;
        runtime.image = "php:8.2-fpm".to_string();
        runtime.extensions = vec!["pdo_mysql".to_string(), "gd".to_string()];

        let dockerfile = generate(&runtime);
        let lines: Vec<&str> = dockerfile.lines().collect();

        assert_eq!(lines[0], "FROM php:8.2-fpm");
        let install = lines
            .iter()
            .position(|line| *line == "RUN docker-php-ext-install \\")
            .expect("extension step present");
        assert_eq!(lines[install + 1].trim(), "pdo_mysql gd");
    }

    #[test]
    fn test_packages_are_continued_lines() {
        let runtime = laravel::descriptor().runtime;
        let dockerfile = generate(&runtime);

        assert!(dockerfile
            .contains("RUN apt-get update && apt-get install -y \\\n    git \\\n    curl \\"));
        assert!(dockerfile.contains("    unzip\n"));
        assert!(dockerfile.contains("--filename=composer"));
        assert!(dockerfile.ends_with("WORKDIR /var/www/html\n"));
    }

    #[test]
    fn test_empty_extension_list_drops_step() {
        let mut runtime = laravel::descriptor().runtime;
        runtime.extensions.clear();
        assert!(!generate(&runtime).contains("docker-php-ext-install"));
    }
}
