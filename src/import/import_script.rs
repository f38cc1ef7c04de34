use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::infrastructure::error::{ImportError, ImportResult};
use crate::infrastructure::model::Resource;

/// Label carrying the native id when no `id` attribute is present
pub const AWS_ID_LABEL: &str = "aws_id";

/// Settings for import script generation
#[derive(Debug, Clone)]
pub struct ImportScriptConfig {
    /// Terraform working directory the script changes into and is written to
    pub tf_dir: PathBuf,
    pub script_name: String,
    pub shell: String,
    pub terraform_bin: String,
}

impl ImportScriptConfig {
    pub fn new(tf_dir: impl Into<PathBuf>) -> Self {
        Self {
            tf_dir: tf_dir.into(),
            ..Default::default()
        }
    }
}

impl Default for ImportScriptConfig {
    fn default() -> Self {
        Self {
            tf_dir: PathBuf::new(),
            script_name: "import.sh".to_string(),
            shell: "bash".to_string(),
            terraform_bin: "terraform".to_string(),
        }
    }
}

/// A written import script
#[derive(Debug, Clone, PartialEq)]
pub struct ImportScript {
    pub path: PathBuf,
    /// Number of import directives; resources without a resolvable id are skipped
    pub command_count: usize,
}

/// Resolve the native id used for `terraform import`
pub fn resolve_import_id(resource: &Resource) -> Option<&str> {
    resource
        .attributes
        .get("id")
        .and_then(|v| v.as_str())
        .filter(|id| !id.is_empty())
        .or_else(|| {
            resource
                .labels
                .get(AWS_ID_LABEL)
                .map(String::as_str)
                .filter(|id| !id.is_empty())
        })
}

/// Write an executable shell script with one import command per resource
pub fn generate_import_script(
    resources: &[Resource],
    config: &ImportScriptConfig,
) -> ImportResult<ImportScript> {
    if config.tf_dir.as_os_str().is_empty() {
        return Err(ImportError::InvalidInput(
            "tf_dir is required for the import script".to_string(),
        ));
    }

    let script_name = if config.script_name.is_empty() {
        "import.sh"
    } else {
        config.script_name.as_str()
    };
    let shell = if config.shell.is_empty() { "bash" } else { config.shell.as_str() };
    let terraform_bin = if config.terraform_bin.is_empty() {
        "terraform"
    } else {
        config.terraform_bin.as_str()
    };

    let (content, command_count) = render_script(resources, &config.tf_dir, shell, terraform_bin);

    std::fs::create_dir_all(&config.tf_dir).map_err(|e| ImportError::fs(&config.tf_dir, e))?;

    let path = config.tf_dir.join(script_name);
    std::fs::write(&path, content).map_err(|e| ImportError::fs(&path, e))?;

    make_executable(&path);

    tracing::debug!(script = %path.display(), commands = command_count, "wrote import script");

    Ok(ImportScript { path, command_count })
}

fn render_script(
    resources: &[Resource],
    tf_dir: &Path,
    shell: &str,
    terraform_bin: &str,
) -> (String, usize) {
    let mut script = String::new();
    let mut count = 0;

    // Writing to a String cannot fail
    let _ = writeln!(script, "#!/usr/bin/env {}", shell);
    let _ = writeln!(script, "set -euo pipefail");
    let _ = writeln!(script);
    let _ = writeln!(script, "cd {}", shell_quote(&tf_dir.display().to_string()));
    let _ = writeln!(script);
    let _ = writeln!(script, "# Generated terraform import commands");

    for resource in resources {
        let Some(id) = resolve_import_id(resource) else {
            tracing::debug!(address = %resource.address(), "no import id, skipping");
            continue;
        };

        let _ = writeln!(
            script,
            "{} import {} {}",
            terraform_bin,
            shell_quote(&resource.address()),
            shell_quote(id)
        );
        count += 1;
    }

    (script, count)
}

/// Double-quote a shell word, escaping the characters bash still expands inside quotes
pub fn shell_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }

    out.push('"');
    out
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let result = std::fs::metadata(path).and_then(|metadata| {
        let mut perms = metadata.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms)
    });

    if let Err(e) = result {
        tracing::warn!(script = %path.display(), error = %e, "could not mark import script executable");
    }
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::Origin;
    use std::fs;
    use tempfile::TempDir;

    fn instance() -> Resource {
        Resource::new("aws", "aws_instance", "i-1234", "web_1", Origin::Cloud).with_attribute("id", "i-1234")
    }

    #[test]
    fn test_script_contains_import_line() {
        let dir = TempDir::new().unwrap();
        let script = generate_import_script(&[instance()], &ImportScriptConfig::new(dir.path())).unwrap();

        assert_eq!(script.path, dir.path().join("import.sh"));
        assert_eq!(script.command_count, 1);

        let content = fs::read_to_string(&script.path).unwrap();
        assert!(content.starts_with("#!/usr/bin/env bash\nset -euo pipefail\n"));
        assert!(content.contains(&format!("cd \"{}\"", dir.path().display())));
        assert!(content.contains("terraform import \"aws_instance.web_1\" \"i-1234\"\n"));
    }

    #[test]
    fn test_id_resolution_order() {
        let with_label = Resource::new("aws", "aws_subnet", "subnet-1", "a", Origin::Cloud)
            .with_attribute("id", "")
            .with_label(AWS_ID_LABEL, "subnet-1");
        assert_eq!(resolve_import_id(&with_label), Some("subnet-1"));

        let both = instance().with_label(AWS_ID_LABEL, "i-other");
        assert_eq!(resolve_import_id(&both), Some("i-1234"));

        let non_string = Resource::new("aws", "aws_vpc", "vpc-1", "main", Origin::Cloud).with_attribute("id", true);
        assert_eq!(resolve_import_id(&non_string), None);
    }

    #[test]
    fn test_unresolvable_resources_are_skipped() {
        let dir = TempDir::new().unwrap();
        let orphan = Resource::new("aws", "aws_security_group", "sg-1", "sg_orphan", Origin::Cloud);

        let script =
            generate_import_script(&[orphan, instance()], &ImportScriptConfig::new(dir.path())).unwrap();

        assert_eq!(script.command_count, 1);
        let content = fs::read_to_string(&script.path).unwrap();
        assert!(!content.contains("sg_orphan"));
    }

    #[test]
    fn test_custom_shell_and_binary() {
        let dir = TempDir::new().unwrap();
        let config = ImportScriptConfig {
            tf_dir: dir.path().to_path_buf(),
            script_name: "run-import.sh".to_string(),
            shell: "zsh".to_string(),
            terraform_bin: "tofu".to_string(),
        };

        let script = generate_import_script(&[instance()], &config).unwrap();

        assert_eq!(script.path, dir.path().join("run-import.sh"));
        let content = fs::read_to_string(&script.path).unwrap();
        assert!(content.starts_with("#!/usr/bin/env zsh\n"));
        assert!(content.contains("tofu import \"aws_instance.web_1\" \"i-1234\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = generate_import_script(&[], &ImportScriptConfig::new(dir.path())).unwrap();

        let mode = fs::metadata(&script.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
        assert_eq!(script.command_count, 0);
    }

    #[test]
    fn test_shell_quote_escapes_expansions() {
        assert_eq!(shell_quote("i-1234"), "\"i-1234\"");
        assert_eq!(shell_quote(r#"a"b"#), r#""a\"b""#);
        assert_eq!(shell_quote("$HOME `id` c:\\x"), r#""\$HOME \`id\` c:\\x""#);
    }

    #[test]
    fn test_special_characters_are_escaped_in_script() {
        let dir = TempDir::new().unwrap();
        let tf_dir = dir.path().join("we\"ird $HOME");
        let resource = Resource::new("aws", "aws_instance", "i-\"1", "web", Origin::Cloud).with_attribute("id", "i-\"1");

        let script = generate_import_script(&[resource], &ImportScriptConfig::new(&tf_dir)).unwrap();
        let content = fs::read_to_string(&script.path).unwrap();

        let expected_cd = format!("cd \"{}/we\\\"ird \\$HOME\"\n", dir.path().display());
        assert!(content.contains(&expected_cd), "script was:\n{}", content);
        assert!(content.contains("terraform import \"aws_instance.web\" \"i-\\\"1\"\n"));
    }

    #[test]
    fn test_empty_tf_dir_is_rejected() {
        let result = generate_import_script(&[instance()], &ImportScriptConfig::default());
        assert!(matches!(result, Err(ImportError::InvalidInput(_))));
    }
}
