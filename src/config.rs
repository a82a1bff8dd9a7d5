use std::path::Path;

use serde_json::{Map, Value};

use crate::error::CliError;

/// Project configuration file, relative to the project root.
pub const CONFIG_FILE: &str = "config/default.json";

/// Where a configuration fragment is merged.
#[derive(Debug, Clone, Copy)]
pub enum ConfigScope<'a> {
    /// Merge keys into the top level of the configuration.
    Root,
    /// Merge keys under `config[namespace]`.
    Namespace(&'a str),
}

/// Merge `fragment` into the project configuration at `scope`.
///
/// Reads `config/default.json` when present (a missing file starts from an
/// empty object; a malformed one is a [`CliError::ConfigParse`]). The merge
/// is shallow at the scoped level: fragment keys override existing keys,
/// everything else is preserved, and key order stays as read. The result is
/// written back pretty-printed with 2-space indentation.
pub fn merge_config(
    root: &Path,
    scope: ConfigScope<'_>,
    fragment: &Map<String, Value>,
) -> Result<(), CliError> {
    let path = root.join(CONFIG_FILE);

    let mut config: Map<String, Value> = if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.clone(),
            source,
        })?
    } else {
        Map::new()
    };

    match scope {
        ConfigScope::Root => {
            for (key, value) in fragment {
                config.insert(key.clone(), value.clone());
            }
        }
        ConfigScope::Namespace(namespace) => {
            let entry = config
                .entry(namespace.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let section = entry.as_object_mut().unwrap();
            for (key, value) in fragment {
                section.insert(key.clone(), value.clone());
            }
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(&Value::Object(config))
        .map_err(|err| CliError::Other(format!("failed to serialize {CONFIG_FILE}: {err}")))?;
    content.push('\n');
    std::fs::write(&path, content)?;
    Ok(())
}
