use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Name of the per-project descriptor file.
pub const DESCRIPTOR_FILE: &str = "meridian.json";

/// Project flavors that `meridian new` can scaffold.
///
/// Only `app` projects host plugins; the other kinds are standalone plugin
/// packages meant to be published and added to an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    App,
    Provider,
    Output,
    Auth,
    Cache,
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProjectKind::App => "app",
            ProjectKind::Provider => "provider",
            ProjectKind::Output => "output",
            ProjectKind::Auth => "auth",
            ProjectKind::Cache => "cache",
        };
        f.write_str(name)
    }
}

/// Plugin flavors accepted by `meridian add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Output,
    Provider,
    Cache,
    Auth,
}

impl PluginKind {
    /// Name of the list declaration the plugin registers into.
    ///
    /// Outputs have their own list; providers, caches, and auth plugins all
    /// share the general `plugins` list.
    pub fn list_name(&self) -> &'static str {
        match self {
            PluginKind::Output => "outputs",
            _ => "plugins",
        }
    }
}

impl std::fmt::Display for PluginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PluginKind::Output => "output",
            PluginKind::Provider => "provider",
            PluginKind::Cache => "cache",
            PluginKind::Auth => "auth",
        };
        f.write_str(name)
    }
}

/// One registered plugin, as recorded in the project descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PluginKind,
    #[serde(rename = "srcPath")]
    pub src_path: String,
    pub local: bool,
}

/// The project descriptor (`meridian.json`).
///
/// Read-modify-written by `meridian add`; keys this CLI does not know about
/// are carried through untouched.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    #[serde(default)]
    pub plugins: Vec<PluginRecord>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl ProjectDescriptor {
    pub fn new(kind: ProjectKind) -> Self {
        ProjectDescriptor {
            kind,
            plugins: Vec::new(),
            rest: serde_json::Map::new(),
        }
    }

    /// Read the descriptor from `<root>/meridian.json`.
    ///
    /// A missing file means `root` is not a Meridian project and surfaces as
    /// a plain error; a present but invalid file is a `ConfigParse`.
    pub fn load(root: &Path) -> Result<Self, CliError> {
        let path = root.join(DESCRIPTOR_FILE);
        if !path.exists() {
            return Err(CliError::Other(format!(
                "no {DESCRIPTOR_FILE} found in {}. Are you in a Meridian project?",
                root.display()
            )));
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|source| CliError::ConfigParse { path, source })
    }

    /// Write the descriptor back to `<root>/meridian.json`, pretty-printed.
    pub fn save(&self, root: &Path) -> Result<(), CliError> {
        let path = root.join(DESCRIPTOR_FILE);
        let mut content = serde_json::to_string_pretty(self)
            .map_err(|err| CliError::Other(format!("failed to serialize {DESCRIPTOR_FILE}: {err}")))?;
        content.push('\n');
        std::fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_name_mapping() {
        assert_eq!(PluginKind::Output.list_name(), "outputs");
        assert_eq!(PluginKind::Provider.list_name(), "plugins");
        assert_eq!(PluginKind::Cache.list_name(), "plugins");
        assert_eq!(PluginKind::Auth.list_name(), "plugins");
    }

    #[test]
    fn descriptor_roundtrip_preserves_unknown_keys() {
        let raw = r#"{ "type": "app", "name": "demo", "plugins": [] }"#;
        let descriptor: ProjectDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.kind, ProjectKind::App);
        assert_eq!(descriptor.rest.get("name").unwrap(), "demo");

        let out = serde_json::to_string(&descriptor).unwrap();
        assert!(out.contains("\"name\":\"demo\""));
    }

    #[test]
    fn plugin_record_field_names() {
        let record = PluginRecord {
            name: "test-provider".to_string(),
            kind: PluginKind::Provider,
            src_path: "plugins/test-provider".to_string(),
            local: true,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "provider");
        assert_eq!(json["srcPath"], "plugins/test-provider");
        assert_eq!(json["local"], true);
    }
}
