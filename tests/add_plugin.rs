use meridian_cli::commands::new_project::{self, CliNewOpts};
use meridian_cli::error::CliError;
use meridian_cli::plugin::ast::{Expr, SourceFile, Statement};
use meridian_cli::plugin::{add_plugin, AddOptions};
use meridian_cli::project::{PluginKind, ProjectKind};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    fn new(path: &Path) -> Self {
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(path).unwrap();
        CwdGuard { original }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

fn scaffold(kind: ProjectKind, name: &str) {
    new_project::run(CliNewOpts {
        kind: Some(kind),
        name: Some(name.to_string()),
        skip_install: true,
        skip_git: true,
        no_interactive: true,
        quiet: true,
    })
    .unwrap();
}

fn default_options() -> AddOptions {
    AddOptions {
        skip_install: true,
        quiet: true,
        ..AddOptions::default()
    }
}

fn plugins_file(app: &str) -> String {
    fs::read_to_string(Path::new(app).join("src/plugins.js")).unwrap()
}

// ── Registration into the right list ────────────────────────────────

#[test]
#[serial]
fn add_provider_appends_to_the_plugins_list() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "test-provider",
        &default_options(),
    )
    .unwrap();

    let expected = [
        "const testProvider = require('test-provider');",
        "const outputs = [];",
        "const auths = [];",
        "const caches = [];",
        "const plugins = [",
        "  {",
        "    instance: testProvider",
        "  }",
        "];",
        "module.exports = [...outputs, ...auths, ...caches, ...plugins];",
    ]
    .join("\n");
    assert_eq!(plugins_file("myapp"), expected);
}

#[test]
#[serial]
fn add_output_appends_to_the_outputs_list() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Output,
        "my-output",
        &default_options(),
    )
    .unwrap();

    let content = plugins_file("myapp");
    assert!(content.starts_with("const myOutput = require('my-output');"));
    assert!(content.contains("const outputs = [\n  {\n    instance: myOutput\n  }\n];"));
    // the other lists stay empty
    assert!(content.contains("const auths = [];"));
    assert!(content.contains("const caches = [];"));
    assert!(content.contains("const plugins = [];"));
}

#[test]
#[serial]
fn add_cache_and_auth_share_the_plugins_list() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(Path::new("myapp"), PluginKind::Cache, "my-cache", &default_options()).unwrap();
    add_plugin(Path::new("myapp"), PluginKind::Auth, "my-auth", &default_options()).unwrap();

    let mut file = SourceFile::parse(&plugins_file("myapp")).unwrap();
    assert!(file.list_mut("outputs").unwrap().is_empty());
    let plugins = file.list_mut("plugins").unwrap();
    assert_eq!(plugins.len(), 2);
    assert_eq!(
        plugins[0],
        Expr::Object(vec![("instance".to_string(), Expr::Ident("myCache".to_string()))])
    );
    assert_eq!(
        plugins[1],
        Expr::Object(vec![("instance".to_string(), Expr::Ident("myAuth".to_string()))])
    );
}

// ── Options allow-list ──────────────────────────────────────────────

#[test]
#[serial]
fn provider_route_prefix_produces_options() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "test-provider",
        &AddOptions {
            route_prefix: Some("/v2".to_string()),
            ..default_options()
        },
    )
    .unwrap();

    let content = plugins_file("myapp");
    assert!(content.contains("instance: testProvider,"));
    assert!(content.contains("options: {\n      routePrefix: '/v2'\n    }"));
}

#[test]
#[serial]
fn output_route_prefix_is_silently_dropped() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Output,
        "my-output",
        &AddOptions {
            route_prefix: Some("/v2".to_string()),
            ..default_options()
        },
    )
    .unwrap();

    let content = plugins_file("myapp");
    assert!(!content.contains("options"));
    assert!(!content.contains("routePrefix"));
}

// ── Identifier derivation through the full flow ─────────────────────

#[test]
#[serial]
fn scoped_and_versioned_references_derive_clean_bindings() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "@scope/my-plugin",
        &default_options(),
    )
    .unwrap();
    add_plugin(Path::new("myapp"), PluginKind::Provider, "pkg@1.2.3", &default_options()).unwrap();

    let content = plugins_file("myapp");
    // scope kept in the module path, stripped from the binding
    assert!(content.contains("const myPlugin = require('@scope/my-plugin');"));
    // version stripped everywhere
    assert!(content.contains("const pkg = require('pkg');"));
}

// ── Round-trip and duplicates ───────────────────────────────────────

#[test]
#[serial]
fn second_registration_keeps_the_first() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(Path::new("myapp"), PluginKind::Provider, "first-provider", &default_options())
        .unwrap();
    add_plugin(Path::new("myapp"), PluginKind::Provider, "second-provider", &default_options())
        .unwrap();

    let mut file = SourceFile::parse(&plugins_file("myapp")).unwrap();
    // both imports precede the list declarations, newest first
    assert_eq!(
        file.statements[0],
        Statement::Import {
            binding: "secondProvider".to_string(),
            module: "second-provider".to_string(),
            initializer: false,
        }
    );
    assert_eq!(
        file.statements[1],
        Statement::Import {
            binding: "firstProvider".to_string(),
            module: "first-provider".to_string(),
            initializer: false,
        }
    );
    // descriptors in insertion order
    let plugins = file.list_mut("plugins").unwrap();
    assert_eq!(plugins.len(), 2);
    assert_eq!(
        plugins[0],
        Expr::Object(vec![("instance".to_string(), Expr::Ident("firstProvider".to_string()))])
    );
    assert_eq!(
        plugins[1],
        Expr::Object(vec![("instance".to_string(), Expr::Ident("secondProvider".to_string()))])
    );
}

#[test]
#[serial]
fn duplicate_registration_is_not_deduplicated() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(Path::new("myapp"), PluginKind::Provider, "test-provider", &default_options())
        .unwrap();
    add_plugin(Path::new("myapp"), PluginKind::Provider, "test-provider", &default_options())
        .unwrap();

    let content = plugins_file("myapp");
    assert_eq!(content.matches("const testProvider = require('test-provider');").count(), 2);

    let mut file = SourceFile::parse(&content).unwrap();
    assert_eq!(file.list_mut("plugins").unwrap().len(), 2);
}

// ── Failure modes ───────────────────────────────────────────────────

#[test]
#[serial]
fn add_to_non_app_project_is_unsupported() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::Provider, "my-provider");

    let err = add_plugin(
        Path::new("my-provider"),
        PluginKind::Output,
        "my-output",
        &default_options(),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::UnsupportedProjectType(_)));
    assert!(err.to_string().contains("provider project"));
}

#[test]
#[serial]
fn invalid_reference_is_rejected_before_any_write() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");
    let before = plugins_file("myapp");

    let err = add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "not a valid ref",
        &default_options(),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::InvalidModuleReference(_)));
    assert_eq!(plugins_file("myapp"), before);
}

#[test]
#[serial]
fn missing_list_declaration_fails_without_partial_write() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    // simulate a manual edit that dropped the outputs declaration
    let crippled = [
        "const auths = [];",
        "const caches = [];",
        "const plugins = [];",
        "module.exports = [...auths, ...caches, ...plugins];",
    ]
    .join("\n");
    fs::write("myapp/src/plugins.js", &crippled).unwrap();

    let err = add_plugin(
        Path::new("myapp"),
        PluginKind::Output,
        "my-output",
        &default_options(),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::MalformedSource { .. }));
    assert!(err.to_string().contains("outputs"));
    assert_eq!(plugins_file("myapp"), crippled);
}

// ── Configuration merging ───────────────────────────────────────────

#[test]
#[serial]
fn config_fragment_lands_under_the_derived_namespace() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "@scope/my-plugin",
        &AddOptions {
            config: Some(
                serde_json::json!({ "port": 3000 }).as_object().unwrap().clone(),
            ),
            ..default_options()
        },
    )
    .unwrap();

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string("myapp/config/default.json").unwrap()).unwrap();
    assert_eq!(config, serde_json::json!({ "myPlugin": { "port": 3000 } }));
}

#[test]
#[serial]
fn add_to_root_merges_at_the_top_level() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "test-provider",
        &AddOptions {
            config: Some(serde_json::json!({ "port": 3000 }).as_object().unwrap().clone()),
            add_to_root: true,
            ..default_options()
        },
    )
    .unwrap();

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string("myapp/config/default.json").unwrap()).unwrap();
    assert_eq!(config, serde_json::json!({ "port": 3000 }));
}

// ── Descriptor bookkeeping ──────────────────────────────────────────

#[test]
#[serial]
fn descriptor_records_the_registered_plugin() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "@scope/my-plugin@2.0.0",
        &default_options(),
    )
    .unwrap();

    let descriptor: serde_json::Value =
        serde_json::from_str(&fs::read_to_string("myapp/meridian.json").unwrap()).unwrap();
    let record = &descriptor["plugins"][0];
    assert_eq!(record["name"], "my-plugin");
    assert_eq!(record["type"], "provider");
    assert_eq!(record["srcPath"], "@scope/my-plugin");
    assert_eq!(record["local"], false);
}

#[test]
#[serial]
fn descriptor_extra_keys_survive_an_add() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    // a key this CLI knows nothing about
    let mut raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string("myapp/meridian.json").unwrap()).unwrap();
    raw["displayName"] = serde_json::json!("My App");
    fs::write("myapp/meridian.json", serde_json::to_string_pretty(&raw).unwrap()).unwrap();

    add_plugin(Path::new("myapp"), PluginKind::Cache, "my-cache", &default_options()).unwrap();

    let descriptor: serde_json::Value =
        serde_json::from_str(&fs::read_to_string("myapp/meridian.json").unwrap()).unwrap();
    assert_eq!(descriptor["displayName"], "My App");
    assert_eq!(descriptor["plugins"][0]["name"], "my-cache");
}

// ── Local plugins ───────────────────────────────────────────────────

#[test]
#[serial]
fn add_local_provider_scaffolds_and_registers() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "plugins/test-provider",
        &AddOptions {
            local: true,
            ..default_options()
        },
    )
    .unwrap();

    // import calls the plugin's initializer
    let content = plugins_file("myapp");
    assert!(content
        .starts_with("const testProvider = require('./plugins/test-provider/initialize')();"));
    assert!(content.contains("instance: testProvider"));

    // plugin sources scaffolded inside the app
    let plugin_dir = Path::new("myapp/src/plugins/test-provider");
    assert!(plugin_dir.join("index.js").exists());
    assert!(plugin_dir.join("model.js").exists());
    let initializer = fs::read_to_string(plugin_dir.join("initialize.js")).unwrap();
    assert!(initializer.contains("require('.')"));

    // descriptor records the local plugin
    let descriptor: serde_json::Value =
        serde_json::from_str(&fs::read_to_string("myapp/meridian.json").unwrap()).unwrap();
    let record = &descriptor["plugins"][0];
    assert_eq!(record["name"], "test-provider");
    assert_eq!(record["type"], "provider");
    assert_eq!(record["srcPath"], "plugins/test-provider");
    assert_eq!(record["local"], true);
}

#[test]
#[serial]
fn add_local_keeps_existing_plugin_sources() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    scaffold(ProjectKind::App, "myapp");

    let plugin_dir = Path::new("myapp/src/plugins/custom");
    fs::create_dir_all(plugin_dir).unwrap();
    fs::write(plugin_dir.join("index.js"), "module.exports = {}\n").unwrap();

    add_plugin(
        Path::new("myapp"),
        PluginKind::Provider,
        "plugins/custom",
        &AddOptions {
            local: true,
            ..default_options()
        },
    )
    .unwrap();

    // existing sources untouched, initializer added
    assert_eq!(
        fs::read_to_string(plugin_dir.join("index.js")).unwrap(),
        "module.exports = {}\n"
    );
    assert!(!plugin_dir.join("model.js").exists());
    assert!(plugin_dir.join("initialize.js").exists());
}
