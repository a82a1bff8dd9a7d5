//! Command implementations for the `meridian` CLI.
//!
//! Each submodule corresponds to a top-level CLI command.

/// Plugin management — `meridian add <type> <name>`.
///
/// Installs a plugin package (or references a local plugin directory with
/// `--local`), merges optional configuration, and registers the plugin in
/// the app's `src/plugins.js`.
pub mod add;

/// Project scaffolding — `meridian new <type> <name>`.
///
/// Creates a new Meridian project directory with package.json, descriptor,
/// configuration, per-kind source files, git repository, and dependencies.
pub mod new_project;

/// Development server — `meridian serve`.
///
/// Runs the project's start script (or its main entry) in the foreground,
/// forwarding `--port` through the `PORT` environment variable.
pub mod serve;


/// Code templates for scaffolded projects and plugins.
pub mod templates;
