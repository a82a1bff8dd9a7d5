//! # meridian-cli
//!
//! Command-line tool for scaffolding and managing Meridian projects.
//!
//! This crate provides the `meridian` binary with the following commands:
//!
//! | Command | Description |
//! |---------|-------------|
//! | `meridian new <type> <name>` | Create a new project from a built-in template |
//! | `meridian add <type> <name>` | Add a plugin to the current app |
//! | `meridian test` | Run tests in the current project |
//! | `meridian serve` | Run a Meridian server for the current project |
//!
//! ## Architecture
//!
//! Command handlers live under [`commands`]; the machinery they drive is
//! split into focused modules:
//!
//! - [`plugin`] — the add-plugin orchestrator, the plugin-reference
//!   grammar, and the typed syntax model used to rewrite `src/plugins.js`
//! - [`project`] — the project descriptor (`meridian.json`)
//! - [`config`] — merging fragments into `config/default.json`
//! - [`exec`] — shell-command execution with streamed output
//! - [`report`] — quiet-aware progress reporting
//! - [`error`] — the error taxonomy every step propagates

pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod plugin;
pub mod project;
pub mod report;
