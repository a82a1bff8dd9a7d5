//! Code templates for scaffolded projects and plugins.
//!
//! Each template is a function returning the file's full contents, in the
//! shape the Meridian runtime expects. Project-level files (package.json,
//! entrypoints, tests) live in [`project`]; the per-kind plugin source
//! files shared by standalone plugin projects and `add --local` live in
//! [`plugin`].

pub mod plugin;
pub mod project;
