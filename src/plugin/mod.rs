//! Plugin management for app projects: orchestration of install, config
//! merge, local scaffolding, source-file registration, and descriptor
//! bookkeeping.

pub mod ast;
pub mod reference;
pub mod registrar;

use std::path::Path;

use serde_json::{Map, Value};

use crate::commands::templates;
use crate::config::{self, ConfigScope};
use crate::error::CliError;
use crate::exec::{self, scripts};
use crate::project::{PluginKind, PluginRecord, ProjectDescriptor, ProjectKind};
use crate::report::Reporter;

use self::reference::ModuleReference;
use self::registrar::Registration;

/// Options for one `meridian add` invocation. Unknown flags never reach
/// this struct; clap rejects them at the boundary.
#[derive(Debug, Default)]
pub struct AddOptions {
    /// Plugin configuration fragment to merge into `config/default.json`.
    pub config: Option<Map<String, Value>>,
    /// Merge the fragment into the root of the configuration instead of a
    /// per-plugin namespace.
    pub add_to_root: bool,
    /// Skip the dependency install step.
    pub skip_install: bool,
    /// Route prefix for provider plugins; ignored for other kinds.
    pub route_prefix: Option<String>,
    /// The reference is a path under the project's `src/`, not a package.
    pub local: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

/// What one registration writes, resolved from the reference and options.
struct RegistrationPlan {
    /// Plugin name recorded in the descriptor.
    name: String,
    /// Identifier bound by the generated import.
    binding: String,
    /// Module the import resolves.
    module: String,
    /// Whether the import ends in an initializer call.
    initializer: bool,
    src_path: String,
    local: bool,
}

impl RegistrationPlan {
    fn registry(reference: &str) -> Result<Self, CliError> {
        let parsed = ModuleReference::parse(reference)?;
        Ok(RegistrationPlan {
            name: parsed.base().to_string(),
            binding: parsed.binding(),
            module: parsed.full().to_string(),
            initializer: false,
            src_path: parsed.full().to_string(),
            local: false,
        })
    }

    fn local(reference: &str) -> Result<Self, CliError> {
        let src_path = reference.trim_matches('/');
        let name = src_path.rsplit('/').next().unwrap_or_default();
        let valid = !name.is_empty()
            && name.chars().any(|c| c.is_ascii_alphanumeric())
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "._-".contains(c));
        if !valid {
            return Err(CliError::InvalidModuleReference(reference.to_string()));
        }
        Ok(RegistrationPlan {
            name: name.to_string(),
            binding: reference::to_camel_case(name),
            module: format!("./{src_path}/initialize"),
            initializer: true,
            src_path: src_path.to_string(),
            local: true,
        })
    }
}

/// Add a plugin to the app project at `root`.
///
/// Steps run in a fixed order, each completing before the next: dependency
/// install (skippable, exit status deliberately ignored), configuration
/// merge, local-plugin scaffolding, plugin-list registration, descriptor
/// update. There is no rollback; a failure leaves the side effects of
/// earlier steps applied.
pub fn add_plugin(
    root: &Path,
    kind: PluginKind,
    reference: &str,
    options: &AddOptions,
) -> Result<(), CliError> {
    let reporter = Reporter::new(options.quiet);

    let mut descriptor = ProjectDescriptor::load(root)?;
    if descriptor.kind != ProjectKind::App {
        return Err(CliError::UnsupportedProjectType(descriptor.kind.to_string()));
    }

    let plan = if options.local {
        RegistrationPlan::local(reference)?
    } else {
        RegistrationPlan::registry(reference)?
    };

    if !options.skip_install && !plan.local {
        let mut child =
            exec::spawn_streaming(&format!("{} {reference}", scripts::NPM_INSTALL), root)?;
        match child.wait() {
            Ok(status) if status.success() => reporter.step(&format!("installed {reference}")),
            Ok(status) => {
                reporter.warn(&format!("install of {reference} exited with {status}"))
            }
            Err(err) => reporter.warn(&format!("could not wait for install: {err}")),
        }
    }

    if let Some(fragment) = &options.config {
        let scope = if options.add_to_root {
            ConfigScope::Root
        } else {
            ConfigScope::Namespace(&plan.binding)
        };
        config::merge_config(root, scope, fragment)?;
        reporter.step("added configuration");
    }

    if plan.local {
        scaffold_local_plugin(root, kind, &plan)?;
    }

    registrar::register_plugin(
        root,
        &Registration {
            kind,
            binding: &plan.binding,
            module: &plan.module,
            initializer: plan.initializer,
            route_prefix: options.route_prefix.as_deref(),
        },
    )?;

    descriptor.plugins.push(PluginRecord {
        name: plan.name.clone(),
        kind,
        src_path: plan.src_path.clone(),
        local: plan.local,
    });
    descriptor.save(root)?;

    reporter.step(&format!("registered {reference}"));
    reporter.step("done");
    Ok(())
}

/// Make sure a local plugin directory exists under `src/` with an
/// initializer the generated import can call. Missing directories are
/// scaffolded from the per-kind plugin templates; existing ones only gain
/// an `initialize.js` if they lack it.
fn scaffold_local_plugin(
    root: &Path,
    kind: PluginKind,
    plan: &RegistrationPlan,
) -> Result<(), CliError> {
    let dir = root.join("src").join(&plan.src_path);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        templates::plugin::write_source_files(&dir, kind, &plan.name)?;
    }
    let initializer = dir.join("initialize.js");
    if !initializer.exists() {
        std::fs::write(&initializer, templates::plugin::initialize_js())?;
    }
    Ok(())
}
