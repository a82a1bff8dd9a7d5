use std::fs;
use std::path::Path;

use colored::Colorize;
use dialoguer::{Input, Select};

use crate::exec::{self, scripts};
use crate::plugin::ast::SourceFile;
use crate::project::{PluginKind, ProjectDescriptor, ProjectKind};
use crate::report::Reporter;

use super::templates;

/// Raw CLI flags for `meridian new`, before prompt resolution.
pub struct CliNewOpts {
    pub kind: Option<ProjectKind>,
    pub name: Option<String>,
    pub skip_install: bool,
    pub skip_git: bool,
    pub no_interactive: bool,
    pub quiet: bool,
}

/// Create a new Meridian project in the current directory.
///
/// Missing positionals are prompted with `dialoguer` unless
/// `--no-interactive` is set, in which case they are required.
pub fn run(opts: CliNewOpts) -> Result<(), Box<dyn std::error::Error>> {
    let kind = match opts.kind {
        Some(kind) => kind,
        None if opts.no_interactive => {
            return Err("project type is required with --no-interactive".into())
        }
        None => prompt_kind()?,
    };

    let name = match &opts.name {
        Some(name) => name.clone(),
        None if opts.no_interactive => {
            return Err("project name is required with --no-interactive".into())
        }
        None => prompt_name()?,
    };

    generate_project(kind, &name, &opts)
}

fn prompt_kind() -> Result<ProjectKind, Box<dyn std::error::Error>> {
    let choices = &["app", "provider", "output", "auth", "cache"];
    let index = Select::new()
        .with_prompt("Project type")
        .items(choices)
        .default(0)
        .interact()?;
    Ok(match index {
        1 => ProjectKind::Provider,
        2 => ProjectKind::Output,
        3 => ProjectKind::Auth,
        4 => ProjectKind::Cache,
        _ => ProjectKind::App,
    })
}

fn prompt_name() -> Result<String, Box<dyn std::error::Error>> {
    let name: String = Input::new()
        .with_prompt("Project name")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(name.trim().to_string())
}

fn generate_project(
    kind: ProjectKind,
    name: &str,
    opts: &CliNewOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = Reporter::new(opts.quiet);
    let project_dir = Path::new(name);
    if project_dir.exists() {
        return Err(format!("Directory '{name}' already exists").into());
    }

    reporter.note(&format!(
        "{} Creating new Meridian {kind} project: {}",
        "->".blue(),
        name.green()
    ));

    fs::create_dir_all(project_dir.join("src"))?;
    fs::create_dir_all(project_dir.join("test"))?;
    fs::create_dir_all(project_dir.join("config"))?;

    fs::write(
        project_dir.join("package.json"),
        templates::project::package_json(kind, name),
    )?;
    ProjectDescriptor::new(kind).save(project_dir)?;
    fs::write(project_dir.join("config").join("default.json"), "{}\n")?;
    fs::write(project_dir.join(".gitignore"), templates::project::gitignore())?;

    match kind {
        ProjectKind::App => {
            fs::write(
                project_dir.join("src").join("plugins.js"),
                SourceFile::initial().serialize(),
            )?;
            fs::write(
                project_dir.join("src").join("index.js"),
                templates::project::app_index_js(),
            )?;
            fs::write(
                project_dir.join("test").join("index.test.js"),
                templates::project::app_test_js(),
            )?;
        }
        ProjectKind::Provider => {
            templates::plugin::write_source_files(
                &project_dir.join("src"),
                PluginKind::Provider,
                name,
            )?;
            fs::write(
                project_dir.join("src").join("server.js"),
                templates::project::provider_server_js(),
            )?;
            fs::write(
                project_dir.join("test").join("model.test.js"),
                templates::project::provider_model_test_js(),
            )?;
        }
        ProjectKind::Output => {
            templates::plugin::write_source_files(
                &project_dir.join("src"),
                PluginKind::Output,
                name,
            )?;
            fs::write(
                project_dir.join("test").join("index.test.js"),
                templates::project::output_test_js(),
            )?;
        }
        ProjectKind::Auth => {
            templates::plugin::write_source_files(
                &project_dir.join("src"),
                PluginKind::Auth,
                name,
            )?;
            fs::write(
                project_dir.join("test").join("index.test.js"),
                templates::project::auth_test_js(),
            )?;
        }
        ProjectKind::Cache => {
            templates::plugin::write_source_files(
                &project_dir.join("src"),
                PluginKind::Cache,
                name,
            )?;
            fs::write(
                project_dir.join("test").join("index.test.js"),
                templates::project::cache_test_js(),
            )?;
        }
    }

    if !opts.skip_git {
        match exec::spawn_streaming(scripts::GIT_INIT, project_dir)?.wait() {
            Ok(status) if status.success() => reporter.step("initialized git repository"),
            _ => reporter.warn("git init failed; continuing without a repository"),
        }
    }

    if !opts.skip_install {
        match exec::spawn_streaming(scripts::NPM_INSTALL, project_dir)?.wait() {
            Ok(status) if status.success() => reporter.step("installed dependencies"),
            _ => reporter.warn("dependency install failed; run npm install manually"),
        }
    }

    reporter.step(&format!("Project '{}' created", name.green()));
    reporter.note("");
    reporter.note(&format!("  cd {name}"));
    match kind {
        ProjectKind::App | ProjectKind::Provider => reporter.note("  meridian serve"),
        _ => reporter.note("  meridian test"),
    }
    reporter.note("");

    Ok(())
}
