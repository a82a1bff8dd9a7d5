use colored::Colorize;

use crate::error::CliError;
use crate::exec::{self, scripts};
use crate::project::{ProjectDescriptor, ProjectKind};
use crate::report::Reporter;

/// Run the server for the project in the current directory.
///
/// Apps and providers are servable: the `package.json` start script when
/// one is declared, else `node <main>`. `--port` is exported to the child
/// as `PORT`. Runs in the foreground until the server exits.
pub fn run(port: Option<u16>, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = Reporter::new(quiet);
    let cwd = std::env::current_dir()?;

    let descriptor = ProjectDescriptor::load(&cwd)?;
    match descriptor.kind {
        ProjectKind::App | ProjectKind::Provider => {}
        other => return Err(format!("cannot serve a {other} project").into()),
    }

    let package_path = cwd.join("package.json");
    if !package_path.exists() {
        return Err("no package.json found in the current directory".into());
    }
    let package: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&package_path)?)
        .map_err(|source| CliError::ConfigParse {
            path: package_path,
            source,
        })?;

    let command_line = if package["scripts"]["start"].is_string() {
        scripts::NPM_RUN_START.to_string()
    } else if let Some(main) = package["main"].as_str() {
        format!("node {main}")
    } else {
        return Err("package.json declares neither a start script nor a main entry".into());
    };

    reporter.note(&format!("{}", "Starting Meridian server...".blue().bold()));
    reporter.note(&format!("{} Press {} to stop", "->".blue(), "Ctrl+C".yellow()));

    let mut cmd = exec::command(&command_line, &cwd);
    if let Some(port) = port {
        cmd.env("PORT", port.to_string());
    }

    let status = cmd.status()?;
    if !status.success() {
        return Err("server exited with error".into());
    }
    Ok(())
}
