use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::error::CliError;

/// Command lines invoked against scaffolded projects.
pub mod scripts {
    pub const NPM_INSTALL: &str = "npm install --quiet";
    pub const NPM_TEST: &str = "npm test --silent";
    pub const NPM_RUN_START: &str = "npm run start";
    pub const GIT_INIT: &str = "git init --quiet";
}

/// Build a [`Command`] that runs `command_line` through the platform shell
/// in `cwd`, with stdout and stderr streamed straight to the caller's.
///
/// Exposed separately from [`spawn_streaming`] so callers can add
/// environment variables before spawning.
pub fn command(command_line: &str, cwd: &Path) -> Command {
    let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
    let mut cmd = Command::new(shell);
    cmd.arg(flag)
        .arg(command_line)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

/// Spawn `command_line` through the platform shell in `cwd`.
///
/// The child's output streams to the terminal as it arrives. The returned
/// [`Child`] is the completion signal: callers wait on it when they need
/// sequencing, and may ignore its exit status when the step is best-effort
/// (the dependency installer does exactly that).
pub fn spawn_streaming(command_line: &str, cwd: &Path) -> Result<Child, CliError> {
    command(command_line, cwd).spawn().map_err(CliError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    #[cfg(unix)]
    fn spawned_child_reports_exit_status() {
        let tmp = TempDir::new().unwrap();
        let mut child = spawn_streaming("true", tmp.path()).unwrap();
        let status = child.wait().unwrap();
        assert!(status.success());

        let mut child = spawn_streaming("exit 3", tmp.path()).unwrap();
        let status = child.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    #[cfg(unix)]
    fn command_runs_in_the_given_directory() {
        let tmp = TempDir::new().unwrap();
        let mut child = command("touch marker", tmp.path()).spawn().unwrap();
        child.wait().unwrap();
        assert!(tmp.path().join("marker").exists());
    }
}
