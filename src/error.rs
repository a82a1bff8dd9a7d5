use std::path::PathBuf;

/// Errors surfaced by CLI commands and the plugin machinery.
///
/// Every variant propagates unmodified to the top-level command handler in
/// `main`, which prints it and exits with status 1. The only failure that is
/// deliberately not represented here is a non-zero exit from the dependency
/// installer, which the orchestrator reports as a warning and ignores.
#[derive(Debug)]
pub enum CliError {
    /// The project's declared type cannot host plugins.
    UnsupportedProjectType(String),

    /// The plugin-list source file does not have the expected shape.
    ///
    /// Usually means a manual edit removed or renamed one of the list
    /// declarations. The file is left untouched.
    MalformedSource { path: PathBuf, detail: String },

    /// The plugin reference does not match the scoped-name grammar.
    InvalidModuleReference(String),

    /// An existing JSON file (project descriptor or configuration) could
    /// not be parsed.
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An I/O failure while reading or writing project files.
    Io(std::io::Error),

    /// A command-surface failure (directory already exists, not a project
    /// directory, missing start script, ...).
    Other(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::UnsupportedProjectType(kind) => {
                write!(f, "cannot add the plugin to a {kind} project")
            }
            CliError::MalformedSource { path, detail } => {
                write!(f, "malformed plugin list {}: {detail}", path.display())
            }
            CliError::InvalidModuleReference(reference) => {
                write!(f, "invalid plugin reference '{reference}'")
            }
            CliError::ConfigParse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            CliError::Io(err) => write!(f, "{err}"),
            CliError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigParse { source, .. } => Some(source),
            CliError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<String> for CliError {
    fn from(msg: String) -> Self {
        CliError::Other(msg)
    }
}

impl From<&str> for CliError {
    fn from(msg: &str) -> Self {
        CliError::Other(msg.to_string())
    }
}
