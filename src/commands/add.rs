use crate::plugin::{self, AddOptions};
use crate::project::PluginKind;

/// Raw CLI flags for `meridian add`.
pub struct CliAddOpts {
    pub route_prefix: Option<String>,
    pub config: Option<String>,
    pub add_to_root: bool,
    pub skip_install: bool,
    pub local: bool,
    pub quiet: bool,
}

/// Add a plugin to the app project in the current directory.
pub fn run(
    kind: PluginKind,
    reference: &str,
    opts: CliAddOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &opts.config {
        Some(raw) => {
            let value: serde_json::Value = serde_json::from_str(raw)
                .map_err(|err| format!("invalid --config JSON: {err}"))?;
            match value {
                serde_json::Value::Object(map) => Some(map),
                _ => return Err("--config must be a JSON object".into()),
            }
        }
        None => None,
    };

    let options = AddOptions {
        config,
        add_to_root: opts.add_to_root,
        skip_install: opts.skip_install,
        route_prefix: opts.route_prefix,
        local: opts.local,
        quiet: opts.quiet,
    };

    let cwd = std::env::current_dir()?;
    plugin::add_plugin(&cwd, kind, reference, &options)?;
    Ok(())
}
