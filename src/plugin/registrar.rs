use std::path::Path;

use crate::error::CliError;
use crate::project::PluginKind;

use super::ast::{Expr, SourceFile};

/// Plugin-list source file, relative to the project root.
pub const PLUGINS_FILE: &str = "src/plugins.js";

/// Everything the registrar needs to rewrite the plugin list once.
#[derive(Debug)]
pub struct Registration<'a> {
    pub kind: PluginKind,
    /// Identifier the import statement binds.
    pub binding: &'a str,
    /// What the generated import resolves: a package name, or a relative
    /// initializer path for local plugins.
    pub module: &'a str,
    /// Append a `()` call to the import, as local plugin initializers need.
    pub initializer: bool,
    /// Only honored for provider plugins; silently dropped otherwise.
    pub route_prefix: Option<&'a str>,
}

/// Rewrite `src/plugins.js` to register one plugin.
///
/// Parses the file into the typed syntax model, appends a descriptor to the
/// list matching the plugin kind, prepends the import statement, and writes
/// the serialized result back atomically. On any error the file is left
/// exactly as it was: the target list is resolved before the tree is
/// mutated, and the output lands via a temp file and rename.
///
/// Registration is not idempotent: registering the same plugin twice
/// produces two imports and two descriptors.
pub fn register_plugin(root: &Path, registration: &Registration<'_>) -> Result<(), CliError> {
    let path = root.join(PLUGINS_FILE);
    let source = std::fs::read_to_string(&path)?;

    let mut file = SourceFile::parse(&source).map_err(|detail| CliError::MalformedSource {
        path: path.clone(),
        detail,
    })?;

    let list_name = registration.kind.list_name();
    let elements = file.list_mut(list_name).ok_or_else(|| CliError::MalformedSource {
        path: path.clone(),
        detail: format!("expected list declaration '{list_name}'"),
    })?;
    elements.push(descriptor_expr(registration));

    file.prepend_import(registration.binding, registration.module, registration.initializer);

    write_atomic(&path, &file.serialize())
}

/// The descriptor appended to the plugin list: always `instance`, plus an
/// `options` object only for provider plugins carrying a route prefix.
/// This is a deliberate allow-list, not a general options pass-through.
fn descriptor_expr(registration: &Registration<'_>) -> Expr {
    let mut properties = vec![(
        "instance".to_string(),
        Expr::Ident(registration.binding.to_string()),
    )];

    if registration.kind == PluginKind::Provider {
        if let Some(prefix) = registration.route_prefix {
            properties.push((
                "options".to_string(),
                Expr::Object(vec![(
                    "routePrefix".to_string(),
                    Expr::Str(prefix.to_string()),
                )]),
            ));
        }
    }

    Expr::Object(properties)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), CliError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!("{file_name}.tmp"));
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
