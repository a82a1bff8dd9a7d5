use std::io;
use std::path::Path;

use crate::project::PluginKind;

/// Write the source files for a plugin of `kind` into `dir`.
///
/// Used both by `meridian new` for standalone plugin projects (where `dir`
/// is the project's `src/`) and by `meridian add --local` (where `dir` is a
/// plugin directory inside an app's `src/`).
pub fn write_source_files(dir: &Path, kind: PluginKind, name: &str) -> io::Result<()> {
    match kind {
        PluginKind::Provider => {
            std::fs::write(dir.join("index.js"), provider_index_js(name))?;
            std::fs::write(dir.join("model.js"), provider_model_js())?;
        }
        PluginKind::Output => {
            std::fs::write(dir.join("index.js"), output_index_js(name))?;
            std::fs::write(dir.join("routes.js"), output_routes_js(name))?;
            std::fs::create_dir_all(dir.join("request-handlers"))?;
            std::fs::write(
                dir.join("request-handlers").join("serve.js"),
                output_serve_handler_js(),
            )?;
        }
        PluginKind::Auth => {
            std::fs::write(dir.join("index.js"), auth_index_js(name))?;
            std::fs::write(dir.join("authenticate.js"), auth_authenticate_js())?;
            std::fs::write(dir.join("authorize.js"), auth_authorize_js())?;
            std::fs::write(
                dir.join("authentication-specification.js"),
                auth_specification_js(),
            )?;
        }
        PluginKind::Cache => {
            std::fs::write(dir.join("index.js"), cache_index_js(name))?;
        }
    }
    Ok(())
}

/// The initializer a local plugin's generated import calls.
pub fn initialize_js() -> String {
    "module.exports = () => require('.')\n".to_string()
}

pub fn provider_index_js(name: &str) -> String {
    format!(
        r#"const Model = require('./model')

module.exports = {{
  type: 'provider',
  name: '{name}',
  version: '0.1.0',
  Model
}}
"#
    )
}

pub fn provider_model_js() -> String {
    r#"/**
 * The model fetches data from the remote source and shapes it into a
 * feature collection.
 */
class Model {
  async getData (request) {
    return {
      type: 'FeatureCollection',
      features: []
    }
  }
}

module.exports = Model
"#
    .to_string()
}

pub fn output_index_js(name: &str) -> String {
    format!(
        r#"const routes = require('./routes')

module.exports = {{
  type: 'output',
  name: '{name}',
  version: '0.1.0',
  routes
}}
"#
    )
}

pub fn output_routes_js(name: &str) -> String {
    format!(
        r#"const serve = require('./request-handlers/serve')

module.exports = [
  {{
    path: '/{name}/:id',
    methods: ['get'],
    handler: serve
  }}
]
"#
    )
}

pub fn output_serve_handler_js() -> String {
    r#"module.exports = (request, response) => {
  response.status(501).json({ error: 'not implemented' })
}
"#
    .to_string()
}

pub fn auth_index_js(name: &str) -> String {
    format!(
        r#"const authenticate = require('./authenticate')
const authorize = require('./authorize')
const authenticationSpecification = require('./authentication-specification')

module.exports = {{
  type: 'auth',
  name: '{name}',
  version: '0.1.0',
  authenticate,
  authorize,
  authenticationSpecification
}}
"#
    )
}

pub fn auth_authenticate_js() -> String {
    r#"module.exports = async (request) => {
  throw new Error('not implemented')
}
"#
    .to_string()
}

pub fn auth_authorize_js() -> String {
    r#"module.exports = async (request) => {
  throw new Error('not implemented')
}
"#
    .to_string()
}

pub fn auth_specification_js() -> String {
    r#"module.exports = () => {
  return {
    useHttp: true
  }
}
"#
    .to_string()
}

pub fn cache_index_js(name: &str) -> String {
    format!(
        r#"const store = new Map()

module.exports = {{
  type: 'cache',
  name: '{name}',
  version: '0.1.0',
  async get (key) {{
    return store.get(key)
  }},
  async put (key, value) {{
    store.set(key, value)
  }},
  async delete (key) {{
    store.delete(key)
  }}
}}
"#
    )
}
