use crate::project::ProjectKind;

pub fn package_json(kind: ProjectKind, name: &str) -> String {
    match kind {
        ProjectKind::App => format!(
            r#"{{
  "name": "{name}",
  "version": "0.1.0",
  "private": true,
  "main": "src/index.js",
  "scripts": {{
    "start": "node src/index.js",
    "test": "node --test test/"
  }},
  "dependencies": {{
    "config": "^3.3.9",
    "meridian": "^1.0.0"
  }}
}}
"#
        ),
        ProjectKind::Provider => format!(
            r#"{{
  "name": "{name}",
  "version": "0.1.0",
  "main": "src/index.js",
  "scripts": {{
    "start": "node src/server.js",
    "test": "node --test test/"
  }},
  "devDependencies": {{
    "meridian": "^1.0.0"
  }}
}}
"#
        ),
        _ => format!(
            r#"{{
  "name": "{name}",
  "version": "0.1.0",
  "main": "src/index.js",
  "scripts": {{
    "test": "node --test test/"
  }}
}}
"#
        ),
    }
}

pub fn gitignore() -> String {
    "node_modules/\n.env\n*.log\n".to_string()
}

/// App entrypoint: builds a server from the configuration and mounts every
/// registered plugin from the plugin list.
pub fn app_index_js() -> String {
    r#"const config = require('config')
const Meridian = require('meridian')
const plugins = require('./plugins')

const server = new Meridian(config)

for (const plugin of plugins) {
  server.register(plugin.instance, plugin.options)
}

const port = process.env.PORT || config.port || 8080
server.listen(port, () => {
  console.log(`Meridian server listening on ${port}`)
})
"#
    .to_string()
}

pub fn app_test_js() -> String {
    r#"const test = require('node:test')
const assert = require('node:assert')
const plugins = require('../src/plugins')

test('plugin list is an array', () => {
  assert.ok(Array.isArray(plugins))
})

test('every plugin carries an instance', () => {
  for (const plugin of plugins) {
    assert.ok(plugin.instance)
  }
})
"#
    .to_string()
}

/// Dev harness for standalone provider projects, target of the start
/// script so `meridian serve` works out of the box.
pub fn provider_server_js() -> String {
    r#"const Meridian = require('meridian')
const provider = require('.')

const server = new Meridian()
server.register(provider)
server.listen(process.env.PORT || 8080, () => {
  console.log('provider dev server listening')
})
"#
    .to_string()
}

pub fn provider_model_test_js() -> String {
    r#"const test = require('node:test')
const assert = require('node:assert')
const Model = require('../src/model')

test('getData returns a feature collection', async () => {
  const model = new Model()
  const data = await model.getData({})
  assert.strictEqual(data.type, 'FeatureCollection')
})
"#
    .to_string()
}

pub fn output_test_js() -> String {
    r#"const test = require('node:test')
const assert = require('node:assert')
const output = require('../src')

test('output declares its routes', () => {
  assert.strictEqual(output.type, 'output')
  assert.ok(Array.isArray(output.routes))
})
"#
    .to_string()
}

pub fn auth_test_js() -> String {
    r#"const test = require('node:test')
const assert = require('node:assert')
const auth = require('../src')

test('auth plugin exposes the required hooks', () => {
  assert.strictEqual(auth.type, 'auth')
  assert.strictEqual(typeof auth.authenticate, 'function')
  assert.strictEqual(typeof auth.authorize, 'function')
  assert.strictEqual(typeof auth.authenticationSpecification, 'function')
})
"#
    .to_string()
}

pub fn cache_test_js() -> String {
    r#"const test = require('node:test')
const assert = require('node:assert')
const cache = require('../src')

test('cache stores and retrieves values', async () => {
  await cache.put('key', { value: 1 })
  assert.deepStrictEqual(await cache.get('key'), { value: 1 })
  await cache.delete('key')
  assert.strictEqual(await cache.get('key'), undefined)
})
"#
    .to_string()
}
