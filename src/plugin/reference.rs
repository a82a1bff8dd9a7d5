use std::sync::LazyLock;

use regex::Regex;

use crate::error::CliError;

/// Grammar for an installable plugin reference: optional scope, base name,
/// optional version suffix. `@scope/name@1.2.3` at its fullest.
static MODULE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((@.+/)?([a-zA-Z0-9._-]+))(@.+)?$").expect("valid module reference regex")
});

/// A parsed plugin package reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    full: String,
    base: String,
}

impl ModuleReference {
    /// Parse `reference` against the scoped-name grammar.
    pub fn parse(reference: &str) -> Result<Self, CliError> {
        let captures = MODULE_REF
            .captures(reference)
            .ok_or_else(|| CliError::InvalidModuleReference(reference.to_string()))?;
        Ok(ModuleReference {
            full: captures[1].to_string(),
            base: captures[3].to_string(),
        })
    }

    /// Full module name with any scope, without any version suffix.
    /// This is what the generated import resolves.
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Unscoped, unversioned base name.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The identifier the import statement binds.
    pub fn binding(&self) -> String {
        to_camel_case(&self.base)
    }
}

/// Derive a camel-case identifier from a package base name:
/// `.`/`_`/`-` boundaries are removed and each later segment is
/// capitalized (`test-provider` becomes `testProvider`).
pub fn to_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for (i, segment) in name
        .split(['.', '_', '-'])
        .filter(|segment| !segment.is_empty())
        .enumerate()
    {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if i == 0 => {
                result.extend(first.to_lowercase());
                result.push_str(chars.as_str());
            }
            Some(first) => {
                result.extend(first.to_uppercase());
                result.push_str(chars.as_str());
            }
            None => {}
        }
    }
    result
}
