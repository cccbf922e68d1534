//! Environment references in stored settings.
//!
//! A stored setting is either a literal or a reference to an environment
//! variable written as `$NAME` or `${NAME}`. References are resolved when a
//! transport is built, not when settings are loaded.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static ENV_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))$")
        .expect("env reference regex is valid")
});

/// Source of environment variable values.
pub trait EnvResolver: Send + Sync {
    /// Look up a variable by name.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Resolves against the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvResolver for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Resolves against a fixed map. Handy for tests and for hosts that keep
/// their own environment snapshot.
#[derive(Debug, Default, Clone)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl EnvResolver for MapEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Name of the referenced variable if `value` is an environment reference.
pub fn env_reference(value: &str) -> Option<&str> {
    let captures = ENV_REF_RE.captures(value.trim())?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
}

/// Resolve a stored setting.
///
/// Literals are returned trimmed. A reference to an unset variable resolves
/// to an empty string, so required settings fail validation instead of
/// silently using the reference text.
pub fn resolve_env(value: &str, env: &dyn EnvResolver) -> String {
    match env_reference(value) {
        Some(name) => env
            .lookup(name)
            .map(|v| v.trim().to_owned())
            .unwrap_or_default(),
        None => value.trim().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_passes_through() {
        let env = MapEnv::new();
        assert_eq!(resolve_env("  abc123 ", &env), "abc123");
        assert_eq!(resolve_env("", &env), "");
    }

    #[test]
    fn dollar_reference_resolves() {
        let env = MapEnv::new().with("MANDRILL_KEY", "secret");
        assert_eq!(resolve_env("$MANDRILL_KEY", &env), "secret");
        assert_eq!(resolve_env("${MANDRILL_KEY}", &env), "secret");
    }

    #[test]
    fn unset_reference_resolves_to_empty() {
        let env = MapEnv::new();
        assert_eq!(resolve_env("$NOT_SET", &env), "");
    }

    #[test]
    fn dollar_inside_literal_is_not_a_reference() {
        let env = MapEnv::new().with("A", "x");
        assert_eq!(resolve_env("pa$A", &env), "pa$A");
        assert!(env_reference("$1ABC").is_none());
        assert!(env_reference("${A").is_none());
    }

    #[test]
    fn process_env_reads_real_variables() {
        let path = ProcessEnv.lookup("PATH");
        assert_eq!(path, std::env::var("PATH").ok());
    }
}
