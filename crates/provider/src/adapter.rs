use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::env::EnvResolver;
use crate::error::TransportError;
use crate::transport::DynTransport;

/// Configuration object that describes which transport to build and how.
///
/// The host stores adapter settings (possibly containing environment
/// references) and builds a transport from them when a mailer is needed.
pub trait TransportAdapter: Send + Sync {
    /// Human-readable name shown in the host's settings.
    fn display_name(&self) -> &'static str;

    /// Check the settings without building anything.
    fn validate(&self, env: &dyn EnvResolver) -> Result<(), TransportError>;

    /// Resolve the settings and build a ready-to-use transport.
    fn build_transport(&self, env: &dyn EnvResolver)
    -> Result<Box<dyn DynTransport>, TransportError>;
}

/// Builds an adapter from its stored JSON settings.
pub type AdapterFactory =
    fn(serde_json::Value) -> Result<Box<dyn TransportAdapter>, TransportError>;

/// The host's registry of adapter types, keyed by type name.
///
/// # Examples
///
/// ```
/// use courier_provider::{AdapterRegistry, MapEnv, TransportError};
///
/// let registry = AdapterRegistry::new();
/// let err = registry
///     .build("nope", serde_json::json!({}), &MapEnv::new())
///     .err()
///     .unwrap();
/// assert!(matches!(err, TransportError::NotFound(_)));
/// ```
#[derive(Default)]
pub struct AdapterRegistry {
    factories: HashMap<String, AdapterFactory>,
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("AdapterRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter type. A later registration under the same name
    /// replaces the earlier one.
    pub fn register(&mut self, kind: impl Into<String>, factory: AdapterFactory) {
        let kind = kind.into();
        debug!(kind = %kind, "registering transport adapter");
        self.factories.insert(kind, factory);
    }

    /// Registered type names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Instantiate an adapter of type `kind` from its stored settings.
    pub fn adapter(
        &self,
        kind: &str,
        settings: serde_json::Value,
    ) -> Result<Box<dyn TransportAdapter>, TransportError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| TransportError::NotFound(kind.to_owned()))?;
        factory(settings)
    }

    /// Instantiate, validate, and build a transport in one step.
    pub fn build(
        &self,
        kind: &str,
        settings: serde_json::Value,
        env: &dyn EnvResolver,
    ) -> Result<Box<dyn DynTransport>, TransportError> {
        let adapter = self.adapter(kind, settings)?;
        adapter.validate(env)?;
        adapter.build_transport(env)
    }
}
