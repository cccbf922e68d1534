use std::fmt;

use courier_provider::{
    AdapterRegistry, DynTransport, EnvResolver, TransportAdapter, TransportError, resolve_env,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MandrillConfig;
use crate::error::MandrillError;
use crate::transport::MandrillTransport;

/// Registry key for this adapter type.
pub const KIND: &str = "mandrill";

/// Stored settings for a Mandrill mailer.
///
/// Every string field may hold an environment reference (`$NAME` or
/// `${NAME}`) that is resolved when the transport is built.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MandrillAdapter {
    /// Mandrill API key, or a reference to the variable holding it.
    /// Required once resolved.
    #[serde(alias = "apiKey")]
    pub api_key: String,

    /// Subaccount to send through. Ignored when it resolves to empty.
    pub subaccount: String,

    /// Stored template name. Ignored when it resolves to empty.
    pub template: String,

    /// API host override. Defaults to [`DEFAULT_HOST`](crate::DEFAULT_HOST).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// API port override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// URL scheme override, `https` unless set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

impl fmt::Debug for MandrillAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MandrillAdapter")
            .field("api_key", &"[REDACTED]")
            .field("subaccount", &self.subaccount)
            .field("template", &self.template)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl MandrillAdapter {
    /// Settings with the given API key (literal or reference) and no
    /// subaccount or template.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Set the subaccount (literal or reference).
    #[must_use]
    pub fn with_subaccount(mut self, subaccount: impl Into<String>) -> Self {
        self.subaccount = subaccount.into();
        self
    }

    /// Set the template name (literal or reference).
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Resolve environment references and produce a transport configuration.
    ///
    /// The API key is required; subaccount and template are optional and
    /// dropped when they resolve to an empty string.
    pub fn resolve(&self, env: &dyn EnvResolver) -> Result<MandrillConfig, MandrillError> {
        let api_key = resolve_env(&self.api_key, env);
        if api_key.is_empty() {
            return Err(MandrillError::MissingCredential(
                "Mandrill API key is empty".into(),
            ));
        }

        let mut config = MandrillConfig::new(api_key)
            .with_subaccount(resolve_env(&self.subaccount, env))
            .with_template(resolve_env(&self.template, env));

        if let Some(host) = &self.host {
            let host = resolve_env(host, env);
            if !host.is_empty() {
                config = config.with_host(host);
            }
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(scheme) = &self.scheme {
            let scheme = resolve_env(scheme, env);
            if !scheme.is_empty() {
                config = config.with_scheme(scheme);
            }
        }

        Ok(config)
    }
}

impl TransportAdapter for MandrillAdapter {
    fn display_name(&self) -> &'static str {
        "Mailchimp Transactional"
    }

    fn validate(&self, env: &dyn EnvResolver) -> Result<(), TransportError> {
        self.resolve(env)?;
        Ok(())
    }

    fn build_transport(
        &self,
        env: &dyn EnvResolver,
    ) -> Result<Box<dyn DynTransport>, TransportError> {
        let config = self.resolve(env)?;
        debug!(?config, "building Mandrill transport");
        Ok(Box::new(MandrillTransport::new(config)?))
    }
}

/// Factory registered under [`KIND`].
pub fn factory(settings: serde_json::Value) -> Result<Box<dyn TransportAdapter>, TransportError> {
    let adapter: MandrillAdapter = serde_json::from_value(settings)
        .map_err(|e| TransportError::Serialization(format!("invalid Mandrill settings: {e}")))?;
    Ok(Box::new(adapter))
}

/// Register the Mandrill adapter with a host registry.
pub fn register(registry: &mut AdapterRegistry) {
    registry.register(KIND, factory);
}

#[cfg(test)]
mod tests {
    use courier_provider::MapEnv;

    use super::*;

    #[test]
    fn resolves_env_references() {
        let env = MapEnv::new()
            .with("MANDRILL_KEY", "md-from-env")
            .with("MANDRILL_SUB", "acme");
        let adapter = MandrillAdapter::new("${MANDRILL_KEY}").with_subaccount("$MANDRILL_SUB");
        let config = adapter.resolve(&env).unwrap();
        assert_eq!(config.api_key, "md-from-env");
        assert_eq!(config.subaccount.as_deref(), Some("acme"));
        assert!(config.template.is_none());
    }

    #[test]
    fn literal_values_are_used_as_is() {
        let adapter = MandrillAdapter::new("md-literal").with_template("welcome");
        let config = adapter.resolve(&MapEnv::new()).unwrap();
        assert_eq!(config.api_key, "md-literal");
        assert_eq!(config.template.as_deref(), Some("welcome"));
    }

    #[test]
    fn unset_key_reference_is_missing_credential() {
        let adapter = MandrillAdapter::new("$MANDRILL_KEY");
        let err = adapter.validate(&MapEnv::new()).unwrap_err();
        assert!(matches!(err, TransportError::MissingCredential(_)));
    }

    #[test]
    fn empty_optional_references_are_dropped() {
        let env = MapEnv::new().with("KEY", "md");
        let adapter = MandrillAdapter::new("$KEY")
            .with_subaccount("$UNSET")
            .with_template("");
        let config = adapter.resolve(&env).unwrap();
        assert!(config.subaccount.is_none());
        assert!(config.template.is_none());
    }

    #[test]
    fn factory_accepts_camel_case_key() {
        let adapter = factory(serde_json::json!({"apiKey": "md", "template": "t"})).unwrap();
        assert_eq!(adapter.display_name(), "Mailchimp Transactional");
        assert!(adapter.validate(&MapEnv::new()).is_ok());
    }

    #[test]
    fn factory_rejects_malformed_settings() {
        let err = factory(serde_json::json!({"port": "not a port"})).err().unwrap();
        assert!(matches!(err, TransportError::Serialization(_)));
    }

    #[test]
    fn host_overrides_resolve() {
        let env = MapEnv::new().with("HOST", "127.0.0.1");
        let adapter = MandrillAdapter {
            host: Some("$HOST".into()),
            port: Some(8025),
            scheme: Some("http".into()),
            ..MandrillAdapter::new("md")
        };
        let config = adapter.resolve(&env).unwrap();
        assert_eq!(config.send_url(), "http://127.0.0.1:8025/api/1.0/messages/send.json");
    }

    #[test]
    fn registry_builds_transport() {
        let mut registry = AdapterRegistry::new();
        register(&mut registry);
        assert_eq!(registry.kinds(), ["mandrill"]);

        let transport = registry
            .build(KIND, serde_json::json!({"api_key": "md"}), &MapEnv::new())
            .unwrap();
        assert_eq!(transport.name(), "mandrill");
    }

    #[test]
    fn debug_redacts_api_key() {
        let adapter = MandrillAdapter::new("md-secret-placeholder");
        let debug = format!("{adapter:?}");
        assert!(!debug.contains("md-secret-placeholder"));
    }
}
