use std::fmt;

/// Default Mandrill API host.
pub const DEFAULT_HOST: &str = "mandrillapp.com";

/// Configuration for the Mandrill transport.
///
/// Immutable once a [`MandrillTransport`](crate::MandrillTransport) is built
/// from it.
#[derive(Clone)]
pub struct MandrillConfig {
    /// Mandrill API key.
    pub api_key: String,

    /// Subaccount to send through. Never empty when set.
    pub subaccount: Option<String>,

    /// Stored template to merge the HTML body into. Never empty when set.
    pub template: Option<String>,

    /// API host. Defaults to [`DEFAULT_HOST`].
    pub host: String,

    /// Optional API port.
    pub port: Option<u16>,

    /// URL scheme. Defaults to `https`; override only to talk to a local
    /// mock server.
    pub scheme: String,
}

impl fmt::Debug for MandrillConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MandrillConfig")
            .field("api_key", &"[REDACTED]")
            .field("subaccount", &self.subaccount)
            .field("template", &self.template)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_owned())
    }
}

impl MandrillConfig {
    /// Create a configuration for the given API key against the default host.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            subaccount: None,
            template: None,
            host: DEFAULT_HOST.to_owned(),
            port: None,
            scheme: "https".to_owned(),
        }
    }

    /// Send through a subaccount. An empty value leaves the setting unchanged.
    #[must_use]
    pub fn with_subaccount(mut self, subaccount: impl Into<String>) -> Self {
        if let Some(subaccount) = non_empty(subaccount.into()) {
            self.subaccount = Some(subaccount);
        }
        self
    }

    /// Send in template mode. An empty value leaves the setting unchanged.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        if let Some(template) = non_empty(template.into()) {
            self.template = Some(template);
        }
        self
    }

    /// Override the API host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the API port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Override the URL scheme (useful for testing).
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// `host[:port]`.
    pub fn endpoint(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.clone(),
        }
    }

    /// Name of the send call: `send-template` in template mode, else `send`.
    pub fn api_call(&self) -> &'static str {
        if self.template.is_some() {
            "send-template"
        } else {
            "send"
        }
    }

    /// Full URL of an API method, e.g. `messages/send`.
    pub fn api_url(&self, method: &str) -> String {
        format!("{}://{}/api/1.0/{method}.json", self.scheme, self.endpoint())
    }

    /// URL of the send call for this configuration.
    pub fn send_url(&self) -> String {
        self.api_url(&format!("messages/{}", self.api_call()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_mandrillapp() {
        let config = MandrillConfig::new("key");
        assert_eq!(
            config.send_url(),
            "https://mandrillapp.com/api/1.0/messages/send.json"
        );
        assert!(config.subaccount.is_none());
        assert!(config.template.is_none());
    }

    #[test]
    fn template_switches_endpoint() {
        let config = MandrillConfig::new("key").with_template("welcome");
        assert_eq!(config.api_call(), "send-template");
        assert_eq!(
            config.send_url(),
            "https://mandrillapp.com/api/1.0/messages/send-template.json"
        );
    }

    #[test]
    fn host_port_and_scheme_override() {
        let config = MandrillConfig::new("key")
            .with_host("127.0.0.1")
            .with_port(8025)
            .with_scheme("http");
        assert_eq!(config.endpoint(), "127.0.0.1:8025");
        assert_eq!(
            config.api_url("users/ping"),
            "http://127.0.0.1:8025/api/1.0/users/ping.json"
        );
    }

    #[test]
    fn empty_values_never_override() {
        let config = MandrillConfig::new("key")
            .with_subaccount("acme")
            .with_subaccount("")
            .with_template("welcome")
            .with_template("   ");
        assert_eq!(config.subaccount.as_deref(), Some("acme"));
        assert_eq!(config.template.as_deref(), Some("welcome"));
    }

    #[test]
    fn values_are_trimmed() {
        let config = MandrillConfig::new("key").with_subaccount(" acme ");
        assert_eq!(config.subaccount.as_deref(), Some("acme"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = MandrillConfig::new("md-test-placeholder").with_subaccount("acme");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"), "api_key must be redacted");
        assert!(
            !debug.contains("md-test-placeholder"),
            "api_key must not appear in debug output"
        );
        assert!(debug.contains("acme"), "subaccount should still be visible");
    }
}
