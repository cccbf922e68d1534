use std::collections::HashMap;

use courier_core::Address;
use serde::Deserialize;

use crate::error::MandrillError;

/// Deployment-wide Mandrill settings, loaded from TOML.
///
/// ```toml
/// [return_paths]
/// "example.com" = "bounces.example.com"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MandrillSettings {
    /// Sender domain to return-path domain.
    #[serde(alias = "returnPaths")]
    pub return_paths: HashMap<String, String>,
}

impl MandrillSettings {
    pub fn from_toml_str(input: &str) -> Result<Self, MandrillError> {
        let mut settings: Self =
            toml::from_str(input).map_err(|e| MandrillError::Configuration(e.to_string()))?;
        settings.return_paths = settings
            .return_paths
            .into_iter()
            .map(|(domain, path)| (domain.to_ascii_lowercase(), path))
            .collect();
        Ok(settings)
    }

    /// Return-path domain configured for the sender's domain.
    pub fn return_path_for(&self, sender: &Address) -> Option<&str> {
        self.return_paths
            .get(&sender.domain()?)
            .map(String::as_str)
    }
}
