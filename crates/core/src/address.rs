use std::fmt;
use std::str::FromStr;

use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};

use crate::error::MessageError;

/// A mailbox: an email address with an optional display name.
///
/// An empty display name is treated the same as no display name, so callers
/// never have to distinguish `Some("")` from `None`.
///
/// # Examples
///
/// ```
/// use courier_core::Address;
///
/// let addr: Address = "\"Alice\" <alice@example.com>".parse().unwrap();
/// assert_eq!(addr.email, "alice@example.com");
/// assert_eq!(addr.name(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// The bare email address.
    pub email: String,

    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Address {
    /// Create an address without a display name.
    ///
    /// The address is not validated; use [`str::parse`] for that.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Attach a display name. Blank names are dropped.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    /// The display name, if one is set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Domain part of the address (after the last `@`), lowercased.
    pub fn domain(&self) -> Option<String> {
        self.email
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_ascii_lowercase())
    }
}

impl FromStr for Address {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mailbox: Mailbox = s
            .trim()
            .parse()
            .map_err(|_| MessageError::InvalidAddress(s.to_owned()))?;
        let address = Self::new(mailbox.email.to_string());
        Ok(match mailbox.name {
            Some(name) => address.with_name(name),
            None => address,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => {
                let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{escaped}\" <{}>", self.email)
            }
            None => f.write_str(&self.email),
        }
    }
}
