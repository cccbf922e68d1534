//! Mandrill (Mailchimp Transactional) transport for Courier.
//!
//! This crate implements the [`Transport`](courier_provider::Transport)
//! trait, delivering mail through the
//! [Mandrill HTTP API](https://mailchimp.com/developer/transactional/api/messages/)
//! instead of SMTP, and registers a [`MandrillAdapter`] so hosts can build
//! the transport from stored settings.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use courier_mandrill::{MandrillConfig, MandrillTransport};
//!
//! let config = MandrillConfig::new("md-XXXXXXXX")
//!     .with_subaccount("marketing")
//!     .with_template("welcome");
//! let transport = MandrillTransport::new(config).unwrap();
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod headers;
pub mod settings;
pub mod translate;
pub mod transport;
pub mod types;

pub use adapter::{KIND, MandrillAdapter, register};
pub use config::{DEFAULT_HOST, MandrillConfig};
pub use error::MandrillError;
pub use settings::MandrillSettings;
pub use translate::translate;
pub use transport::{MandrillTransport, interpret};
pub use types::{
    DeliveryReport, DeliveryStatus, MandrillFile, MandrillMessage, MandrillRecipient,
    MandrillRequest, SendOutcome, TemplateContent,
};
