pub mod address;
pub mod envelope;
pub mod error;
pub mod legacy;
pub mod message;

pub use address::Address;
pub use envelope::{Envelope, SentMessage};
pub use error::MessageError;
pub use legacy::{LegacyMessage, LegacyPart};
pub use message::{
    Body, Disposition, Header, MessageBuilder, OutboundMessage, Part, Recipient, RecipientKind,
};
