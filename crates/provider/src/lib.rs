pub mod adapter;
pub mod env;
pub mod error;
pub mod log;
pub mod transport;

pub use adapter::{AdapterRegistry, TransportAdapter};
pub use env::{EnvResolver, MapEnv, ProcessEnv, resolve_env};
pub use error::TransportError;
pub use log::LogTransport;
pub use transport::{DynTransport, Transport};

// Outbound W3C Trace Context injection; requires reqwest.
#[cfg(feature = "trace-context")]
pub mod trace_context;
#[cfg(feature = "trace-context")]
pub use trace_context::inject_trace_context;
