//! Greeter core — the Reverser contract, call context, error taxonomy,
//! and the wire messages of the internal reverse transport.

pub mod context;
pub mod error;
pub mod reverse;
pub mod traits;
pub mod wire;

pub use context::{CallContext, DEFAULT_CALL_TIMEOUT_MS};
pub use error::ReverseError;
pub use reverse::reverse_chars;
pub use traits::Reverser;
pub use wire::{CodecError, ErrorResponse, ReverseRequest, ReverseResponse};
