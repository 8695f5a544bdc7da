//! In-process domain components.
//!
//! Each component implements both `ManagedService` (lifecycle) and the
//! component contract it provides (`Reverser`).

pub mod reverser;

pub use reverser::LocalReverser;

/// Registry name shared by every Reverser adapter.
pub const REVERSER_SERVICE: &str = "reverser";
