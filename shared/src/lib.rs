//! Chirp Shared Library
//!
//! Request and response types exchanged across the Chirp API boundary.
//! The backend serializes these; clients can depend on this crate to
//! deserialize them.

pub mod types;

// Re-export commonly used items
pub use types::*;
