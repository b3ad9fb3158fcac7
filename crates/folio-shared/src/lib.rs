//! # Folio Shared
//!
//! Request and response types exchanged with API clients.
//! Field names are camelCase on the wire.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
