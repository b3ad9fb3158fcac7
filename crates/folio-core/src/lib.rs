//! # Folio Core
//!
//! The domain layer of the Folio blogging backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the query builder, the dashboard aggregation, the similarity selector,
//! and the services that apply authorized mutations through the repository ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;
pub mod similar;
pub mod stats;

pub use error::DomainError;
