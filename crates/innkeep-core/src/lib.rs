//! Core types and trait definitions for the Innkeep property-management
//! system.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod forecast;
pub mod front_desk;
pub mod invoice;
pub mod pricing;
pub mod reservation;
pub mod room;
pub mod store;

pub use error::{Error, ErrorKind, Result};
pub use front_desk::FrontDesk;
