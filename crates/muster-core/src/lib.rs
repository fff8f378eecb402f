//! Core types and trait definitions for the Muster registration system.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod registration;
pub mod store;

pub use error::{Error, Result};
