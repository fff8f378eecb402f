//! Route handlers, one module per service area.

pub mod admin;
pub mod auth;
pub mod health;
pub mod register;
pub mod scan;
