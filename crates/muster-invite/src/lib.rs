//! Invitation side effects: QR entry-pass generation and email delivery.
//!
//! Kept separate from the HTTP layer so the API crate depends on a small
//! `Mailer` value rather than on SMTP and image machinery directly. The
//! mailer can be disabled by configuration, which is also how tests run.

pub mod email;
pub mod error;
pub mod qr;

pub use email::{MailConfig, Mailer};
pub use error::{Error, Result};
