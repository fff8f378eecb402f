//! Error types for `muster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The index number is already taken by another registration.
  #[error("index number {0:?} is already registered")]
  DuplicateIndex(String),

  /// No registration exists for the given index number.
  #[error("no registration with index number {0:?}")]
  NotFound(String),

  /// Input failed the field-level validation rules.
  #[error("{0}")]
  Validation(String),

  /// The storage backend failed for a reason unrelated to the request.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
