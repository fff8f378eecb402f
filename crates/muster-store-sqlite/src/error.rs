//! Error type for `muster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("index number {0:?} is already registered")]
  DuplicateIndex(String),

  #[error("no registration with index number {0:?}")]
  NotFound(String),

  #[error("{0}")]
  EmptyUpdate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Collapse backend errors into the core taxonomy so the trait methods can
/// surface `DuplicateIndex`/`NotFound` without the caller downcasting.
impl From<Error> for muster_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::DuplicateIndex(index) => muster_core::Error::DuplicateIndex(index),
      Error::NotFound(index) => muster_core::Error::NotFound(index),
      Error::EmptyUpdate(msg) => muster_core::Error::Validation(msg),
      other => muster_core::Error::Storage(other.to_string()),
    }
  }
}
