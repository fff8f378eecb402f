//! The `RegistrationStore` trait.
//!
//! Implemented by storage backends (e.g. `muster-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.
//!
//! Uniqueness of `index_number` and the at-most-once attendance flip are the
//! backend's responsibility: the implementation must enforce a unique
//! constraint and perform the flip as a single atomic compare-and-set, so
//! that two concurrent scans cannot both observe "not yet attended".

use std::future::Future;

use crate::{
  Result,
  registration::{NewRegistration, Registration, RegistrationUpdate, ScanOutcome},
};

/// Abstraction over a Muster registration store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Errors use the
/// core taxonomy directly: callers match on
/// [`Error::DuplicateIndex`](crate::Error::DuplicateIndex) and
/// [`Error::NotFound`](crate::Error::NotFound); backend faults arrive as
/// [`Error::Storage`](crate::Error::Storage).
pub trait RegistrationStore: Send + Sync {
  /// Insert a new registration with `attendance_status = false` and
  /// server-assigned id and timestamps.
  ///
  /// Fails with `DuplicateIndex` if the index number is already taken.
  fn insert(
    &self,
    input: NewRegistration,
  ) -> impl Future<Output = Result<Registration>> + Send + '_;

  /// Retrieve a registration by index number. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    index_number: &'a str,
  ) -> impl Future<Output = Result<Option<Registration>>> + Send + 'a;

  /// List every registration, newest first.
  fn list(&self) -> impl Future<Output = Result<Vec<Registration>>> + Send + '_;

  /// Apply a partial update and return the updated row.
  ///
  /// Fails with `NotFound` if `index_number` matches nothing, and with
  /// `DuplicateIndex` if the update renames the record onto an index number
  /// held by another row.
  fn update<'a>(
    &'a self,
    index_number: &'a str,
    update: RegistrationUpdate,
  ) -> impl Future<Output = Result<Registration>> + Send + 'a;

  /// Flip the attendance flag exactly once.
  ///
  /// The first call returns `already_scanned = false`; every later call
  /// returns `already_scanned = true` with the flag untouched. Fails with
  /// `NotFound` for unknown index numbers.
  fn mark_attendance<'a>(
    &'a self,
    index_number: &'a str,
  ) -> impl Future<Output = Result<ScanOutcome>> + Send + 'a;

  /// Cheap connectivity probe for the health endpoint.
  fn ping(&self) -> impl Future<Output = Result<()>> + Send + '_;
}
