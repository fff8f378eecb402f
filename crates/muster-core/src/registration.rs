//! Registration — one student's event sign-up record.
//!
//! The index number is the external identity: it is what the QR code
//! encodes and what the scan desk looks up. The surrogate `id` never leaves
//! the database layer except as an opaque reference in responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Field limits ────────────────────────────────────────────────────────────

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 255;
pub const INDEX_MIN: usize = 3;
pub const INDEX_MAX: usize = 50;
pub const COMBINATION_MIN: usize = 2;
pub const COMBINATION_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const MOBILE_MAX: usize = 20;

// ─── Registration ────────────────────────────────────────────────────────────

/// A persisted registration row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
  /// Server-assigned surrogate key; immutable.
  pub id:                i64,
  pub name:              String,
  /// Unique external identifier; encoded in the QR entry pass.
  pub index_number:      String,
  pub email:             String,
  /// Subject track, e.g. "Physical Science".
  pub combination:       String,
  pub mobile_number:     Option<String>,
  /// One-way flag: false until the first scan, true forever after.
  pub attendance_status: bool,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

// ─── NewRegistration ─────────────────────────────────────────────────────────

/// Input to [`crate::store::RegistrationStore::insert`].
/// `id`, `attendance_status`, and the timestamps are set by the store.
#[derive(Debug, Clone)]
pub struct NewRegistration {
  pub name:          String,
  pub index_number:  String,
  pub email:         String,
  pub combination:   String,
  pub mobile_number: Option<String>,
}

impl NewRegistration {
  /// Check all field-level rules; trims nothing, mutates nothing.
  pub fn validate(&self) -> Result<()> {
    check_len("name", &self.name, NAME_MIN, NAME_MAX)?;
    check_len("index_number", &self.index_number, INDEX_MIN, INDEX_MAX)?;
    check_len("combination", &self.combination, COMBINATION_MIN, COMBINATION_MAX)?;
    check_email(&self.email)?;
    if let Some(mobile) = &self.mobile_number {
      check_max("mobile_number", mobile, MOBILE_MAX)?;
    }
    Ok(())
  }
}

// ─── RegistrationUpdate ──────────────────────────────────────────────────────

/// Partial update applied by the admin edit operation. `None` fields are
/// left untouched. The attendance flag is deliberately absent: it only moves
/// through [`crate::store::RegistrationStore::mark_attendance`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationUpdate {
  pub name:          Option<String>,
  pub index_number:  Option<String>,
  pub email:         Option<String>,
  pub combination:   Option<String>,
  pub mobile_number: Option<String>,
}

impl RegistrationUpdate {
  /// Validate every provided field with the same rules as registration.
  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      check_len("name", name, NAME_MIN, NAME_MAX)?;
    }
    if let Some(index) = &self.index_number {
      check_len("index_number", index, INDEX_MIN, INDEX_MAX)?;
    }
    if let Some(combination) = &self.combination {
      check_len("combination", combination, COMBINATION_MIN, COMBINATION_MAX)?;
    }
    if let Some(email) = &self.email {
      check_email(email)?;
    }
    if let Some(mobile) = &self.mobile_number {
      check_max("mobile_number", mobile, MOBILE_MAX)?;
    }
    Ok(())
  }

  /// True when no field is present; the store rejects such updates early.
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.index_number.is_none()
      && self.email.is_none()
      && self.combination.is_none()
      && self.mobile_number.is_none()
  }
}

// ─── ScanOutcome ─────────────────────────────────────────────────────────────

/// Result of an attendance scan.
///
/// `already_scanned` is the only signal the caller gets about prior arrival;
/// the flag itself is true in both cases.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
  pub registration:    Registration,
  pub already_scanned: bool,
}

// ─── Validation helpers ──────────────────────────────────────────────────────

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
  let len = value.trim().chars().count();
  if len < min || len > max {
    return Err(Error::Validation(format!(
      "{field} must be between {min} and {max} characters"
    )));
  }
  Ok(())
}

fn check_max(field: &str, value: &str, max: usize) -> Result<()> {
  if value.trim().chars().count() > max {
    return Err(Error::Validation(format!(
      "{field} must be at most {max} characters"
    )));
  }
  Ok(())
}

/// Shape-only email check: one `@`, non-empty local part, dotted domain.
/// Deliverability is the mail provider's problem.
fn check_email(value: &str) -> Result<()> {
  let value = value.trim();
  let invalid = || Error::Validation("email address is not valid".to_string());

  if value.is_empty() || value.chars().count() > EMAIL_MAX {
    return Err(invalid());
  }
  let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
  if local.is_empty() || domain.contains('@') {
    return Err(invalid());
  }
  // Domain needs an interior dot: "a.b", not ".b" or "a.".
  if !domain.contains('.')
    || domain.starts_with('.')
    || domain.ends_with('.')
    || domain.contains(char::is_whitespace)
  {
    return Err(invalid());
  }
  Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn input() -> NewRegistration {
    NewRegistration {
      name:          "Test Student".into(),
      index_number:  "TEST001".into(),
      email:         "t@example.com".into(),
      combination:   "Physical Science".into(),
      mobile_number: None,
    }
  }

  #[test]
  fn valid_input_passes() {
    assert!(input().validate().is_ok());
  }

  #[test]
  fn short_name_rejected() {
    let mut reg = input();
    reg.name = "A".into();
    assert!(matches!(reg.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn short_index_rejected() {
    let mut reg = input();
    reg.index_number = "AB".into();
    assert!(matches!(reg.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn bad_emails_rejected() {
    for email in [
      "",
      "no-at-sign.example.com",
      "@example.com",
      "two@@example.com",
      "user@nodot",
      "user@.leading",
      "user@trailing.",
      "user@spa ce.com",
    ] {
      let mut reg = input();
      reg.email = email.into();
      assert!(
        matches!(reg.validate(), Err(Error::Validation(_))),
        "accepted bad email {email:?}"
      );
    }
  }

  #[test]
  fn plausible_emails_accepted() {
    for email in ["a@b.co", "first.last@sub.example.edu", "x+tag@example.org"] {
      let mut reg = input();
      reg.email = email.into();
      assert!(reg.validate().is_ok(), "rejected {email:?}");
    }
  }

  #[test]
  fn overlong_mobile_rejected() {
    let mut reg = input();
    reg.mobile_number = Some("0".repeat(21));
    assert!(matches!(reg.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn update_validates_only_provided_fields() {
    let update = RegistrationUpdate {
      email: Some("not-an-email".into()),
      ..Default::default()
    };
    assert!(matches!(update.validate(), Err(Error::Validation(_))));

    let update = RegistrationUpdate {
      name: Some("New Name".into()),
      ..Default::default()
    };
    assert!(update.validate().is_ok());
  }

  #[test]
  fn empty_update_detected() {
    assert!(RegistrationUpdate::default().is_empty());
    assert!(
      !RegistrationUpdate { name: Some("x".into()), ..Default::default() }
        .is_empty()
    );
  }
}
