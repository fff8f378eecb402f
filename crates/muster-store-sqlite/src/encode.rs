//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; the attendance flag as 0/1.

use chrono::{DateTime, Utc};
use muster_core::registration::Registration;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list shared by every SELECT over `registrations`; keep in sync
/// with [`RawRegistration`] field order.
pub const COLUMNS: &str = "id, name, index_number, email, combination, \
                           mobile_number, attendance_status, created_at, \
                           updated_at";

/// Raw values read directly from a `registrations` row.
pub struct RawRegistration {
  pub id:                i64,
  pub name:              String,
  pub index_number:      String,
  pub email:             String,
  pub combination:       String,
  pub mobile_number:     Option<String>,
  pub attendance_status: bool,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawRegistration {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      name:              row.get(1)?,
      index_number:      row.get(2)?,
      email:             row.get(3)?,
      combination:       row.get(4)?,
      mobile_number:     row.get(5)?,
      attendance_status: row.get(6)?,
      created_at:        row.get(7)?,
      updated_at:        row.get(8)?,
    })
  }

  pub fn into_registration(self) -> Result<Registration> {
    Ok(Registration {
      id:                self.id,
      name:              self.name,
      index_number:      self.index_number,
      email:             self.email,
      combination:       self.combination,
      mobile_number:     self.mobile_number,
      attendance_status: self.attendance_status,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}
