//! [`SqliteStore`] — the SQLite implementation of [`RegistrationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use muster_core::{
  registration::{NewRegistration, Registration, RegistrationUpdate, ScanOutcome},
  store::RegistrationStore,
};

use crate::{
  Error, Result,
  encode::{COLUMNS, RawRegistration, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Muster registration store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// statements run serialized on the connection's thread, so the attendance
/// compare-and-set and its follow-up read happen atomically with respect to
/// other scans.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Internal operations (crate error type) ────────────────────────────────

  async fn insert_inner(&self, input: NewRegistration) -> Result<Registration> {
    let now     = Utc::now();
    let now_str = encode_dt(now);

    let name          = input.name.clone();
    let index_number  = input.index_number.clone();
    let email         = input.email.clone();
    let combination   = input.combination.clone();
    let mobile_number = input.mobile_number.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO registrations (
             name, index_number, email, combination, mobile_number,
             attendance_status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
          rusqlite::params![
            input.name,
            input.index_number,
            input.email,
            input.combination,
            input.mobile_number,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| map_unique_violation(e, &index_number))?;

    Ok(Registration {
      id,
      name,
      index_number,
      email,
      combination,
      mobile_number,
      attendance_status: false,
      created_at:        now,
      updated_at:        now,
    })
  }

  async fn get_inner(&self, index_number: &str) -> Result<Option<Registration>> {
    let index = index_number.to_owned();

    let raw: Option<RawRegistration> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM registrations WHERE index_number = ?1"),
              rusqlite::params![index],
              RawRegistration::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRegistration::into_registration).transpose()
  }

  async fn list_inner(&self) -> Result<Vec<Registration>> {
    let raws: Vec<RawRegistration> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM registrations ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawRegistration::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRegistration::into_registration).collect()
  }

  async fn update_inner(
    &self,
    index_number: &str,
    update: RegistrationUpdate,
  ) -> Result<Registration> {
    if update.is_empty() {
      return Err(Error::EmptyUpdate("update contains no fields".to_string()));
    }

    let index     = index_number.to_owned();
    let new_index = update.index_number.clone().unwrap_or_else(|| index.clone());
    let now_str   = encode_dt(Utc::now());

    // Read-modify-write in a single `call`: the connection thread serializes
    // all statements, so nothing can interleave between SELECT and UPDATE.
    let raw: Option<RawRegistration> = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM registrations WHERE index_number = ?1",
            rusqlite::params![index],
            |row| row.get(0),
          )
          .optional()?;

        let Some(id) = existing else {
          return Ok(None);
        };

        conn.execute(
          "UPDATE registrations SET
             name          = COALESCE(?1, name),
             index_number  = COALESCE(?2, index_number),
             email         = COALESCE(?3, email),
             combination   = COALESCE(?4, combination),
             mobile_number = COALESCE(?5, mobile_number),
             updated_at    = ?6
           WHERE id = ?7",
          rusqlite::params![
            update.name,
            update.index_number,
            update.email,
            update.combination,
            update.mobile_number,
            now_str,
            id,
          ],
        )?;

        let raw = conn.query_row(
          &format!("SELECT {COLUMNS} FROM registrations WHERE id = ?1"),
          rusqlite::params![id],
          RawRegistration::from_row,
        )?;
        Ok(Some(raw))
      })
      .await
      .map_err(|e| map_unique_violation(e, &new_index))?;

    match raw {
      Some(raw) => raw.into_registration(),
      None => Err(Error::NotFound(index_number.to_owned())),
    }
  }

  async fn mark_attendance_inner(&self, index_number: &str) -> Result<ScanOutcome> {
    let index   = index_number.to_owned();
    let now_str = encode_dt(Utc::now());

    // Compare-and-set first, then read back. Both run in one `call`, and the
    // CAS predicate guarantees only one scan ever sees a changed row even if
    // calls could interleave.
    let (changed, raw): (usize, Option<RawRegistration>) = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE registrations
           SET attendance_status = 1, updated_at = ?2
           WHERE index_number = ?1 AND attendance_status = 0",
          rusqlite::params![index, now_str],
        )?;

        let raw = conn
          .query_row(
            &format!("SELECT {COLUMNS} FROM registrations WHERE index_number = ?1"),
            rusqlite::params![index],
            RawRegistration::from_row,
          )
          .optional()?;

        Ok((changed, raw))
      })
      .await?;

    match raw {
      Some(raw) => Ok(ScanOutcome {
        registration:    raw.into_registration()?,
        already_scanned: changed == 0,
      }),
      None => Err(Error::NotFound(index_number.to_owned())),
    }
  }

  async fn ping_inner(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Translate a UNIQUE-constraint failure on `index_number` into
/// [`Error::DuplicateIndex`]; pass every other error through.
fn map_unique_violation(err: tokio_rusqlite::Error, index: &str) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) = &err
    && e.code == rusqlite::ErrorCode::ConstraintViolation
  {
    return Error::DuplicateIndex(index.to_owned());
  }
  Error::Database(err)
}

// ─── RegistrationStore impl ──────────────────────────────────────────────────

impl RegistrationStore for SqliteStore {
  async fn insert(
    &self,
    input: NewRegistration,
  ) -> muster_core::Result<Registration> {
    self.insert_inner(input).await.map_err(Into::into)
  }

  async fn get(
    &self,
    index_number: &str,
  ) -> muster_core::Result<Option<Registration>> {
    self.get_inner(index_number).await.map_err(Into::into)
  }

  async fn list(&self) -> muster_core::Result<Vec<Registration>> {
    self.list_inner().await.map_err(Into::into)
  }

  async fn update(
    &self,
    index_number: &str,
    update: RegistrationUpdate,
  ) -> muster_core::Result<Registration> {
    self.update_inner(index_number, update).await.map_err(Into::into)
  }

  async fn mark_attendance(
    &self,
    index_number: &str,
  ) -> muster_core::Result<ScanOutcome> {
    self.mark_attendance_inner(index_number).await.map_err(Into::into)
  }

  async fn ping(&self) -> muster_core::Result<()> {
    self.ping_inner().await.map_err(Into::into)
  }
}
