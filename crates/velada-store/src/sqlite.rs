// SPDX-License-Identifier: Apache-2.0

use crate::{
    AccountRepository, EventRepository, SessionStore, StoreError, StoreErrorCode, SESSION_FLAG_KEY,
    SESSION_FLAG_TRUE, SESSION_USER_KEY,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use velada_model::{
    AccountRecord, Email, EventDate, EventDescription, EventRecord, EventTitle, FirstName,
    LastName, NationalId, Phone, RecordId, SessionState, StoredPassword,
};

pub const SQLITE_SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
      seq INTEGER PRIMARY KEY AUTOINCREMENT,
      id TEXT NOT NULL UNIQUE,
      nombre TEXT NOT NULL,
      apellido TEXT NOT NULL,
      correo TEXT NOT NULL UNIQUE,
      contrasena TEXT NOT NULL,
      cedula TEXT NOT NULL UNIQUE,
      telefono TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS events (
      seq INTEGER PRIMARY KEY AUTOINCREMENT,
      id TEXT NOT NULL UNIQUE,
      titulo TEXT NOT NULL,
      fecha TEXT NOT NULL,
      descripcion TEXT NOT NULL,
      imagen TEXT,
      creado_por TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS velada_meta (
      k TEXT PRIMARY KEY,
      v TEXT NOT NULL
    ) WITHOUT ROWID;
";

/// Relational backend. The flow layer still performs its duplicate
/// scans; the unique indexes are the backstop that turns a lost race
/// into a conflict instead of a second row.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
            }
        }
        let conn = Connection::open(path).map_err(map_sqlite_err)?;
        conn.execute_batch(SCHEMA).map_err(map_sqlite_err)?;
        conn.execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))
            .map_err(map_sqlite_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "connection mutex poisoned"))
    }
}

fn map_sqlite_err(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(inner, _) = &err {
        if inner.code == rusqlite::ErrorCode::ConstraintViolation {
            return StoreError::new(StoreErrorCode::Conflict, err.to_string());
        }
        if inner.code == rusqlite::ErrorCode::CannotOpen {
            return StoreError::new(StoreErrorCode::Io, err.to_string());
        }
    }
    StoreError::new(StoreErrorCode::Internal, err.to_string())
}

fn corrupt(what: &str, err: impl Display) -> StoreError {
    StoreError::new(StoreErrorCode::Corrupt, format!("{what}: {err}"))
}

fn meta_get(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    conn.query_row(
        "SELECT v FROM velada_meta WHERE k = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(map_sqlite_err)
}

impl AccountRepository for SqliteStore {
    fn list_all(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT nombre, apellido, correo, contrasena, cedula, telefono, id
                 FROM accounts ORDER BY seq",
            )
            .map_err(map_sqlite_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(map_sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite_err)?;

        rows.into_iter()
            .map(
                |(first_name, last_name, email, password, national_id, phone, id)| {
                    Ok(AccountRecord::new(
                        FirstName::parse(&first_name)
                            .map_err(|e| corrupt("stored first name", e))?,
                        LastName::parse(&last_name).map_err(|e| corrupt("stored last name", e))?,
                        Email::parse(&email).map_err(|e| corrupt("stored email", e))?,
                        StoredPassword::from_stored(password),
                        NationalId::parse(&national_id)
                            .map_err(|e| corrupt("stored national id", e))?,
                        Phone::parse(&phone).map_err(|e| corrupt("stored phone", e))?,
                        RecordId::parse(&id).map_err(|e| corrupt("stored account id", e))?,
                    ))
                },
            )
            .collect()
    }

    fn append(&self, record: &AccountRecord) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (id, nombre, apellido, correo, contrasena, cedula, telefono)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.as_str(),
                record.first_name.as_str(),
                record.last_name.as_str(),
                record.email.as_str(),
                record.password.as_str(),
                record.national_id.as_str(),
                record.phone.as_str(),
            ],
        )
        .map_err(map_sqlite_err)?;
        Ok(())
    }
}

impl EventRepository for SqliteStore {
    fn list_all(&self) -> Result<Vec<EventRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT titulo, fecha, descripcion, imagen, creado_por, id
                 FROM events ORDER BY seq",
            )
            .map_err(map_sqlite_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(map_sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite_err)?;

        rows.into_iter()
            .map(|(title, date, description, image, created_by, id)| {
                Ok(EventRecord::new(
                    EventTitle::parse(&title).map_err(|e| corrupt("stored event title", e))?,
                    EventDate::parse(&date).map_err(|e| corrupt("stored event date", e))?,
                    EventDescription::parse(&description)
                        .map_err(|e| corrupt("stored event description", e))?,
                    image,
                    RecordId::parse(&created_by).map_err(|e| corrupt("stored event creator", e))?,
                    RecordId::parse(&id).map_err(|e| corrupt("stored event id", e))?,
                ))
            })
            .collect()
    }

    fn append(&self, record: &EventRecord) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO events (id, titulo, fecha, descripcion, imagen, creado_por)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.as_str(),
                record.title.as_str(),
                record.date.as_str(),
                record.description.as_str(),
                record.image,
                record.created_by.as_str(),
            ],
        )
        .map_err(map_sqlite_err)?;
        Ok(())
    }

    fn find_by_id(&self, id: &RecordId) -> Result<Option<EventRecord>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT titulo, fecha, descripcion, imagen, creado_por, id
                 FROM events WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()
            .map_err(map_sqlite_err)?;

        row.map(|(title, date, description, image, created_by, id)| {
            Ok(EventRecord::new(
                EventTitle::parse(&title).map_err(|e| corrupt("stored event title", e))?,
                EventDate::parse(&date).map_err(|e| corrupt("stored event date", e))?,
                EventDescription::parse(&description)
                    .map_err(|e| corrupt("stored event description", e))?,
                image,
                RecordId::parse(&created_by).map_err(|e| corrupt("stored event creator", e))?,
                RecordId::parse(&id).map_err(|e| corrupt("stored event id", e))?,
            ))
        })
        .transpose()
    }
}

impl SessionStore for SqliteStore {
    fn current(&self) -> Result<SessionState, StoreError> {
        let conn = self.conn()?;
        let logged_in =
            meta_get(&conn, SESSION_FLAG_KEY)?.as_deref() == Some(SESSION_FLAG_TRUE);
        let current_user_id = match meta_get(&conn, SESSION_USER_KEY)? {
            Some(raw) => Some(
                RecordId::parse(&raw).map_err(|e| corrupt("stored session user id", e))?,
            ),
            None => None,
        };
        Ok(SessionState {
            logged_in,
            current_user_id,
        })
    }

    fn open(&self, user: &RecordId) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO velada_meta (k, v) VALUES (?1, ?2)",
            params![SESSION_FLAG_KEY, SESSION_FLAG_TRUE],
        )
        .map_err(map_sqlite_err)?;
        conn.execute(
            "INSERT OR REPLACE INTO velada_meta (k, v) VALUES (?1, ?2)",
            params![SESSION_USER_KEY, user.as_str()],
        )
        .map_err(map_sqlite_err)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM velada_meta WHERE k IN (?1, ?2)",
            params![SESSION_FLAG_KEY, SESSION_USER_KEY],
        )
        .map_err(map_sqlite_err)?;
        Ok(())
    }
}
