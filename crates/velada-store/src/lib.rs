#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};
use velada_model::{AccountRecord, EventRecord, RecordId, SessionState};

mod local_file;
mod memory;
mod sqlite;

pub use local_file::LocalStorageStore;
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, SQLITE_SCHEMA_VERSION};

pub const CRATE_NAME: &str = "velada-store";

/// Storage keys shared by every backend. The names come from the data
/// this crate must stay able to read, so they are not negotiable.
pub const ACCOUNTS_KEY: &str = "registroData";
pub const EVENTS_KEY: &str = "eventosData";
pub const SESSION_FLAG_KEY: &str = "isLoggin";
pub const SESSION_USER_KEY: &str = "idUsuario";
pub const SESSION_FLAG_TRUE: &str = "true";

pub const LOCAL_STORE_FILE: &str = "localstorage.json";
pub const SQLITE_STORE_FILE: &str = "velada.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    Conflict,
    Corrupt,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Corrupt => "corrupt_store",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Append-only account storage. `append` must be atomic against other
/// appends on the same store instance.
pub trait AccountRepository: Send + Sync {
    fn list_all(&self) -> Result<Vec<AccountRecord>, StoreError>;
    fn append(&self, record: &AccountRecord) -> Result<(), StoreError>;
}

pub trait EventRepository: Send + Sync {
    fn list_all(&self) -> Result<Vec<EventRecord>, StoreError>;
    fn append(&self, record: &EventRecord) -> Result<(), StoreError>;

    fn find_by_id(&self, id: &RecordId) -> Result<Option<EventRecord>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|record| record.id == *id))
    }
}

/// The persisted session. `clear` succeeds whether or not a session
/// exists.
pub trait SessionStore: Send + Sync {
    fn current(&self) -> Result<SessionState, StoreError>;
    fn open(&self, user: &RecordId) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}
