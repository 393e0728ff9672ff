use crate::{AccountRepository, EventRepository, SessionStore, StoreError, StoreErrorCode};
use std::sync::{Mutex, MutexGuard};
use velada_model::{AccountRecord, EventRecord, RecordId, SessionState};

/// In-process backend for tests and ephemeral runs; nothing survives
/// the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<AccountRecord>>,
    events: Mutex<Vec<EventRecord>>,
    session: Mutex<SessionState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn guard<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::new(StoreErrorCode::Internal, format!("{what} mutex poisoned")))
}

impl AccountRepository for MemoryStore {
    fn list_all(&self) -> Result<Vec<AccountRecord>, StoreError> {
        Ok(guard(&self.accounts, "accounts")?.clone())
    }

    fn append(&self, record: &AccountRecord) -> Result<(), StoreError> {
        guard(&self.accounts, "accounts")?.push(record.clone());
        Ok(())
    }
}

impl EventRepository for MemoryStore {
    fn list_all(&self) -> Result<Vec<EventRecord>, StoreError> {
        Ok(guard(&self.events, "events")?.clone())
    }

    fn append(&self, record: &EventRecord) -> Result<(), StoreError> {
        guard(&self.events, "events")?.push(record.clone());
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn current(&self) -> Result<SessionState, StoreError> {
        Ok(guard(&self.session, "session")?.clone())
    }

    fn open(&self, user: &RecordId) -> Result<(), StoreError> {
        *guard(&self.session, "session")? = SessionState::for_user(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *guard(&self.session, "session")? = SessionState::logged_out();
        Ok(())
    }
}
