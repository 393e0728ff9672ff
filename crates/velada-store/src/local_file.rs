// SPDX-License-Identifier: Apache-2.0

use crate::{
    AccountRepository, EventRepository, SessionStore, StoreError, StoreErrorCode, ACCOUNTS_KEY,
    EVENTS_KEY, SESSION_FLAG_KEY, SESSION_FLAG_TRUE, SESSION_USER_KEY,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use velada_model::{AccountRecord, EventRecord, RecordId, SessionState};

/// Single-file backend with the exact layout of the browser-era data:
/// one JSON object of string keys to string values, where the record
/// collections are themselves JSON arrays encoded as strings.
///
/// Every operation reads the file fresh, so concurrent processes see
/// each other's committed writes; the mutex serializes the
/// read-modify-write sequence within this process.
#[derive(Debug)]
pub struct LocalStorageStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStorageStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "storage mutex poisoned"))
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                StoreError::new(
                    StoreErrorCode::Corrupt,
                    format!("storage file is not a string map: {e}"),
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StoreError::new(StoreErrorCode::Io, e.to_string())),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(map)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        write_and_sync(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Ok(())
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        decode_list(self.read_map()?.get(key), key)
    }

    fn append_to_list<T>(&self, key: &str, record: &T) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let _guard = self.lock()?;
        let mut map = self.read_map()?;
        let mut records: Vec<T> = decode_list(map.get(key), key)?;
        records.push(record.clone());
        map.insert(key.to_string(), encode_list(&records)?);
        self.write_map(&map)
    }
}

fn decode_list<T: DeserializeOwned>(raw: Option<&String>, key: &str) -> Result<Vec<T>, StoreError> {
    match raw {
        Some(raw) => serde_json::from_str(raw).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Corrupt,
                format!("value under {key} is not a valid record array: {e}"),
            )
        }),
        None => Ok(Vec::new()),
    }
}

fn encode_list<T: Serialize>(records: &[T]) -> Result<String, StoreError> {
    serde_json::to_string(records)
        .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut file =
        File::create(path).map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
    file.write_all(bytes)
        .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
    file.sync_all()
        .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))
}

impl AccountRepository for LocalStorageStore {
    fn list_all(&self) -> Result<Vec<AccountRecord>, StoreError> {
        self.read_list(ACCOUNTS_KEY)
    }

    fn append(&self, record: &AccountRecord) -> Result<(), StoreError> {
        self.append_to_list(ACCOUNTS_KEY, record)
    }
}

impl EventRepository for LocalStorageStore {
    fn list_all(&self) -> Result<Vec<EventRecord>, StoreError> {
        self.read_list(EVENTS_KEY)
    }

    fn append(&self, record: &EventRecord) -> Result<(), StoreError> {
        self.append_to_list(EVENTS_KEY, record)
    }
}

impl SessionStore for LocalStorageStore {
    fn current(&self) -> Result<SessionState, StoreError> {
        let map = self.read_map()?;
        let logged_in = map.get(SESSION_FLAG_KEY).map(String::as_str) == Some(SESSION_FLAG_TRUE);
        let current_user_id = match map.get(SESSION_USER_KEY) {
            Some(raw) => Some(RecordId::parse(raw).map_err(|e| {
                StoreError::new(
                    StoreErrorCode::Corrupt,
                    format!("stored session user id is invalid: {e}"),
                )
            })?),
            None => None,
        };
        Ok(SessionState {
            logged_in,
            current_user_id,
        })
    }

    fn open(&self, user: &RecordId) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        let mut map = self.read_map()?;
        map.insert(SESSION_FLAG_KEY.to_string(), SESSION_FLAG_TRUE.to_string());
        map.insert(SESSION_USER_KEY.to_string(), user.as_str().to_string());
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        let mut map = self.read_map()?;
        let flag_removed = map.remove(SESSION_FLAG_KEY).is_some();
        let user_removed = map.remove(SESSION_USER_KEY).is_some();
        if flag_removed || user_removed {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
