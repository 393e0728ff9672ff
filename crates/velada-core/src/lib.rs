#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

pub const CRATE_NAME: &str = "velada-core";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    Conflict = 4,
    Unauthorized = 5,
    NotFound = 6,
    Internal = 10,
}

pub const ENV_VELADA_LOG_LEVEL: &str = "VELADA_LOG_LEVEL";
pub const ENV_VELADA_DATA_DIR: &str = "VELADA_DATA_DIR";

#[must_use]
pub fn resolve_velada_data_dir() -> PathBuf {
    if let Ok(explicit) = std::env::var(ENV_VELADA_DATA_DIR) {
        let trimmed = explicit.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        let trimmed = xdg_data_home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed).join("velada");
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed)
                .join(".local")
                .join("share")
                .join("velada");
        }
    }

    PathBuf::from(".velada").join("data")
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl MachineError {
    #[must_use]
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

pub mod clock {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Millisecond wall clock behind a port so record identifiers stay
    /// deterministic under test.
    pub trait Clock: Send + Sync {
        fn now_millis(&self) -> u64;
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now_millis(&self) -> u64 {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or(0)
        }
    }

    /// Advances by one millisecond per reading.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: AtomicU64,
    }

    impl SteppingClock {
        #[must_use]
        pub fn starting_at(millis: u64) -> Self {
            Self {
                next: AtomicU64::new(millis),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now_millis(&self) -> u64 {
            self.next.fetch_add(1, Ordering::Relaxed)
        }
    }
}
