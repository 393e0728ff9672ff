// SPDX-License-Identifier: Apache-2.0

use crate::account::RecordId;
use serde::{Deserialize, Serialize};

/// Who is signed in right now. The two fields mirror the two persisted
/// session keys; both absent means logged out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionState {
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_id: Option<RecordId>,
}

impl SessionState {
    #[must_use]
    pub fn logged_out() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_user(id: RecordId) -> Self {
        Self {
            logged_in: true,
            current_user_id: Some(id),
        }
    }

    /// True only when the flag and the user id agree; a flag without an
    /// id (or the reverse) counts as logged out.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.logged_in && self.current_user_id.is_some()
    }
}
