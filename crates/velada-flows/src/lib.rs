// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Orchestrated operations over the record store: registration,
//! authentication, password-reset lookup, and the event catalog. Flows
//! take their capabilities as trait objects and never render; callers
//! decide what to do with outcomes and redirect targets.

mod auth;
mod duplicates;
mod events;
mod logging;
mod register;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use velada_core::clock::Clock;
use velada_model::{EventField, Field, ParseError, RecordId};
use velada_store::StoreError;

pub const CRATE_NAME: &str = "velada-flows";

pub use auth::{
    login, login_with_events, logout, password_reset_lookup, Credentials, LoginOutcome,
    ResetLookup,
};
pub use duplicates::{email_taken, national_id_taken};
pub use events::{
    create_event, create_event_with_events, event_detail, list_events, EventOutcome,
};
pub use logging::{FlowEvent, FlowLog, FlowStage};
pub use register::{
    register_account, register_account_with_events, RegisterPolicy, RegistrationOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    Validation {
        field_errors: BTreeMap<Field, ParseError>,
    },
    DuplicateEmail,
    DuplicateNationalId,
    Store(StoreError),
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field_errors } => {
                write!(f, "validation failed for {} field(s)", field_errors.len())
            }
            Self::DuplicateEmail => f.write_str("an account with this email already exists"),
            Self::DuplicateNationalId => {
                f.write_str("an account with this national id already exists")
            }
            Self::Store(err) => write!(f, "store error: {err}"),
        }
    }
}

impl std::error::Error for RegistrationError {}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    Store(StoreError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => f.write_str("email or password is incorrect"),
            Self::Store(err) => write!(f, "store error: {err}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    NotLoggedIn,
    Validation {
        field_errors: BTreeMap<EventField, ParseError>,
    },
    UnknownEvent,
    Store(StoreError),
}

impl Display for EventError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoggedIn => f.write_str("creating an event requires being logged in"),
            Self::Validation { field_errors } => {
                write!(f, "validation failed for {} field(s)", field_errors.len())
            }
            Self::UnknownEvent => f.write_str("no event with this id exists"),
            Self::Store(err) => write!(f, "store error: {err}"),
        }
    }
}

impl std::error::Error for EventError {}

impl From<StoreError> for EventError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Timestamp ids collide when two records are minted within the same
/// millisecond; bump forward until the id is free in its collection.
pub(crate) fn mint_unique_id(clock: &dyn Clock, taken: &BTreeSet<&str>) -> RecordId {
    let mut millis = clock.now_millis();
    loop {
        let candidate = RecordId::from_millis(millis);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        millis += 1;
    }
}
