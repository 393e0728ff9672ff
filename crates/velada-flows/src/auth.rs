// SPDX-License-Identifier: Apache-2.0

use crate::logging::{FlowEvent, FlowLog, FlowStage};
use crate::AuthError;
use std::collections::BTreeMap;
use std::fmt::Formatter;
use tracing::{info, warn};
use velada_model::{Email, RecordId, Route};
use velada_store::{AccountRepository, SessionStore, StoreError};

/// Raw login form values. Login mirrors the stored-record comparison
/// and never runs field validation; a malformed email simply matches
/// nothing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user_id: RecordId,
    /// First name, for the caller's greeting line.
    pub display_name: String,
    pub redirect: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetLookup {
    Found { email: Email },
    Unknown,
}

pub fn login(
    accounts: &dyn AccountRepository,
    sessions: &dyn SessionStore,
    credentials: &Credentials,
) -> Result<LoginOutcome, AuthError> {
    login_with_events(accounts, sessions, credentials).map(|(outcome, _)| outcome)
}

pub fn login_with_events(
    accounts: &dyn AccountRepository,
    sessions: &dyn SessionStore,
    credentials: &Credentials,
) -> Result<(LoginOutcome, Vec<FlowEvent>), AuthError> {
    let mut log = FlowLog::default();
    log.emit(FlowStage::Lookup, "login.scan", BTreeMap::new());
    let records = accounts.list_all()?;
    let Some(record) = records.iter().find(|record| {
        record.email.as_str() == credentials.email
            && record.password.matches(&credentials.password)
    }) else {
        warn!("login rejected: no record matches the credentials");
        return Err(AuthError::InvalidCredentials);
    };

    log.emit(
        FlowStage::Session,
        "login.open_session",
        BTreeMap::from([("id".to_string(), record.id.to_string())]),
    );
    sessions.open(&record.id)?;
    info!(id = %record.id, "session opened");

    Ok((
        LoginOutcome {
            user_id: record.id.clone(),
            display_name: record.first_name.as_str().to_string(),
            redirect: Route::EventsList,
        },
        log.events().to_vec(),
    ))
}

/// Clearing an already-cleared session is a success; the caller cannot
/// tell the difference and should not have to.
pub fn logout(sessions: &dyn SessionStore) -> Result<(), AuthError> {
    sessions.clear()?;
    info!("session cleared");
    Ok(())
}

/// Reports whether an account exists for the address. Nothing is sent
/// and nothing changes; the outcome feeds the caller's dialog. A
/// malformed address is reported as unknown since no stored record can
/// carry one.
pub fn password_reset_lookup(
    accounts: &dyn AccountRepository,
    raw_email: &str,
) -> Result<ResetLookup, AuthError> {
    let Ok(email) = Email::parse(raw_email) else {
        return Ok(ResetLookup::Unknown);
    };
    let found = find_by_email(accounts, &email)?;
    Ok(match found {
        Some(email) => ResetLookup::Found { email },
        None => ResetLookup::Unknown,
    })
}

fn find_by_email(
    accounts: &dyn AccountRepository,
    email: &Email,
) -> Result<Option<Email>, StoreError> {
    Ok(accounts
        .list_all()?
        .into_iter()
        .find(|record| record.email == *email)
        .map(|record| record.email))
}
