// SPDX-License-Identifier: Apache-2.0

use crate::duplicates::{email_taken, national_id_taken};
use crate::logging::{FlowEvent, FlowLog, FlowStage};
use crate::{mint_unique_id, RegistrationError};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};
use velada_core::clock::Clock;
use velada_model::{
    AccountRecord, PasswordScheme, RegistrationInput, Route, StoredPassword,
};
use velada_store::{AccountRepository, StoreError, StoreErrorCode};

/// How the password lands in storage. Hashing is the default; the
/// legacy scheme exists so fixtures written as cleartext keep round
/// tripping byte-for-byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterPolicy {
    pub password_scheme: PasswordScheme,
}

#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub record: AccountRecord,
    pub redirect: Route,
}

pub fn register_account(
    accounts: &dyn AccountRepository,
    clock: &dyn Clock,
    policy: RegisterPolicy,
    input: &RegistrationInput,
) -> Result<RegistrationOutcome, RegistrationError> {
    register_account_with_events(accounts, clock, policy, input).map(|(outcome, _)| outcome)
}

/// Validate every field, reject duplicates, then persist exactly one
/// record. Any rejection leaves the store untouched.
pub fn register_account_with_events(
    accounts: &dyn AccountRepository,
    clock: &dyn Clock,
    policy: RegisterPolicy,
    input: &RegistrationInput,
) -> Result<(RegistrationOutcome, Vec<FlowEvent>), RegistrationError> {
    let mut log = FlowLog::default();
    log.emit(FlowStage::Validate, "register.validate", BTreeMap::new());
    let validated = input.validate().map_err(|field_errors| {
        warn!(
            rejected_fields = field_errors.len(),
            "registration rejected: invalid fields"
        );
        RegistrationError::Validation { field_errors }
    })?;

    log.emit(FlowStage::Duplicates, "register.check_email", BTreeMap::new());
    if email_taken(accounts, &validated.email)? {
        warn!("registration rejected: email already registered");
        return Err(RegistrationError::DuplicateEmail);
    }
    log.emit(
        FlowStage::Duplicates,
        "register.check_national_id",
        BTreeMap::new(),
    );
    if national_id_taken(accounts, &validated.national_id)? {
        warn!("registration rejected: national id already registered");
        return Err(RegistrationError::DuplicateNationalId);
    }

    let existing = accounts.list_all()?;
    let taken: BTreeSet<&str> = existing.iter().map(|record| record.id.as_str()).collect();
    let id = mint_unique_id(clock, &taken);
    let password = StoredPassword::for_scheme(&validated.password, policy.password_scheme)
        .map_err(|err| {
            RegistrationError::Store(StoreError::new(StoreErrorCode::Internal, err.to_string()))
        })?;
    let record = AccountRecord::new(
        validated.first_name,
        validated.last_name,
        validated.email,
        password,
        validated.national_id,
        validated.phone,
        id,
    );

    log.emit(
        FlowStage::Persist,
        "register.append",
        BTreeMap::from([("id".to_string(), record.id.to_string())]),
    );
    accounts.append(&record)?;
    info!(id = %record.id, "account registered");

    Ok((
        RegistrationOutcome {
            record,
            redirect: Route::Login,
        },
        log.events().to_vec(),
    ))
}
