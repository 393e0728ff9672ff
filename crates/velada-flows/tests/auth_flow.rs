// SPDX-License-Identifier: Apache-2.0

use velada_core::clock::SteppingClock;
use velada_flows::{
    login, login_with_events, logout, password_reset_lookup, register_account, AuthError,
    Credentials, FlowStage, RegisterPolicy, ResetLookup,
};
use velada_model::{
    AccountRecord, Email, FirstName, LastName, NationalId, Phone, RecordId, RegistrationInput,
    Route, StoredPassword,
};
use velada_store::{AccountRepository, MemoryStore, SessionStore};

fn registered_store() -> MemoryStore {
    let store = MemoryStore::new();
    let clock = SteppingClock::starting_at(1_714_003_200_000);
    let input = RegistrationInput {
        first_name: "Ana".to_string(),
        last_name: "Mora".to_string(),
        email: "ana@example.com".to_string(),
        password: "clave1".to_string(),
        password_repeat: "clave1".to_string(),
        national_id: "1710034065".to_string(),
        phone: "0991234567".to_string(),
    };
    register_account(&store, &clock, RegisterPolicy::default(), &input).expect("registration");
    store
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn registered_pair_logs_in_and_opens_the_session() {
    let store = registered_store();

    let outcome = login(&store, &store, &credentials("ana@example.com", "clave1"))
        .expect("login");
    assert_eq!(outcome.display_name, "Ana");
    assert_eq!(outcome.redirect, Route::EventsList);
    assert_eq!(outcome.user_id, RecordId::from_millis(1_714_003_200_000));

    let session = store.current().expect("session");
    assert!(session.is_authenticated());
    assert_eq!(session.current_user_id, Some(outcome.user_id));
}

#[test]
fn wrong_credentials_leave_the_session_untouched() {
    let store = registered_store();

    let err = login(&store, &store, &credentials("ana@example.com", "clave2"))
        .expect_err("wrong password");
    assert_eq!(err, AuthError::InvalidCredentials);

    let err = login(&store, &store, &credentials("Ana@example.com", "clave1"))
        .expect_err("email comparison is case sensitive");
    assert_eq!(err, AuthError::InvalidCredentials);

    let err = login(&store, &store, &credentials("nadie@example.com", "clave1"))
        .expect_err("unknown email");
    assert_eq!(err, AuthError::InvalidCredentials);

    let session = store.current().expect("session");
    assert!(!session.logged_in);
    assert!(session.current_user_id.is_none());
}

#[test]
fn legacy_plaintext_record_still_logs_in() {
    let store = MemoryStore::new();
    AccountRepository::append(
        &store,
        &AccountRecord::new(
            FirstName::parse("Maria").expect("first name"),
            LastName::parse("Paz").expect("last name"),
            Email::parse("maria@example.com").expect("email"),
            StoredPassword::from_stored("secreta".to_string()),
            NationalId::parse("0912345675").expect("cedula"),
            Phone::parse("0987654321").expect("phone"),
            RecordId::from_millis(1_713_999_999_999),
        ),
    )
    .expect("seed legacy record");

    let outcome = login(&store, &store, &credentials("maria@example.com", "secreta"))
        .expect("legacy login");
    assert_eq!(outcome.display_name, "Maria");

    let err = login(&store, &store, &credentials("maria@example.com", "SECRETA"))
        .expect_err("legacy comparison is exact");
    assert_eq!(err, AuthError::InvalidCredentials);
}

#[test]
fn login_traces_lookup_then_session() {
    let store = registered_store();

    let (_, events) = login_with_events(&store, &store, &credentials("ana@example.com", "clave1"))
        .expect("login");
    let stages: Vec<FlowStage> = events.iter().map(|event| event.stage).collect();
    assert_eq!(stages, vec![FlowStage::Lookup, FlowStage::Session]);
    assert_eq!(events[1].name, "login.open_session");
}

#[test]
fn logout_clears_and_repeating_it_stays_ok() {
    let store = registered_store();
    login(&store, &store, &credentials("ana@example.com", "clave1")).expect("login");
    assert!(store.current().expect("session").is_authenticated());

    logout(&store).expect("logout");
    let session = store.current().expect("session");
    assert!(!session.logged_in);
    assert!(session.current_user_id.is_none());

    logout(&store).expect("logout when already logged out");
}

#[test]
fn reset_lookup_reports_found_unknown_and_malformed() {
    let store = registered_store();

    let found = password_reset_lookup(&store, "ana@example.com").expect("lookup");
    assert_eq!(
        found,
        ResetLookup::Found {
            email: Email::parse("ana@example.com").expect("email"),
        }
    );

    let unknown = password_reset_lookup(&store, "nadie@example.com").expect("lookup");
    assert_eq!(unknown, ResetLookup::Unknown);

    let malformed = password_reset_lookup(&store, "not-an-email").expect("lookup");
    assert_eq!(malformed, ResetLookup::Unknown);

    let session = store.current().expect("session");
    assert!(!session.logged_in, "lookup must not touch the session");
}
