#![forbid(unsafe_code)]
//! Registration and event domain model SSOT.
//!
//! ```compile_fail
//! use velada_model::PasswordScheme;
//!
//! fn exhaustive_match(s: PasswordScheme) -> &'static str {
//!     match s {
//!         PasswordScheme::Argon2id => "argon2id",
//!         PasswordScheme::PlaintextLegacy => "legacy",
//!     }
//! }
//! ```

mod account;
mod event;
mod fields;
mod national_id;
mod nav;
mod password;
mod session;

pub use account::{
    AccountRecord, RecordId, RegistrationInput, ValidatedRegistration, RECORD_ID_MAX_LEN,
};
pub use event::{
    EventDate, EventDescription, EventField, EventInput, EventRecord, EventTitle, ValidatedEvent,
    EVENT_DESCRIPTION_MAX_LEN, EVENT_TITLE_MAX_LEN,
};
pub use fields::{
    check_password_repeat, Email, Field, FirstName, LastName, ParseError, Phone, PlainPassword,
    PASSWORD_MAX_LEN, PASSWORD_MIN_LEN, PERSON_NAME_MAX_LEN, PHONE_MAX_DIGITS, PHONE_MIN_DIGITS,
};
pub use national_id::{NationalId, NATIONAL_ID_LEN, REGION_CODE_MAX, REGION_CODE_MIN};
pub use nav::{visible_links, NavEntry, Route};
pub use password::{
    PasswordError, PasswordScheme, StoredPassword, PHC_ARGON2_PREFIX,
};
pub use session::SessionState;

pub const CRATE_NAME: &str = "velada-model";
