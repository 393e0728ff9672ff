use crate::fields::{
    check_password_repeat, Email, Field, FirstName, LastName, ParseError, Phone, PlainPassword,
};
use crate::national_id::NationalId;
use crate::password::StoredPassword;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const RECORD_ID_MAX_LEN: usize = 64;

/// Creation-time identifier, minted from a millisecond timestamp and
/// kept as its decimal string form on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct RecordId(String);

impl RecordId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("record id"));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(ParseError::InvalidFormat(
                "record id must not contain whitespace",
            ));
        }
        if input.len() > RECORD_ID_MAX_LEN {
            return Err(ParseError::TooLong("record id", RECORD_ID_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One registered account, in its persisted shape. Field names and
/// their order are the storage contract; the password confirmation
/// never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AccountRecord {
    #[serde(rename = "nombre")]
    pub first_name: FirstName,
    #[serde(rename = "apellido")]
    pub last_name: LastName,
    #[serde(rename = "correo")]
    pub email: Email,
    #[serde(rename = "contrasena")]
    pub password: StoredPassword,
    #[serde(rename = "cedula")]
    pub national_id: NationalId,
    #[serde(rename = "telefono")]
    pub phone: Phone,
    pub id: RecordId,
}

impl AccountRecord {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        first_name: FirstName,
        last_name: LastName,
        email: Email,
        password: StoredPassword,
        national_id: NationalId,
        phone: Phone,
        id: RecordId,
    ) -> Self {
        Self {
            first_name,
            last_name,
            email,
            password,
            national_id,
            phone,
            id,
        }
    }
}

/// Raw form input. Every field is validated; failures are collected
/// per field rather than stopping at the first one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_repeat: String,
    pub national_id: String,
    pub phone: String,
}

impl RegistrationInput {
    pub fn validate(&self) -> Result<ValidatedRegistration, BTreeMap<Field, ParseError>> {
        let mut errors = BTreeMap::new();
        let first_name = collect(&mut errors, Field::FirstName, FirstName::parse(&self.first_name));
        let last_name = collect(&mut errors, Field::LastName, LastName::parse(&self.last_name));
        let email = collect(&mut errors, Field::Email, Email::parse(&self.email));
        let password = collect(
            &mut errors,
            Field::Password,
            PlainPassword::parse(&self.password),
        );
        if let Err(err) = check_password_repeat(&self.password, &self.password_repeat) {
            errors.insert(Field::PasswordRepeat, err);
        }
        let national_id = collect(
            &mut errors,
            Field::NationalId,
            NationalId::parse(&self.national_id),
        );
        let phone = collect(&mut errors, Field::Phone, Phone::parse(&self.phone));

        match (first_name, last_name, email, password, national_id, phone) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(password),
                Some(national_id),
                Some(phone),
            ) if errors.is_empty() => Ok(ValidatedRegistration {
                first_name,
                last_name,
                email,
                password,
                national_id,
                phone,
            }),
            _ => Err(errors),
        }
    }
}

impl std::fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("password_repeat", &"***")
            .field("national_id", &self.national_id)
            .field("phone", &self.phone)
            .finish()
    }
}

/// Outcome of a fully successful form validation; the password is
/// still cleartext and must go through hashing before persistence.
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub first_name: FirstName,
    pub last_name: LastName,
    pub email: Email,
    pub password: PlainPassword,
    pub national_id: NationalId,
    pub phone: Phone,
}

fn collect<T>(
    errors: &mut BTreeMap<Field, ParseError>,
    field: Field,
    parsed: Result<T, ParseError>,
) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(err) => {
            errors.insert(field, err);
            None
        }
    }
}
