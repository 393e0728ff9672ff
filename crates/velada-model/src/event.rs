use crate::account::RecordId;
use crate::fields::ParseError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

pub const EVENT_TITLE_MAX_LEN: usize = 80;
pub const EVENT_DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventField {
    Title,
    Date,
    Description,
}

impl EventField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Date => "date",
            Self::Description => "description",
        }
    }
}

impl Display for EventField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn event_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("event date pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct EventTitle(String);

impl EventTitle {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("event title"));
        }
        if input.chars().count() > EVENT_TITLE_MAX_LEN {
            return Err(ParseError::TooLong("event title", EVENT_TITLE_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct EventDate(String);

impl EventDate {
    /// Calendar-level strings only; the date is displayed, never
    /// computed with.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("event date"));
        }
        if !event_date_pattern().is_match(input) {
            return Err(ParseError::InvalidFormat(
                "event date must use the YYYY-MM-DD format",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct EventDescription(String);

impl EventDescription {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty("event description"));
        }
        if input.chars().count() > EVENT_DESCRIPTION_MAX_LEN {
            return Err(ParseError::TooLong(
                "event description",
                EVENT_DESCRIPTION_MAX_LEN,
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One published event, in its persisted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct EventRecord {
    #[serde(rename = "titulo")]
    pub title: EventTitle,
    #[serde(rename = "fecha")]
    pub date: EventDate,
    #[serde(rename = "descripcion")]
    pub description: EventDescription,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "creadoPor")]
    pub created_by: RecordId,
    pub id: RecordId,
}

impl EventRecord {
    #[must_use]
    pub fn new(
        title: EventTitle,
        date: EventDate,
        description: EventDescription,
        image: Option<String>,
        created_by: RecordId,
        id: RecordId,
    ) -> Self {
        Self {
            title,
            date,
            description,
            image,
            created_by,
            id,
        }
    }
}

/// Raw event form input; `image` is free-form and optional, an empty
/// value means no image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInput {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image: String,
}

impl EventInput {
    pub fn validate(&self) -> Result<ValidatedEvent, BTreeMap<EventField, ParseError>> {
        let mut errors = BTreeMap::new();
        let title = collect(&mut errors, EventField::Title, EventTitle::parse(&self.title));
        let date = collect(&mut errors, EventField::Date, EventDate::parse(&self.date));
        let description = collect(
            &mut errors,
            EventField::Description,
            EventDescription::parse(&self.description),
        );

        match (title, date, description) {
            (Some(title), Some(date), Some(description)) if errors.is_empty() => {
                Ok(ValidatedEvent {
                    title,
                    date,
                    description,
                    image: if self.image.trim().is_empty() {
                        None
                    } else {
                        Some(self.image.clone())
                    },
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedEvent {
    pub title: EventTitle,
    pub date: EventDate,
    pub description: EventDescription,
    pub image: Option<String>,
}

fn collect<T>(
    errors: &mut BTreeMap<EventField, ParseError>,
    field: EventField,
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
