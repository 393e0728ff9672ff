// SPDX-License-Identifier: Apache-2.0

use crate::logging::{FlowEvent, FlowLog, FlowStage};
use crate::{mint_unique_id, EventError};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};
use velada_core::clock::Clock;
use velada_model::{EventInput, EventRecord, RecordId, Route};
use velada_store::{EventRepository, SessionStore};

#[derive(Debug, Clone)]
pub struct EventOutcome {
    pub record: EventRecord,
    pub redirect: Route,
}

pub fn create_event(
    events: &dyn EventRepository,
    sessions: &dyn SessionStore,
    clock: &dyn Clock,
    input: &EventInput,
) -> Result<EventOutcome, EventError> {
    create_event_with_events(events, sessions, clock, input).map(|(outcome, _)| outcome)
}

/// Session-gated: only a logged-in user can publish, and the record is
/// stamped with that user's id.
pub fn create_event_with_events(
    events: &dyn EventRepository,
    sessions: &dyn SessionStore,
    clock: &dyn Clock,
    input: &EventInput,
) -> Result<(EventOutcome, Vec<FlowEvent>), EventError> {
    let mut log = FlowLog::default();
    log.emit(FlowStage::Session, "event.gate", BTreeMap::new());
    let session = sessions.current()?;
    let created_by = match (session.logged_in, session.current_user_id) {
        (true, Some(user)) => user,
        _ => {
            warn!("event creation rejected: not logged in");
            return Err(EventError::NotLoggedIn);
        }
    };

    log.emit(FlowStage::Validate, "event.validate", BTreeMap::new());
    let validated = input.validate().map_err(|field_errors| {
        warn!(
            rejected_fields = field_errors.len(),
            "event creation rejected: invalid fields"
        );
        EventError::Validation { field_errors }
    })?;

    let existing = events.list_all()?;
    let taken: BTreeSet<&str> = existing.iter().map(|record| record.id.as_str()).collect();
    let id = mint_unique_id(clock, &taken);
    let record = EventRecord::new(
        validated.title,
        validated.date,
        validated.description,
        validated.image,
        created_by,
        id,
    );

    log.emit(
        FlowStage::Persist,
        "event.append",
        BTreeMap::from([("id".to_string(), record.id.to_string())]),
    );
    events.append(&record)?;
    info!(id = %record.id, "event created");

    Ok((
        EventOutcome {
            record,
            redirect: Route::EventsList,
        },
        log.events().to_vec(),
    ))
}

pub fn list_events(events: &dyn EventRepository) -> Result<Vec<EventRecord>, EventError> {
    Ok(events.list_all()?)
}

pub fn event_detail(
    events: &dyn EventRepository,
    id: &RecordId,
) -> Result<EventRecord, EventError> {
    events.find_by_id(id)?.ok_or(EventError::UnknownEvent)
}
