// SPDX-License-Identifier: Apache-2.0

use velada_core::clock::SteppingClock;
use velada_flows::{
    create_event, create_event_with_events, event_detail, list_events, login, register_account,
    Credentials, EventError, FlowStage, RegisterPolicy,
};
use velada_model::{EventField, EventInput, RecordId, RegistrationInput, Route};
use velada_store::{EventRepository, MemoryStore};

const BASE_MILLIS: u64 = 1_714_003_200_000;

fn store_with_session() -> (MemoryStore, RecordId) {
    let store = MemoryStore::new();
    let clock = SteppingClock::starting_at(BASE_MILLIS);
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
    let outcome = login(
        &store,
        &store,
        &Credentials {
            email: "ana@example.com".to_string(),
            password: "clave1".to_string(),
        },
    )
    .expect("login");
    (store, outcome.user_id)
}

fn valid_event(i: usize) -> EventInput {
    EventInput {
        title: format!("Concierto {i}"),
        date: "2024-06-01".to_string(),
        description: "Una velada de jazz en vivo.".to_string(),
        image: String::new(),
    }
}

#[test]
fn creating_an_event_requires_a_live_session() {
    let store = MemoryStore::new();
    let clock = SteppingClock::starting_at(BASE_MILLIS);

    let err = create_event(&store, &store, &clock, &valid_event(0))
        .expect_err("logged-out creation");
    assert_eq!(err, EventError::NotLoggedIn);
    assert!(
        EventRepository::list_all(&store).expect("list").is_empty(),
        "no append"
    );
}

#[test]
fn logged_in_user_creates_an_event_stamped_with_their_id() {
    let (store, user_id) = store_with_session();
    let clock = SteppingClock::starting_at(BASE_MILLIS + 1_000);

    let outcome = create_event(&store, &store, &clock, &valid_event(0)).expect("create event");
    assert_eq!(outcome.record.created_by, user_id);
    assert_eq!(outcome.record.title.as_str(), "Concierto 0");
    assert_eq!(outcome.redirect, Route::EventsList);
    assert!(outcome.record.image.is_none());

    let listed = list_events(&store).expect("list events");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], outcome.record);
}

#[test]
fn invalid_event_fields_are_collected() {
    let (store, _) = store_with_session();
    let clock = SteppingClock::starting_at(BASE_MILLIS + 1_000);
    let input = EventInput {
        title: "   ".to_string(),
        date: "01/06/2024".to_string(),
        description: "d".repeat(501),
        image: String::new(),
    };

    let err = create_event(&store, &store, &clock, &input).expect_err("invalid event");
    let EventError::Validation { field_errors } = err else {
        panic!("expected validation error");
    };
    let fields: Vec<EventField> = field_errors.keys().copied().collect();
    assert_eq!(
        fields,
        vec![EventField::Title, EventField::Date, EventField::Description]
    );
    assert!(
        EventRepository::list_all(&store).expect("list").is_empty(),
        "no append"
    );
}

#[test]
fn a_blank_image_means_none_and_a_value_is_kept() {
    let (store, _) = store_with_session();
    let clock = SteppingClock::starting_at(BASE_MILLIS + 1_000);

    let blank = create_event(&store, &store, &clock, &valid_event(0)).expect("create event");
    assert!(blank.record.image.is_none());

    let mut with_image = valid_event(1);
    with_image.image = "https://example.com/feria.png".to_string();
    let kept = create_event(&store, &store, &clock, &with_image).expect("create event");
    assert_eq!(
        kept.record.image.as_deref(),
        Some("https://example.com/feria.png")
    );
}

#[test]
fn event_detail_finds_a_record_or_reports_unknown() {
    let (store, _) = store_with_session();
    let clock = SteppingClock::starting_at(BASE_MILLIS + 1_000);
    let created = create_event(&store, &store, &clock, &valid_event(0)).expect("create event");

    let detail = event_detail(&store, &created.record.id).expect("detail");
    assert_eq!(detail, created.record);

    let err = event_detail(&store, &RecordId::from_millis(1)).expect_err("unknown id");
    assert_eq!(err, EventError::UnknownEvent);
}

#[test]
fn listing_preserves_append_order() {
    let (store, _) = store_with_session();
    let clock = SteppingClock::starting_at(BASE_MILLIS + 1_000);
    for i in 0..3 {
        create_event(&store, &store, &clock, &valid_event(i)).expect("create event");
    }

    let titles: Vec<String> = list_events(&store)
        .expect("list events")
        .iter()
        .map(|event| event.title.as_str().to_string())
        .collect();
    assert_eq!(titles, vec!["Concierto 0", "Concierto 1", "Concierto 2"]);
}

#[test]
fn event_creation_traces_gate_validate_persist() {
    let (store, _) = store_with_session();
    let clock = SteppingClock::starting_at(BASE_MILLIS + 1_000);

    let (_, events) = create_event_with_events(&store, &store, &clock, &valid_event(0))
        .expect("create event");
    let stages: Vec<FlowStage> = events.iter().map(|event| event.stage).collect();
    assert_eq!(
        stages,
        vec![FlowStage::Session, FlowStage::Validate, FlowStage::Persist]
    );
    assert_eq!(events[2].name, "event.append");
}
