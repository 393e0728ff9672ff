// SPDX-License-Identifier: Apache-2.0

use crate::helpers::{account_json, emit_ok, event_json, nav_json};
use crate::{CliError, EventCliArgs, OutputMode, RegisterCliArgs, StoreContext};
use serde_json::json;
use velada_core::clock::SystemClock;
use velada_flows::{
    create_event, event_detail, list_events, login, logout, password_reset_lookup,
    register_account, Credentials, RegisterPolicy, ResetLookup,
};
use velada_model::{visible_links, EventInput, RecordId, RegistrationInput, Route};

pub(crate) fn run_register(
    ctx: &StoreContext,
    args: RegisterCliArgs,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let store = ctx.open()?;
    let input = RegistrationInput {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password: args.password,
        password_repeat: args.password_repeat,
        national_id: args.national_id,
        phone: args.phone,
    };
    let policy = RegisterPolicy {
        password_scheme: args.password_scheme.into_scheme(),
    };
    let outcome = register_account(store.accounts(), &SystemClock, policy, &input)
        .map_err(CliError::from_registration)?;
    emit_ok(
        output_mode,
        json!({
            "command": "velada register",
            "status": "ok",
            "message": "account registered",
            "account": account_json(&outcome.record),
            "redirect": outcome.redirect.path(),
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_login(
    ctx: &StoreContext,
    email: &str,
    password: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let store = ctx.open()?;
    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };
    let outcome = login(store.accounts(), store.sessions(), &credentials)
        .map_err(CliError::from_auth)?;
    emit_ok(
        output_mode,
        json!({
            "command": "velada login",
            "status": "ok",
            "message": format!("welcome, {}", outcome.display_name),
            "user_id": outcome.user_id.as_str(),
            "redirect": outcome.redirect.path(),
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_logout(ctx: &StoreContext, output_mode: OutputMode) -> Result<(), CliError> {
    let store = ctx.open()?;
    logout(store.sessions()).map_err(CliError::from_auth)?;
    emit_ok(
        output_mode,
        json!({
            "command": "velada logout",
            "status": "ok",
            "redirect": Route::Landing.path(),
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_whoami(ctx: &StoreContext, output_mode: OutputMode) -> Result<(), CliError> {
    let store = ctx.open()?;
    let session = store.sessions().current().map_err(CliError::from_store)?;
    let user_id = match (session.logged_in, session.current_user_id) {
        (true, Some(id)) => id,
        _ => return Err(CliError::unauthorized("not_logged_in", "no session is open")),
    };
    let records = store.accounts().list_all().map_err(CliError::from_store)?;
    let record = records
        .iter()
        .find(|record| record.id == user_id)
        .ok_or_else(|| {
            CliError::not_found(
                "not_found",
                "the session points at an account that no longer exists",
            )
        })?;
    emit_ok(
        output_mode,
        json!({
            "command": "velada whoami",
            "status": "ok",
            "account": account_json(record),
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_nav(ctx: &StoreContext, output_mode: OutputMode) -> Result<(), CliError> {
    let store = ctx.open()?;
    let session = store.sessions().current().map_err(CliError::from_store)?;
    let entries = visible_links(&session);
    emit_ok(
        output_mode,
        json!({
            "command": "velada nav",
            "status": "ok",
            "logged_in": session.is_authenticated(),
            "links": nav_json(&entries),
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_reset_request(
    ctx: &StoreContext,
    email: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let store = ctx.open()?;
    let lookup =
        password_reset_lookup(store.accounts(), email).map_err(CliError::from_auth)?;
    match lookup {
        ResetLookup::Found { email } => emit_ok(
            output_mode,
            json!({
                "command": "velada reset-request",
                "status": "ok",
                "message": "password reset prepared",
                "email": email.as_str(),
            }),
        )
        .map_err(CliError::internal),
        ResetLookup::Unknown => Err(CliError::not_found(
            "email_not_found",
            "no account with this email exists",
        )),
    }
}

pub(crate) fn run_event_create(
    ctx: &StoreContext,
    args: EventCliArgs,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let store = ctx.open()?;
    let input = EventInput {
        title: args.title,
        date: args.date,
        description: args.description,
        image: args.image,
    };
    let outcome = create_event(store.events(), store.sessions(), &SystemClock, &input)
        .map_err(CliError::from_event)?;
    emit_ok(
        output_mode,
        json!({
            "command": "velada event create",
            "status": "ok",
            "message": "event published",
            "event": event_json(&outcome.record),
            "redirect": outcome.redirect.path(),
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_event_list(ctx: &StoreContext, output_mode: OutputMode) -> Result<(), CliError> {
    let store = ctx.open()?;
    let records = list_events(store.events()).map_err(CliError::from_event)?;
    let events: Vec<serde_json::Value> = records.iter().map(event_json).collect();
    emit_ok(
        output_mode,
        json!({
            "command": "velada event list",
            "status": "ok",
            "count": events.len(),
            "events": events,
        }),
    )
    .map_err(CliError::internal)
}

pub(crate) fn run_event_show(
    ctx: &StoreContext,
    id: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let store = ctx.open()?;
    // An id that fails to parse cannot name a stored record, so it
    // reports the same way as an absent one.
    let Ok(id) = RecordId::parse(id) else {
        return Err(CliError::not_found(
            "not_found",
            "no event with this id exists",
        ));
    };
    let record = event_detail(store.events(), &id).map_err(CliError::from_event)?;
    emit_ok(
        output_mode,
        json!({
            "command": "velada event show",
            "status": "ok",
            "event": event_json(&record),
        }),
    )
    .map_err(CliError::internal)
}
