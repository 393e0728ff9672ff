use crate::OutputMode;
use serde_json::{json, Value};
use velada_model::{AccountRecord, EventRecord, NavEntry};

pub(crate) fn emit_ok(output_mode: OutputMode, payload: Value) -> Result<(), String> {
    if output_mode.json {
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())?
        );
    }
    Ok(())
}

pub(crate) fn event_json(record: &EventRecord) -> Value {
    json!({
        "id": record.id.as_str(),
        "title": record.title.as_str(),
        "date": record.date.as_str(),
        "description": record.description.as_str(),
        "image": record.image,
        "created_by": record.created_by.as_str(),
    })
}

pub(crate) fn account_json(record: &AccountRecord) -> Value {
    json!({
        "id": record.id.as_str(),
        "first_name": record.first_name.as_str(),
        "last_name": record.last_name.as_str(),
        "email": record.email.as_str(),
        "national_id": record.national_id.as_str(),
        "phone": record.phone.as_str(),
    })
}

pub(crate) fn nav_json(entries: &[NavEntry]) -> Value {
    let links: Vec<Value> = entries
        .iter()
        .map(|entry| match entry {
            NavEntry::Goto { label, route } => json!({"label": label, "route": route.path()}),
            NavEntry::Logout { label } => json!({"label": label, "action": "logout"}),
        })
        .collect();
    Value::Array(links)
}
