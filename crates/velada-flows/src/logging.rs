// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    Validate,
    Duplicates,
    Lookup,
    Persist,
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowEvent {
    pub stage: FlowStage,
    pub name: String,
    pub fields: BTreeMap<String, String>,
}

/// In-process audit trail of one flow invocation, kept alongside the
/// tracing output so callers can inspect the staged steps after the
/// fact.
#[derive(Debug, Default, Clone)]
pub struct FlowLog {
    events: Vec<FlowEvent>,
}

impl FlowLog {
    pub fn emit(
        &mut self,
        stage: FlowStage,
        name: impl Into<String>,
        fields: BTreeMap<String, String>,
    ) {
        self.events.push(FlowEvent {
            stage,
            name: name.into(),
            fields,
        });
    }

    #[must_use]
    pub fn events(&self) -> &[FlowEvent] {
        &self.events
    }
}
