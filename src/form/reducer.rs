//! The transition function and the error projection rule.

use serde_json::Value;

use super::action::{Action, Baseline};
use super::state::FormState;
use crate::envelope::ResponseEnvelope;

/// Apply one action to `state`, returning the next state.
///
/// Total over the existing key set: never fails, never performs I/O,
/// never mutates `state`. Only `Initialize` may change the key set.
pub fn apply(state: &FormState, action: Action) -> FormState {
    match action {
        Action::Initialize { fields } => fields,

        Action::UpdateOne { name, input } => {
            // Unknown names are a caller bug; ignore rather than grow the form.
            if !state.contains_key(&name) {
                return state.clone();
            }
            state.map_fields(|key, existing| {
                if key == name {
                    input.clone()
                } else {
                    existing.clone()
                }
            })
        }

        Action::UpdateMany { fields } => state.map_fields(|key, existing| {
            fields.get(key).cloned().unwrap_or_else(|| existing.clone())
        }),

        Action::UpdateErrors { envelope } => project_errors(state, &envelope),

        Action::Reset { baseline } => state.map_fields(|key, existing| {
            let Baseline { value, data } = baseline.get(key).cloned().unwrap_or_default();

            let mut next = existing.clone();
            next.value = value.unwrap_or_else(|| Value::String(String::new()));
            next.error = None;
            next.data = data.unwrap_or_else(|| existing.data.clone());
            next
        }),
    }
}

/// Apply a sequence of actions left to right
pub fn apply_all(state: &FormState, actions: impl IntoIterator<Item = Action>) -> FormState {
    actions
        .into_iter()
        .fold(state.clone(), |current, action| apply(&current, action))
}

/// Copy envelope field errors onto matching fields.
///
/// Each field shows the first message reported for it; fields the
/// envelope does not mention are cleared. Keys the form does not have
/// are ignored. An empty first message clears the field, since a field
/// error is either absent or non-empty.
///
/// Idempotent: projecting the same envelope twice equals projecting once.
pub fn project_errors<T>(state: &FormState, envelope: &ResponseEnvelope<T>) -> FormState {
    state.map_fields(|key, existing| {
        let mut next = existing.clone();
        next.error = envelope
            .field_errors(key)
            .and_then(|messages| messages.first())
            .filter(|message| !message.is_empty())
            .cloned();
        next
    })
}
