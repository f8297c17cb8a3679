//! Transition actions accepted by the form reducer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::state::{FormState, InputState};
use crate::envelope::ResponseEnvelope;

/// Value and metadata a field reverts to on reset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Baseline {
    /// Value to restore; an empty string when absent
    #[serde(default)]
    pub value: Option<Value>,

    /// Metadata override; existing metadata survives when absent
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

impl Baseline {
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }
}

/// A form transition.
///
/// JSON form: `{"type": "update_one", "name": ..., "input": ...}` etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Replace the whole form (mount, or reset to a fresh schema)
    Initialize { fields: FormState },

    /// Replace one existing field
    UpdateOne { name: String, input: InputState },

    /// Replace every existing field named in `fields`
    UpdateMany { fields: BTreeMap<String, InputState> },

    /// Re-derive every field's error from a response envelope
    UpdateErrors { envelope: ResponseEnvelope<Value> },

    /// Clear values and errors, keeping metadata unless overridden
    Reset {
        #[serde(default)]
        baseline: BTreeMap<String, Baseline>,
    },
}

impl Action {
    pub fn initialize(fields: FormState) -> Self {
        Action::Initialize { fields }
    }

    pub fn update_one(name: impl Into<String>, input: InputState) -> Self {
        Action::UpdateOne {
            name: name.into(),
            input,
        }
    }

    pub fn update_many<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, InputState)>,
        K: Into<String>,
    {
        Action::UpdateMany {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Wrap any envelope, whatever its payload type
    pub fn update_errors<T: Serialize>(envelope: ResponseEnvelope<T>) -> Self {
        Action::UpdateErrors {
            envelope: envelope.into_value(),
        }
    }

    pub fn reset<I, K>(baseline: I) -> Self
    where
        I: IntoIterator<Item = (K, Baseline)>,
        K: Into<String>,
    {
        Action::Reset {
            baseline: baseline.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Initialize { .. } => "initialize",
            Action::UpdateOne { .. } => "update_one",
            Action::UpdateMany { .. } => "update_many",
            Action::UpdateErrors { .. } => "update_errors",
            Action::Reset { .. } => "reset",
        }
    }
}
