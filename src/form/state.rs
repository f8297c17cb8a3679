//! Field and form state types.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// State of a single named input field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Current field value
    pub value: Value,

    /// Human-readable validation message, or `None`
    #[serde(default)]
    pub error: Option<String>,

    /// Auxiliary metadata (e.g. selectable options), never validated
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Whether the field manages its own change events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handles_on_change: Option<bool>,
}

impl InputState {
    /// Create a field holding `value` with no error and no metadata
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            error: None,
            data: Map::new(),
            handles_on_change: None,
        }
    }

    /// Create an empty text field
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Attach a metadata entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attach an error message
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn with_handles_on_change(mut self, handles: bool) -> Self {
        self.handles_on_change = Some(handles);
        self
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Ordered mapping from field name to [`InputState`].
///
/// Insertion order only matters to the UI (scrolling to the first
/// error). Equality is order-sensitive, which is what the reducer
/// preserves anyway.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    fields: Vec<(String, InputState)>,
}

impl FormState {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from `(name, field)` pairs.
    ///
    /// A repeated name replaces the earlier field but keeps its position.
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, InputState)>,
        K: Into<String>,
    {
        let mut state = Self::new();
        for (name, input) in fields {
            state.insert(name.into(), input);
        }
        state
    }

    // Only used while building a form; transitions never insert.
    fn insert(&mut self, name: String, input: InputState) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = input,
            None => self.fields.push((name, input)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&InputState> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, input)| input)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputState)> {
        self.fields.iter().map(|(name, input)| (name.as_str(), input))
    }

    /// True if any field currently shows an error
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|(_, input)| input.has_error())
    }

    /// First field in insertion order carrying an error
    pub fn first_error_field(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, input)| input.has_error())
            .map(|(name, _)| name.as_str())
    }

    /// Package current field values into a submission payload
    pub fn values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, input)| (name.clone(), input.value.clone()))
            .collect()
    }

    /// Rebuild the form with every field passed through `f`.
    ///
    /// The key set and order are carried over unchanged.
    pub(crate) fn map_fields(&self, mut f: impl FnMut(&str, &InputState) -> InputState) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .map(|(name, input)| (name.clone(), f(name, input)))
                .collect(),
        }
    }
}

impl Serialize for FormState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, input) in &self.fields {
            map.serialize_entry(name, input)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FormStateVisitor;

        impl<'de> Visitor<'de> for FormStateVisitor {
            type Value = FormState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to input state")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FormState, A::Error> {
                let mut state = FormState::new();
                while let Some((name, input)) = access.next_entry::<String, InputState>()? {
                    state.insert(name, input);
                }
                Ok(state)
            }
        }

        deserializer.deserialize_map(FormStateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn login_form() -> FormState {
        FormState::from_fields([
            ("handle", InputState::empty()),
            ("password", InputState::empty()),
        ])
    }

    #[test]
    fn test_from_fields_keeps_insertion_order() {
        let form = FormState::from_fields([
            ("zeta", InputState::empty()),
            ("alpha", InputState::empty()),
            ("mid", InputState::empty()),
        ]);
        assert_eq!(form.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let form = FormState::from_fields([
            ("a", InputState::new("first")),
            ("b", InputState::empty()),
            ("a", InputState::new("second")),
        ]);
        assert_eq!(form.len(), 2);
        assert_eq!(form.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(form.get("a").unwrap().value, json!("second"));
    }

    #[test]
    fn test_first_error_field_follows_order() {
        let form = FormState::from_fields([
            ("handle", InputState::empty()),
            ("email", InputState::empty().with_error("Enter a valid email")),
            ("name", InputState::empty().with_error("Name is required")),
        ]);
        assert!(form.has_errors());
        assert_eq!(form.first_error_field(), Some("email"));
        assert!(!login_form().has_errors());
    }

    #[test]
    fn test_values_packages_payload() {
        let form = FormState::from_fields([
            ("handle", InputState::new("alice")),
            ("remember", InputState::new(true)),
        ]);
        assert_eq!(
            Value::Object(form.values()),
            json!({ "handle": "alice", "remember": true })
        );
    }

    #[test]
    fn test_json_preserves_order() {
        let json = r#"{"b":{"value":"1"},"a":{"value":"2","data":{"options":["x"]}}}"#;
        let form: FormState = serde_json::from_str(json).unwrap();
        assert_eq!(form.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(form.get("a").unwrap().data["options"], json!(["x"]));
        assert!(form.get("b").unwrap().error.is_none());

        let out = serde_json::to_string(&form).unwrap();
        assert!(out.find("\"b\"").unwrap() < out.find("\"a\"").unwrap());
    }
}
