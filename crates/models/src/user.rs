use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Loosely shaped request body: the keys of a JSON object or a url-encoded form.
pub type Fields = Map<String, Value>;

/// Ordered user records, in file order.
pub type Collection = Vec<User>;

/// One record of the persisted collection.
///
/// The five named fields keep whatever JSON value they were given. `None`
/// means the key is absent and is left out of the serialized object, while an
/// explicit `null` is stored as `null`. Keys beyond the named fields are
/// carried in `extra` and written back untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<Value>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// Replacement values for the five mutable fields. `None` removes a field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
    pub gender: Option<Value>,
    pub job_title: Option<Value>,
}

impl UserChanges {
    /// Pick the five named fields out of a body; everything else is ignored.
    pub fn from_fields(fields: &Fields) -> Self {
        let pick = |key: &str| fields.get(key).cloned();
        Self {
            first_name: pick("first_name"),
            last_name: pick("last_name"),
            email: pick("email"),
            gender: pick("gender"),
            job_title: pick("job_title"),
        }
    }
}

impl User {
    /// Build a new record from `id` and every other field of the body.
    ///
    /// An `id` key in the body is dropped; callers pick the id (see [`body_id`]).
    pub fn from_fields(id: i64, mut fields: Fields) -> Self {
        fields.remove("id");
        let first_name = fields.remove("first_name");
        let last_name = fields.remove("last_name");
        let email = fields.remove("email");
        let gender = fields.remove("gender");
        let job_title = fields.remove("job_title");
        Self { id, first_name, last_name, email, gender, job_title, extra: fields }
    }

    /// Overwrite all five mutable fields; `id` and `extra` stay as they are.
    pub fn apply(&mut self, changes: UserChanges) {
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        self.email = changes.email;
        self.gender = changes.gender;
        self.job_title = changes.job_title;
    }

    /// First name as display text: strings verbatim, absent or `null` empty,
    /// other values as their JSON text.
    pub fn first_name_text(&self) -> String {
        match &self.first_name {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Id for the next created record: the last element's id plus one, or 1 for
/// an empty collection. `None` when the last id is `i64::MAX`.
///
/// This looks at array position, not at the largest id, so an unsorted
/// collection can be handed a duplicate.
pub fn next_id(users: &[User]) -> Option<i64> {
    match users.last() {
        Some(u) => u.id.checked_add(1),
        None => Some(1),
    }
}

/// Integer `id` supplied in a create body. It takes the place of the
/// generated id; any other `id` value is ignored.
pub fn body_id(fields: &Fields) -> Option<i64> {
    fields.get("id").and_then(Value::as_i64)
}

/// Interpret a decoded JSON body. `null` counts as no body at all; anything
/// other than an object is rejected.
pub fn body_fields(value: Value) -> Result<Option<Fields>, ModelError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ModelError::Validation("request body must be a JSON object".into())),
    }
}

/// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
