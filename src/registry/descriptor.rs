//! Collaborator descriptors and structured-output schemas.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capability::CapabilityTag;

/// Expected JSON kind for one field of a collaborator's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
        }
    }
}

/// One declared field of a structured response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// Shape contract for a collaborator's structured response.
///
/// The backend must answer with a JSON object; each declared field is
/// checked for presence (when required) and JSON kind. Undeclared fields
/// are not an error here — the executor drops them at write-back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSchema {
    pub fields: Vec<SchemaField>,
}

impl OutputSchema {
    /// An empty schema (any object is acceptable).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    /// Add an optional field.
    pub fn optional_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    /// Validate a backend response against this schema.
    ///
    /// Returns a human-readable description of the first problem found,
    /// suitable for the corrective re-prompt.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        let Some(object) = value.as_object() else {
            return Err("response must be a JSON object".into());
        };
        for field in &self.fields {
            match object.get(&field.name) {
                None if field.required => {
                    return Err(format!("missing required field `{}`", field.name));
                }
                None => {}
                Some(v) if !field.kind.matches(v) => {
                    return Err(format!(
                        "field `{}` must be of kind {:?}",
                        field.name, field.kind
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Declaration of one collaborator in a run configuration.
///
/// The descriptor is the whole contract: identity, capability tag, the
/// context keys it reads, the keys it owns (and alone may write), and the
/// schema its structured output must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorDescriptor {
    pub name: String,
    pub capability: CapabilityTag,
    pub input_keys: Vec<String>,
    pub output_keys: Vec<String>,
    pub schema: OutputSchema,
}

impl CollaboratorDescriptor {
    /// Whether this collaborator is a declared owner of `key`.
    pub fn owns(&self, key: &str) -> bool {
        self.output_keys.iter().any(|k| k == key)
    }

    /// Whether this collaborator declares `key` as an input.
    pub fn reads(&self, key: &str) -> bool {
        self.input_keys.iter().any(|k| k == key)
    }
}
