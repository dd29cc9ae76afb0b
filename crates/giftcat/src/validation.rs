//! JSON Schemas compiled into the binary and checked at the edges.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

/// Why a document failed its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaFailure {
    /// The embedded schema itself is unusable.
    Unavailable(String),
    /// The instance violates the schema; one message per violation.
    Violations(Vec<String>),
}

impl SchemaFailure {
    pub(crate) fn describe(&self) -> String {
        match self {
            SchemaFailure::Unavailable(reason) => reason.clone(),
            SchemaFailure::Violations(errors) => errors.join("; "),
        }
    }
}

/// A schema embedded with `include_str!`, compiled on first use.
pub(crate) struct EmbeddedSchema {
    name: &'static str,
    source: &'static str,
    compiled: OnceLock<Result<Validator, String>>,
}

impl EmbeddedSchema {
    pub(crate) const fn new(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source,
            compiled: OnceLock::new(),
        }
    }

    fn validator(&self) -> Result<&Validator, SchemaFailure> {
        self.compiled
            .get_or_init(|| {
                let schema: Value = serde_json::from_str(self.source)
                    .map_err(|e| format!("Invalid embedded schema JSON: {}", e))?;
                jsonschema::validator_for(&schema)
                    .map_err(|e| format!("Failed to compile JSON schema: {}", e))
            })
            .as_ref()
            .map_err(|reason| SchemaFailure::Unavailable(format!("{}: {}", self.name, reason)))
    }

    pub(crate) fn validate(&self, instance: &Value) -> Result<(), SchemaFailure> {
        let errors: Vec<String> = self
            .validator()?
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaFailure::Violations(errors))
        }
    }
}
