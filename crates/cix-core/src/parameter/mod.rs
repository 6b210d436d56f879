//! Build parameters: definitions, typed values and token conversion.
//!
//! Each parameter kind implements [`ParameterConverter::create_value`], a pure
//! function from a string token to a [`ParameterValue`]. Triggers from the CLI,
//! web forms and code all reach it through [`create_value_with_context`].

mod definition;
mod invocation;
mod job;
mod kinds;
mod value;

pub use definition::ParameterDefinition;
pub use invocation::{create_value_with_context, InvocationContext, ProgrammaticInvocation};
pub use job::JobParameters;
pub use kinds::{
    BooleanParameter, ChoiceParameter, IntegerParameter, PasswordParameter, StringParameter,
    TextParameter,
};
pub use value::{ParameterPayload, ParameterValue, Secret};

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Conversion of a single string token into a typed parameter value.
pub trait ParameterConverter: Send + Sync {
    fn definition(&self) -> &ParameterDefinition;

    /// Kind label, matching the `type` tag of [`ParameterSpec`].
    fn type_name(&self) -> &'static str;

    /// Parse `raw` into a value. Deterministic in `raw` and the definition.
    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError>;

    /// Value used when a build is triggered without this parameter.
    fn default_value(&self) -> Option<ParameterValue> {
        None
    }

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Convert a web form entry of the shape `{"name": .., "value": ..}`.
    ///
    /// JSON booleans and numbers are converted through their token text.
    fn create_value_from_form(&self, form: &Value) -> Result<ParameterValue, ParameterError> {
        if let Some(name) = form.get("name").and_then(Value::as_str) {
            if name != self.name() {
                return Err(ParameterError::UnknownParameter(name.to_string()));
            }
        }
        match form.get("value") {
            None | Some(Value::Null) => Err(ParameterError::MissingValue(self.name().to_string())),
            Some(Value::String(s)) => self.create_value(s),
            Some(v @ (Value::Bool(_) | Value::Number(_))) => self.create_value(&v.to_string()),
            Some(other) => Err(self
                .definition()
                .invalid_token(&other.to_string(), "expected a scalar form value")),
        }
    }
}

/// Any built-in parameter kind, as written in a job file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterSpec {
    String(StringParameter),
    Text(TextParameter),
    Boolean(BooleanParameter),
    Integer(IntegerParameter),
    Choice(ChoiceParameter),
    Password(PasswordParameter),
}

impl ParameterSpec {
    fn converter(&self) -> &dyn ParameterConverter {
        match self {
            ParameterSpec::String(p) => p,
            ParameterSpec::Text(p) => p,
            ParameterSpec::Boolean(p) => p,
            ParameterSpec::Integer(p) => p,
            ParameterSpec::Choice(p) => p,
            ParameterSpec::Password(p) => p,
        }
    }

    /// Keys a job file may set on a parameter of kind `type_name`, besides
    /// `type`, `name` and `description`. `None` for unknown kinds.
    pub fn kind_fields(type_name: &str) -> Option<&'static [&'static str]> {
        let fields: &'static [&'static str] = match type_name {
            "string" => &["default", "trim"],
            "text" | "boolean" | "password" => &["default"],
            "integer" => &["default", "min", "max"],
            "choice" => &["choices"],
            _ => return None,
        };
        Some(fields)
    }

    /// Check the definition is internally consistent.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.name().trim().is_empty() {
            return Err(ParameterError::EmptyName);
        }
        match self {
            ParameterSpec::Integer(p) => p.validate(),
            ParameterSpec::Choice(p) => p.validate(),
            _ => Ok(()),
        }
    }
}

impl ParameterConverter for ParameterSpec {
    fn definition(&self) -> &ParameterDefinition {
        self.converter().definition()
    }

    fn type_name(&self) -> &'static str {
        self.converter().type_name()
    }

    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        self.converter().create_value(raw)
    }

    fn default_value(&self) -> Option<ParameterValue> {
        self.converter().default_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn retries() -> ParameterSpec {
        ParameterSpec::Integer(IntegerParameter::new(ParameterDefinition::new("RETRIES").unwrap()))
    }

    #[test]
    fn test_create_value_deterministic() {
        let spec = retries();
        let a = spec.create_value("42").unwrap();
        let b = spec.create_value("42").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.payload, ParameterPayload::Integer(42));
    }

    #[test]
    fn test_form_values() {
        let spec = retries();
        let from_str = spec
            .create_value_from_form(&json!({ "name": "RETRIES", "value": "5" }))
            .unwrap();
        let from_num = spec.create_value_from_form(&json!({ "value": 5 })).unwrap();
        assert_eq!(from_str, from_num);

        assert!(matches!(
            spec.create_value_from_form(&json!({ "name": "OTHER", "value": "5" })),
            Err(ParameterError::UnknownParameter(_))
        ));
        assert!(matches!(
            spec.create_value_from_form(&json!({ "name": "RETRIES" })),
            Err(ParameterError::MissingValue(_))
        ));
        assert!(matches!(
            spec.create_value_from_form(&json!({ "value": [1, 2] })),
            Err(ParameterError::InvalidTokenFormat { .. })
        ));
    }

    #[test]
    fn test_boolean_form_value() {
        let spec = ParameterSpec::Boolean(BooleanParameter {
            definition: ParameterDefinition::new("DEPLOY").unwrap(),
            default: false,
        });
        let value = spec.create_value_from_form(&json!({ "value": true })).unwrap();
        assert_eq!(value.payload, ParameterPayload::Boolean(true));
    }

    #[test]
    fn test_kind_fields() {
        assert_eq!(ParameterSpec::kind_fields("integer"), Some(&["default", "min", "max"][..]));
        assert_eq!(ParameterSpec::kind_fields("file"), None);
    }

    #[test]
    fn test_spec_deserialize_tagged() {
        let spec: ParameterSpec = serde_json::from_value(json!({
            "type": "choice",
            "name": "ENV",
            "description": "Target",
            "choices": ["staging", "prod"]
        }))
        .unwrap();
        assert_eq!(spec.type_name(), "choice");
        assert_eq!(spec.name(), "ENV");
        assert_eq!(spec.definition().description.as_deref(), Some("Target"));
        assert!(spec.validate().is_ok());
    }
}
