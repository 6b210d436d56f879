//! Built-in parameter kinds.

use super::value::Secret;
use super::{ParameterConverter, ParameterDefinition, ParameterPayload, ParameterValue};
use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Single-line string parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringParameter {
    #[serde(flatten)]
    pub definition: ParameterDefinition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Strip surrounding whitespace from tokens and the default.
    #[serde(default)]
    pub trim: bool,
}

impl StringParameter {
    pub fn new(definition: ParameterDefinition) -> Self {
        Self {
            definition,
            default: None,
            trim: false,
        }
    }

    fn normalize(&self, raw: &str) -> String {
        if self.trim {
            raw.trim().to_string()
        } else {
            raw.to_string()
        }
    }
}

impl ParameterConverter for StringParameter {
    fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    fn type_name(&self) -> &'static str {
        "string"
    }

    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        Ok(ParameterValue::new(
            &self.definition.name,
            ParameterPayload::String(self.normalize(raw)),
        ))
    }

    fn default_value(&self) -> Option<ParameterValue> {
        let default = self.normalize(self.default.as_deref().unwrap_or_default());
        Some(ParameterValue::new(&self.definition.name, ParameterPayload::String(default)))
    }
}

/// Multi-line text parameter. Tokens are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextParameter {
    #[serde(flatten)]
    pub definition: ParameterDefinition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParameterConverter for TextParameter {
    fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    fn type_name(&self) -> &'static str {
        "text"
    }

    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        Ok(ParameterValue::new(
            &self.definition.name,
            ParameterPayload::Text(raw.to_string()),
        ))
    }

    fn default_value(&self) -> Option<ParameterValue> {
        let default = self.default.clone().unwrap_or_default();
        Some(ParameterValue::new(&self.definition.name, ParameterPayload::Text(default)))
    }
}

/// `true`/`false` parameter, case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanParameter {
    #[serde(flatten)]
    pub definition: ParameterDefinition,

    #[serde(default)]
    pub default: bool,
}

impl ParameterConverter for BooleanParameter {
    fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        let token = raw.trim();
        let flag = if token.eq_ignore_ascii_case("true") {
            true
        } else if token.eq_ignore_ascii_case("false") {
            false
        } else {
            return Err(self.definition.invalid_token(raw, "expected true or false"));
        };
        Ok(ParameterValue::new(&self.definition.name, ParameterPayload::Boolean(flag)))
    }

    fn default_value(&self) -> Option<ParameterValue> {
        Some(ParameterValue::new(
            &self.definition.name,
            ParameterPayload::Boolean(self.default),
        ))
    }
}

/// Signed 64-bit integer parameter with optional inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerParameter {
    #[serde(flatten)]
    pub definition: ParameterDefinition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl IntegerParameter {
    pub fn new(definition: ParameterDefinition) -> Self {
        Self {
            definition,
            default: None,
            min: None,
            max: None,
        }
    }

    pub fn with_bounds(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    fn out_of_range(&self, n: i64) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), _) if n < min => Some(format!("must be at least {min}")),
            (_, Some(max)) if n > max => Some(format!("must be at most {max}")),
            _ => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ParameterError> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(self
                    .definition
                    .invalid_definition(format!("min {min} is greater than max {max}")));
            }
        }
        if let Some(reason) = self.default.and_then(|d| self.out_of_range(d)) {
            return Err(self.definition.invalid_definition(format!("default {reason}")));
        }
        Ok(())
    }
}

impl ParameterConverter for IntegerParameter {
    fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        let n: i64 = raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| self.definition.invalid_token(raw, e.to_string()))?;
        if let Some(reason) = self.out_of_range(n) {
            return Err(self.definition.invalid_token(raw, reason));
        }
        Ok(ParameterValue::new(&self.definition.name, ParameterPayload::Integer(n)))
    }

    fn default_value(&self) -> Option<ParameterValue> {
        self.default
            .map(|n| ParameterValue::new(&self.definition.name, ParameterPayload::Integer(n)))
    }
}

/// One of a fixed list of strings. The first choice is the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceParameter {
    #[serde(flatten)]
    pub definition: ParameterDefinition,

    pub choices: Vec<String>,
}

impl ChoiceParameter {
    pub fn new(
        definition: ParameterDefinition,
        choices: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ParameterError> {
        let param = Self {
            definition,
            choices: choices.into_iter().map(Into::into).collect(),
        };
        param.validate()?;
        Ok(param)
    }

    pub(crate) fn validate(&self) -> Result<(), ParameterError> {
        if self.choices.is_empty() {
            return Err(self.definition.invalid_definition("choice list is empty"));
        }
        Ok(())
    }
}

impl ParameterConverter for ChoiceParameter {
    fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    fn type_name(&self) -> &'static str {
        "choice"
    }

    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        if !self.choices.iter().any(|c| c == raw) {
            return Err(self
                .definition
                .invalid_token(raw, format!("not one of [{}]", self.choices.join(", "))));
        }
        Ok(ParameterValue::new(
            &self.definition.name,
            ParameterPayload::Choice(raw.to_string()),
        ))
    }

    fn default_value(&self) -> Option<ParameterValue> {
        self.choices
            .first()
            .map(|c| ParameterValue::new(&self.definition.name, ParameterPayload::Choice(c.clone())))
    }
}

/// Secret string parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordParameter {
    #[serde(flatten)]
    pub definition: ParameterDefinition,

    #[serde(default, skip_serializing)]
    pub default: Option<Secret>,
}

impl ParameterConverter for PasswordParameter {
    fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    fn type_name(&self) -> &'static str {
        "password"
    }

    fn create_value(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        Ok(ParameterValue::new(
            &self.definition.name,
            ParameterPayload::Password(Secret::new(raw)),
        ))
    }

    fn default_value(&self) -> Option<ParameterValue> {
        let default = self.default.clone().unwrap_or_else(|| Secret::new(""));
        Some(ParameterValue::new(
            &self.definition.name,
            ParameterPayload::Password(default),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str) -> ParameterDefinition {
        ParameterDefinition::new(name).unwrap()
    }

    #[test]
    fn test_string_trim() {
        let mut param = StringParameter::new(def("BRANCH"));
        assert_eq!(
            param.create_value("  main ").unwrap().payload,
            ParameterPayload::String("  main ".to_string())
        );
        param.trim = true;
        param.default = Some(" dev ".to_string());
        assert_eq!(
            param.create_value("  main ").unwrap().payload,
            ParameterPayload::String("main".to_string())
        );
        assert_eq!(
            param.default_value().unwrap().payload,
            ParameterPayload::String("dev".to_string())
        );
    }

    #[test]
    fn test_text_kept_verbatim() {
        let param = TextParameter {
            definition: def("NOTES"),
            default: None,
        };
        let value = param.create_value(" line1\nline2 ").unwrap();
        assert_eq!(value.payload, ParameterPayload::Text(" line1\nline2 ".to_string()));
        assert_eq!(param.default_value().unwrap().payload, ParameterPayload::Text(String::new()));
    }

    #[test]
    fn test_boolean_tokens() {
        let param = BooleanParameter {
            definition: def("DEPLOY"),
            default: false,
        };
        assert_eq!(param.create_value("TRUE").unwrap().payload, ParameterPayload::Boolean(true));
        assert_eq!(param.create_value(" false").unwrap().payload, ParameterPayload::Boolean(false));
        assert!(matches!(
            param.create_value("yes"),
            Err(ParameterError::InvalidTokenFormat { .. })
        ));
    }

    #[test]
    fn test_integer_parse_and_bounds() {
        let param = IntegerParameter::new(def("RETRIES")).with_bounds(Some(0), Some(10));
        assert_eq!(param.create_value(" 3 ").unwrap().payload, ParameterPayload::Integer(3));
        for bad in ["", "3.5", "ten", "11", "-1", "99999999999999999999"] {
            assert!(
                matches!(param.create_value(bad), Err(ParameterError::InvalidTokenFormat { .. })),
                "expected {bad:?} to be rejected"
            );
        }
        assert!(param.default_value().is_none());
    }

    #[test]
    fn test_integer_validate() {
        let inverted = IntegerParameter::new(def("N")).with_bounds(Some(5), Some(1));
        assert!(matches!(inverted.validate(), Err(ParameterError::InvalidDefinition { .. })));

        let mut bad_default = IntegerParameter::new(def("N")).with_bounds(None, Some(3));
        bad_default.default = Some(4);
        assert!(bad_default.validate().is_err());
    }

    #[test]
    fn test_choice() {
        let param = ChoiceParameter::new(def("ENV"), ["staging", "prod"]).unwrap();
        assert_eq!(
            param.create_value("prod").unwrap().payload,
            ParameterPayload::Choice("prod".to_string())
        );
        let err = param.create_value("Prod").unwrap_err();
        assert!(err.to_string().contains("staging, prod"));
        assert_eq!(
            param.default_value().unwrap().payload,
            ParameterPayload::Choice("staging".to_string())
        );
        assert!(ChoiceParameter::new(def("ENV"), Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_password() {
        let param = PasswordParameter {
            definition: def("TOKEN"),
            default: Some(Secret::new("s3cret")),
        };
        assert!(!format!("{param:?}").contains("s3cret"));
        let value = param.create_value("hunter2").unwrap();
        assert_eq!(value.env_pair().1, "hunter2");
        assert_eq!(param.default_value().unwrap().env_pair().1, "s3cret");
    }
}
