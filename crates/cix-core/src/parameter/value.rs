//! Resolved parameter values bound to a single build.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const REDACTED: &str = "********";

/// A secret string. Never shown by `Debug`, `Display` or `Serialize`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// Plain text, for handing to the build environment.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Secret)
    }
}

/// Typed payload of a parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterPayload {
    String(String),
    Text(String),
    Boolean(bool),
    Integer(i64),
    Choice(String),
    Password(Secret),
}

impl ParameterPayload {
    /// Value as exported into a build environment.
    pub fn env_value(&self) -> String {
        match self {
            ParameterPayload::String(s)
            | ParameterPayload::Text(s)
            | ParameterPayload::Choice(s) => s.clone(),
            ParameterPayload::Boolean(b) => b.to_string(),
            ParameterPayload::Integer(i) => i.to_string(),
            ParameterPayload::Password(secret) => secret.expose().to_string(),
        }
    }

    pub fn is_sensitive(&self) -> bool {
        matches!(self, ParameterPayload::Password(_))
    }
}

impl fmt::Display for ParameterPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterPayload::Password(secret) => write!(f, "{secret}"),
            other => f.write_str(&other.env_value()),
        }
    }
}

/// One concrete input to a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterValue {
    pub name: String,
    #[serde(flatten)]
    pub payload: ParameterPayload,
}

impl ParameterValue {
    pub fn new(name: impl Into<String>, payload: ParameterPayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// `(NAME, value)` pair for the build environment.
    pub fn env_pair(&self) -> (String, String) {
        (self.name.clone(), self.payload.env_value())
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_redacted_everywhere_but_env() {
        let value = ParameterValue::new("TOKEN", ParameterPayload::Password(Secret::new("hunter2")));
        assert_eq!(value.to_string(), "TOKEN=********");
        assert!(!format!("{value:?}").contains("hunter2"));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "name": "TOKEN", "type": "password", "value": "********" })
        );
        assert_eq!(value.env_pair(), ("TOKEN".to_string(), "hunter2".to_string()));
        assert!(value.payload.is_sensitive());
    }

    #[test]
    fn test_serialize_integer() {
        let value = ParameterValue::new("RETRIES", ParameterPayload::Integer(3));
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "name": "RETRIES", "type": "integer", "value": 3 })
        );
    }
}
