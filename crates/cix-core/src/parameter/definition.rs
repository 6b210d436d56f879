//! Parameter identity shared by every parameter kind.

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Name and description of one build parameter.
///
/// The name is unique within the owning job (see [`super::JobParameters`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>) -> Result<Self, ParameterError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ParameterError::EmptyName);
        }
        Ok(Self {
            name,
            description: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the error for a token this parameter rejects.
    pub fn invalid_token(&self, token: &str, reason: impl Into<String>) -> ParameterError {
        ParameterError::InvalidTokenFormat {
            name: self.name.clone(),
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_definition(&self, reason: impl Into<String>) -> ParameterError {
        ParameterError::InvalidDefinition {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(ParameterDefinition::new("  "), Err(ParameterError::EmptyName)));
    }

    #[test]
    fn test_with_description() {
        let def = ParameterDefinition::new("BRANCH")
            .unwrap()
            .with_description("Branch to build");
        assert_eq!(def.name, "BRANCH");
        assert_eq!(def.description.as_deref(), Some("Branch to build"));
    }
}
