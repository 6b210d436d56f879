//! The parameter list owned by one job configuration.

use super::{create_value_with_context, InvocationContext, ParameterConverter, ParameterSpec, ParameterValue};
use crate::error::ParameterError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

const COMMON_FIELDS: [&str; 3] = ["type", "name", "description"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    #[serde(default)]
    parameters: Vec<ParameterSpec>,
}

/// Ordered, uniquely named parameter definitions of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobParameters {
    parameters: Vec<ParameterSpec>,
}

impl JobParameters {
    /// Validate every definition and reject duplicate names.
    pub fn new(parameters: Vec<ParameterSpec>) -> Result<Self, ParameterError> {
        let mut seen = HashSet::new();
        for spec in &parameters {
            spec.validate()?;
            if !seen.insert(spec.name().to_string()) {
                return Err(ParameterError::DuplicateName(spec.name().to_string()));
            }
        }
        Ok(Self { parameters })
    }

    /// Parse a job file with `[[parameters]]` tables.
    ///
    /// Keys a parameter's kind does not define are rejected, so a misspelt
    /// `default` does not silently vanish.
    pub fn from_toml(text: &str) -> Result<Self, ParameterError> {
        let raw: toml::Table = toml::from_str(text)?;
        if let Some(entries) = raw.get("parameters").and_then(toml::Value::as_array) {
            for entry in entries.iter().filter_map(toml::Value::as_table) {
                check_fields(entry)?;
            }
        }
        let file: JobFile = toml::from_str(text)?;
        Self::new(file.parameters)
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Resolve the full value list for one build.
    ///
    /// For each definition, in order: an explicitly supplied token, else a
    /// token held by the context, else the default. Supplying a name twice
    /// keeps the last token. Errors from the context propagate unchanged.
    pub fn resolve<C>(
        &self,
        ctx: &C,
        supplied: &[(String, String)],
    ) -> Result<Vec<ParameterValue>, ParameterError>
    where
        C: InvocationContext + ?Sized,
    {
        let tokens: BTreeMap<&str, &str> = supplied
            .iter()
            .map(|(name, token)| (name.as_str(), token.as_str()))
            .collect();

        let held = ctx.held_names();
        let mut named = tokens.keys().copied().chain(held.iter().copied());
        if let Some(unknown) = named.find(|name| self.get(name).is_none()) {
            return Err(ParameterError::UnknownParameter(unknown.to_string()));
        }

        let mut values = Vec::with_capacity(self.parameters.len());
        for spec in &self.parameters {
            let value = match tokens.get(spec.name()) {
                Some(token) => create_value_with_context(spec, ctx, token)?,
                None => match ctx.pending_token(spec.name())? {
                    Some(token) => create_value_with_context(spec, ctx, &token)?,
                    None => {
                        debug!(parameter = spec.name(), "using default value");
                        spec.default_value()
                            .ok_or_else(|| ParameterError::MissingValue(spec.name().to_string()))?
                    }
                },
            };
            values.push(value);
        }

        info!(origin = ctx.origin(), count = values.len(), "resolved build parameters");
        Ok(values)
    }
}

fn check_fields(entry: &toml::Table) -> Result<(), ParameterError> {
    let Some(allowed) = entry
        .get("type")
        .and_then(toml::Value::as_str)
        .and_then(ParameterSpec::kind_fields)
    else {
        // missing or unknown kinds are reported by deserialization
        return Ok(());
    };

    let unknown = entry
        .keys()
        .find(|key| !COMMON_FIELDS.contains(&key.as_str()) && !allowed.contains(&key.as_str()));
    match unknown {
        Some(key) => Err(ParameterError::InvalidDefinition {
            name: entry
                .get("name")
                .and_then(toml::Value::as_str)
                .unwrap_or("<unnamed>")
                .to_string(),
            reason: format!("unknown field `{key}`"),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{ParameterPayload, ProgrammaticInvocation};

    const JOB: &str = r#"
[[parameters]]
type = "string"
name = "BRANCH"
default = "main"

[[parameters]]
type = "integer"
name = "RETRIES"
min = 0
max = 5

[[parameters]]
type = "choice"
name = "ENV"
choices = ["staging", "prod"]
"#;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_toml() {
        let job = JobParameters::from_toml(JOB).unwrap();
        assert_eq!(job.len(), 3);
        assert_eq!(job.get("ENV").map(|p| p.type_name()), Some("choice"));
    }

    #[test]
    fn test_resolve_with_defaults() {
        let job = JobParameters::from_toml(JOB).unwrap();
        let values = job
            .resolve(&ProgrammaticInvocation, &pairs(&[("RETRIES", "2")]))
            .unwrap();
        let payloads: Vec<_> = values.iter().map(|v| v.payload.clone()).collect();
        assert_eq!(
            payloads,
            vec![
                ParameterPayload::String("main".to_string()),
                ParameterPayload::Integer(2),
                ParameterPayload::Choice("staging".to_string()),
            ]
        );
    }

    #[test]
    fn test_resolve_missing_without_default() {
        let job = JobParameters::from_toml(JOB).unwrap();
        let err = job.resolve(&ProgrammaticInvocation, &[]).unwrap_err();
        assert!(matches!(err, ParameterError::MissingValue(name) if name == "RETRIES"));
    }

    #[test]
    fn test_resolve_unknown_and_last_wins() {
        let job = JobParameters::from_toml(JOB).unwrap();
        let err = job
            .resolve(&ProgrammaticInvocation, &pairs(&[("NOPE", "1")]))
            .unwrap_err();
        assert!(matches!(err, ParameterError::UnknownParameter(name) if name == "NOPE"));

        let values = job
            .resolve(&ProgrammaticInvocation, &pairs(&[("RETRIES", "1"), ("RETRIES", "4")]))
            .unwrap();
        assert_eq!(values[1].payload, ParameterPayload::Integer(4));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = r#"
[[parameters]]
type = "string"
name = "A"

[[parameters]]
type = "boolean"
name = "A"
"#;
        let err = JobParameters::from_toml(text).unwrap_err();
        assert!(err.to_string().contains("Duplicate parameter name: A"));
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let text = r#"
[[parameters]]
type = "choice"
name = "ENV"
choices = []
"#;
        assert!(JobParameters::from_toml(text).is_err());
    }

    struct PipedContext(&'static str);

    impl InvocationContext for PipedContext {
        fn origin(&self) -> &str {
            "cli"
        }

        fn pending_token(&self, name: &str) -> Result<Option<String>, ParameterError> {
            Ok((name == self.0).then(|| "1".to_string()))
        }

        fn held_names(&self) -> Vec<&str> {
            vec![self.0]
        }
    }

    #[test]
    fn test_resolve_rejects_held_unknown_name() {
        let job = JobParameters::from_toml(JOB).unwrap();
        let err = job
            .resolve(&PipedContext("NOPE"), &pairs(&[("RETRIES", "2")]))
            .unwrap_err();
        assert!(matches!(err, ParameterError::UnknownParameter(name) if name == "NOPE"));

        let values = job.resolve(&PipedContext("RETRIES"), &[]).unwrap();
        assert_eq!(values[1].payload, ParameterPayload::Integer(1));
    }

    #[test]
    fn test_misspelt_field_rejected() {
        let text = r#"
[[parameters]]
type = "integer"
name = "RETRIES"
defualt = 3
"#;
        let err = JobParameters::from_toml(text).unwrap_err();
        match err {
            ParameterError::InvalidDefinition { name, reason } => {
                assert_eq!(name, "RETRIES");
                assert_eq!(reason, "unknown field `defualt`");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let text = format!("paramters = []\n{JOB}");
        assert!(matches!(
            JobParameters::from_toml(&text),
            Err(ParameterError::JobFile(_))
        ));
    }

    #[test]
    fn test_syntax_error_is_job_file_error() {
        let err = JobParameters::from_toml("[[parameters]\ntype = ").unwrap_err();
        assert!(matches!(err, ParameterError::JobFile(_)));
        assert!(err.to_string().starts_with("Failed to parse job file"));
    }

    #[test]
    fn test_password_default_hidden_from_debug() {
        let text = r#"
[[parameters]]
type = "password"
name = "TOKEN"
default = "hunter2"
"#;
        let job = JobParameters::from_toml(text).unwrap();
        assert!(!format!("{job:?}").contains("hunter2"));
        let value = job.resolve(&ProgrammaticInvocation, &[]).unwrap();
        assert_eq!(value[0].env_pair().1, "hunter2");
    }
}
