//! Integration tests for build parameter conversion across invocation origins.

use cix_core::parameter::{BooleanParameter, IntegerParameter, StringParameter};
use cix_core::{
    create_value_with_context, InvocationContext, JobParameters, ParameterConverter,
    ParameterDefinition, ParameterError, ParameterPayload, ParameterSpec, ProgrammaticInvocation,
};
use std::collections::HashMap;

/// Command-line style context that can also hold piped tokens.
struct FakeCli {
    piped: HashMap<String, String>,
    interrupted: bool,
}

impl FakeCli {
    fn new() -> Self {
        Self {
            piped: HashMap::new(),
            interrupted: false,
        }
    }
}

impl InvocationContext for FakeCli {
    fn origin(&self) -> &str {
        "cli"
    }

    fn pending_token(&self, name: &str) -> Result<Option<String>, ParameterError> {
        if self.interrupted {
            return Err(ParameterError::Interrupted(name.to_string()));
        }
        Ok(self.piped.get(name).cloned())
    }
}

fn integer(name: &str) -> ParameterSpec {
    ParameterSpec::Integer(IntegerParameter::new(ParameterDefinition::new(name).unwrap()))
}

/// Test: both entry points agree for every accepted token
#[test]
fn test_context_overload_equals_pure_conversion() {
    let param = integer("BUILD_NUMBER");
    let cli = FakeCli::new();

    for token in ["42", "-7", "0", " 12 "] {
        let pure = param.create_value(token).unwrap();
        let via_cli = create_value_with_context(&param, &cli, token).unwrap();
        let via_api = create_value_with_context(&param, &ProgrammaticInvocation, token).unwrap();
        assert_eq!(pure, via_cli, "token {token:?}");
        assert_eq!(pure, via_api, "token {token:?}");
    }

    let value = create_value_with_context(&param, &cli, "42").unwrap();
    assert_eq!(value.name, "BUILD_NUMBER");
    assert_eq!(value.payload, ParameterPayload::Integer(42));
}

/// Test: invalid tokens fail the same way from every origin
#[test]
fn test_invalid_tokens_rejected_everywhere() {
    let params = [
        integer("N"),
        ParameterSpec::Boolean(BooleanParameter {
            definition: ParameterDefinition::new("FLAG").unwrap(),
            default: false,
        }),
    ];
    let cli = FakeCli::new();

    for param in &params {
        for token in ["", "nope", "1.5e3"] {
            assert!(matches!(
                param.create_value(token),
                Err(ParameterError::InvalidTokenFormat { .. })
            ));
            assert!(matches!(
                create_value_with_context(param, &cli, token),
                Err(ParameterError::InvalidTokenFormat { .. })
            ));
        }
    }
}

/// Test: the adapter does not consult the context, even a broken one
#[test]
fn test_adapter_ignores_context_state() {
    let param = integer("N");
    let mut cli = FakeCli::new();
    cli.interrupted = true;

    let value = create_value_with_context(&param, &cli, "3").unwrap();
    assert_eq!(value.payload, ParameterPayload::Integer(3));
}

/// Test: interruption raised by the context reaches the caller unchanged
#[test]
fn test_resolve_propagates_interruption() {
    let job = JobParameters::new(vec![integer("N")]).unwrap();
    let mut cli = FakeCli::new();
    cli.interrupted = true;

    let err = job.resolve(&cli, &[]).unwrap_err();
    assert!(matches!(err, ParameterError::Interrupted(name) if name == "N"));
}

/// Test: piped tokens fill parameters not given explicitly
#[test]
fn test_resolve_uses_context_tokens() {
    let mut branch = StringParameter::new(ParameterDefinition::new("BRANCH").unwrap());
    branch.trim = true;
    let job = JobParameters::new(vec![ParameterSpec::String(branch), integer("N")]).unwrap();

    let mut cli = FakeCli::new();
    cli.piped.insert("BRANCH".to_string(), " feature/x\n".to_string());

    let values = job
        .resolve(&cli, &[("N".to_string(), "9".to_string())])
        .unwrap();
    assert_eq!(values[0].payload, ParameterPayload::String("feature/x".to_string()));
    assert_eq!(values[1].payload, ParameterPayload::Integer(9));
}

/// Test: job definitions loaded from TOML drive resolution
#[test]
fn test_job_file_drives_resolution() {
    let job = JobParameters::from_toml(
        r#"
[[parameters]]
type = "boolean"
name = "DEPLOY"
description = "Deploy after build"
default = true

[[parameters]]
type = "password"
name = "TOKEN"
"#,
    )
    .unwrap();

    let values = job.resolve(&ProgrammaticInvocation, &[]).unwrap();
    assert_eq!(values[0].payload, ParameterPayload::Boolean(true));
    assert_eq!(values[1].to_string(), "TOKEN=********");
    assert_eq!(
        job.get("DEPLOY").and_then(|p| p.definition().description.clone()),
        Some("Deploy after build".to_string())
    );
}
