//! Invocation contexts and the shared context adapter.

use super::{ParameterConverter, ParameterValue};
use crate::error::ParameterError;
use tracing::debug;

/// Where a build trigger came from.
///
/// A context may hold tokens the caller did not pass explicitly, such as a
/// value piped on stdin. Reading them can fail with
/// [`ParameterError::Io`] or [`ParameterError::Interrupted`].
pub trait InvocationContext: Send + Sync {
    /// Short origin label used in logs ("cli", "api", ...).
    fn origin(&self) -> &str;

    /// Token for `name` held by the context itself, if any.
    fn pending_token(&self, name: &str) -> Result<Option<String>, ParameterError>;

    /// Names the context holds tokens for. Each must be a defined parameter.
    fn held_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Context for triggers issued from code. Holds no tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammaticInvocation;

impl InvocationContext for ProgrammaticInvocation {
    fn origin(&self) -> &str {
        "api"
    }

    fn pending_token(&self, _name: &str) -> Result<Option<String>, ParameterError> {
        Ok(None)
    }
}

/// Convert `raw` on behalf of an invocation context.
///
/// Every origin goes through here, and the result is always exactly
/// `converter.create_value(raw)`. The context is not consulted.
pub fn create_value_with_context<P, C>(
    converter: &P,
    ctx: &C,
    raw: &str,
) -> Result<ParameterValue, ParameterError>
where
    P: ParameterConverter + ?Sized,
    C: InvocationContext + ?Sized,
{
    let _ = ctx;
    debug!(parameter = %converter.name(), kind = converter.type_name(), "converting token");
    converter.create_value(raw)
}
