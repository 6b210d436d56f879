//! Command-line invocation context.

use cix_core::{InvocationContext, ParameterError};
use std::io::Read;
use std::sync::Mutex;
use tracing::debug;

/// A `cix params` invocation. At most one parameter may take its token from
/// the reader (normally stdin); one trailing line break is stripped.
pub struct CliInvocation<R> {
    stdin_param: Option<String>,
    reader: Mutex<R>,
}

impl<R: Read + Send> CliInvocation<R> {
    pub fn new(stdin_param: Option<String>, reader: R) -> Self {
        Self {
            stdin_param,
            reader: Mutex::new(reader),
        }
    }
}

impl<R: Read + Send> InvocationContext for CliInvocation<R> {
    fn origin(&self) -> &str {
        "cli"
    }

    fn pending_token(&self, name: &str) -> Result<Option<String>, ParameterError> {
        if self.stdin_param.as_deref() != Some(name) {
            return Ok(None);
        }

        let mut reader = self
            .reader
            .lock()
            .map_err(|_| std::io::Error::other("stdin reader poisoned"))?;
        let mut token = String::new();
        reader.read_to_string(&mut token)?;
        debug!(parameter = name, bytes = token.len(), "read token from stdin");

        if token.ends_with('\n') {
            token.pop();
            if token.ends_with('\r') {
                token.pop();
            }
        }
        Ok(Some(token))
    }

    fn held_names(&self) -> Vec<&str> {
        self.stdin_param.as_deref().into_iter().collect()
    }
}
