//! Deferred, locale-independent message references.

use super::bundle::MessageBundle;
use super::locale::Locale;
use serde::{Deserialize, Serialize};

/// A message key plus arguments, rendered only when a locale is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Localizable {
    pub key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Localizable {
    pub fn new(key: impl Into<String>) -> Self {
        Localizable {
            key: key.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(key: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Localizable {
            key: key.into(),
            args: args.into_iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Render for `locale`.
    pub fn to_string(&self, bundle: &MessageBundle, locale: &Locale) -> String {
        bundle.format(&self.key, &self.args, locale)
    }
}
