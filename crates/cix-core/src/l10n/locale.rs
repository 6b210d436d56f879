//! Locale identifiers.

use crate::error::L10nError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language with an optional region, e.g. `de` or `de_AT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Locale of the root message table.
    pub fn root() -> Self {
        Locale {
            language: "en".to_string(),
            region: None,
        }
    }

    pub fn new(language: &str, region: Option<&str>) -> Result<Self, L10nError> {
        let raw = match region {
            Some(r) => format!("{language}_{r}"),
            None => language.to_string(),
        };
        raw.parse()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Lookup chain, most specific first: `de_AT`, `de`.
    pub fn candidates(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(2);
        if let Some(region) = &self.region {
            out.push(format!("{}_{}", self.language, region));
        }
        out.push(self.language.clone());
        out
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::root()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = L10nError;

    /// Accepts `de`, `de_AT`, `de-AT` and POSIX forms such as `de_AT.UTF-8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = trimmed.split(['.', '@']).next().unwrap_or_default();
        let mut parts = base.split(['_', '-']);

        let language = parts.next().unwrap_or_default();
        let valid_lang =
            (2..=3).contains(&language.len()) && language.chars().all(|c| c.is_ascii_alphabetic());
        if !valid_lang {
            return Err(L10nError::InvalidLocale(s.to_string()));
        }

        let region = match parts.next() {
            Some(r) if (2..=3).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Some(r.to_ascii_uppercase())
            }
            Some(_) => return Err(L10nError::InvalidLocale(s.to_string())),
            None => None,
        };
        if parts.next().is_some() {
            return Err(L10nError::InvalidLocale(s.to_string()));
        }

        Ok(Locale {
            language: language.to_ascii_lowercase(),
            region,
        })
    }
}

impl TryFrom<String> for Locale {
    type Error = L10nError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
