//! CIX Core - CI extension contracts
//!
//! Provides the small extension points a CI web front end is built from:
//! - Build parameters: typed conversion of string tokens into parameter values
//! - Status icons: stock icon path resolution and build-status balls
//! - Localization: message bundles rendered per caller-supplied locale
//!
//! Request and locale are explicit arguments everywhere; nothing here reads
//! thread-local or global state.

pub mod config;
pub mod error;
pub mod icon;
pub mod l10n;
pub mod parameter;
pub mod telemetry;

pub use config::{default_resource_root, CixConfig};
pub use error::{CixError, ConfigError, IconError, L10nError, ParameterError, Result};
pub use icon::{BallColor, IconSize, RequestContext, StatusIcon};
pub use l10n::{Locale, Localizable, MessageBundle};
pub use parameter::{
    create_value_with_context, InvocationContext, JobParameters, ParameterConverter,
    ParameterDefinition, ParameterPayload, ParameterSpec, ParameterValue, ProgrammaticInvocation,
};

/// CIX core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
