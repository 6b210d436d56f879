//! Status icons: resolving stock icons and the non-resolving stand-in.

use super::request::RequestContext;
use crate::error::IconError;
use crate::l10n::{Locale, Localizable, MessageBundle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sizes stock icons are shipped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconSize {
    #[serde(rename = "16x16")]
    Small,
    #[serde(rename = "24x24")]
    Medium,
    #[serde(rename = "32x32")]
    Large,
    #[serde(rename = "48x48")]
    XLarge,
}

impl IconSize {
    pub const ALL: [IconSize; 4] = [
        IconSize::Small,
        IconSize::Medium,
        IconSize::Large,
        IconSize::XLarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IconSize::Small => "16x16",
            IconSize::Medium => "24x24",
            IconSize::Large => "32x32",
            IconSize::XLarge => "48x48",
        }
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconSize {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IconSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| IconError::UnknownSize(s.to_string()))
    }
}

/// An icon plus localized description shown next to a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusIcon {
    /// Stock icon whose path is built from the current request.
    Resolving {
        image: String,
        description: Localizable,
    },
    /// Carries only a description; never yields a path.
    NonResolving { description: Localizable },
}

impl StatusIcon {
    pub fn stock(image: impl Into<String>, description: Localizable) -> Self {
        StatusIcon::Resolving {
            image: image.into(),
            description,
        }
    }

    pub fn non_resolving(description: Localizable) -> Self {
        StatusIcon::NonResolving { description }
    }

    /// Resource path of this icon at `size`.
    ///
    /// A resolving icon needs a request and fails with
    /// [`IconError::NoActiveRequest`] without one. A non-resolving icon
    /// returns `Ok(None)` for any input.
    pub fn image_of(
        &self,
        request: Option<&RequestContext>,
        size: &str,
    ) -> Result<Option<String>, IconError> {
        match self {
            StatusIcon::Resolving { image, .. } => {
                let request = request.ok_or_else(|| IconError::NoActiveRequest {
                    image: image.clone(),
                })?;
                Ok(Some(request.image_path(size, image)))
            }
            StatusIcon::NonResolving { .. } => Ok(None),
        }
    }

    /// Description rendered for `locale` at call time.
    pub fn description(&self, bundle: &MessageBundle, locale: &Locale) -> String {
        self.localizable().to_string(bundle, locale)
    }

    pub fn localizable(&self) -> &Localizable {
        match self {
            StatusIcon::Resolving { description, .. } | StatusIcon::NonResolving { description } => {
                description
            }
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            StatusIcon::Resolving { image, .. } => Some(image),
            StatusIcon::NonResolving { .. } => None,
        }
    }
}
