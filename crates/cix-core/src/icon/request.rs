//! Request-scoped inputs for icon URL construction.

/// The parts of an HTTP request icon paths are built from.
///
/// `context_path` is where the application is mounted (`""` or `/app`);
/// `resource_root` is the static-resource prefix (`/static/5a1b2c3d`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    context_path: String,
    resource_root: String,
}

impl RequestContext {
    pub fn new(context_path: &str, resource_root: &str) -> Self {
        Self {
            context_path: normalize_prefix(context_path),
            resource_root: normalize_prefix(resource_root),
        }
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    pub fn resource_root(&self) -> &str {
        &self.resource_root
    }

    /// `{context_path}{resource_root}/images/{size}/{image}`
    pub fn image_path(&self, size: &str, image: &str) -> String {
        format!(
            "{}{}/images/{}/{}",
            self.context_path, self.resource_root, size, image
        )
    }
}

/// Leading slash, no trailing slash; empty and `/` become `""`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
