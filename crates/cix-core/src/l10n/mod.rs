//! Localized descriptions resolved at read time.

mod bundle;
mod locale;
mod localizable;

pub use bundle::MessageBundle;
pub use locale::Locale;
pub use localizable::Localizable;
