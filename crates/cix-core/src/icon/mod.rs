//! Status icons and the request context their paths are resolved against.

mod ball;
mod request;
mod status;

pub use ball::{BallColor, BallTone};
pub use request::RequestContext;
pub use status::{IconSize, StatusIcon};
