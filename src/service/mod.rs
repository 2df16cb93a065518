//! Service and version resolution
//!
//! Every command that targets a service version goes through
//! [`service_details`]: resolve the service ID, pick a version from the
//! `--version` token, then make sure the version may be edited, cloning it
//! when `--autoclone` asks for that.

mod autoclone;
mod details;
mod identity;
mod version;

pub use details::{service_details, ServiceDetailsOpts};
pub use identity::resolve_service_id;
