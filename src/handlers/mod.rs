mod health;
mod status;

pub use health::health_check;
pub use status::{method_not_allowed, not_found, service_status};
