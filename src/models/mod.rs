mod web;

pub use web::{HealthData, StatusData, WebResponse, status_tag};
