//! HTTP handlers: generic resource CRUD, health check and router fallbacks.

pub mod fallback;
pub mod health;
pub mod resource;

pub use fallback::{method_not_allowed, not_found};
pub use health::{health_check_handler, health_report_handler, successful_boot_check, HealthReport};
