pub mod api;
pub mod config;
pub mod lifecycle;
pub mod models;
pub mod priority;
pub mod views;

pub use api::{ApiError, ComplaintClient};
pub use lifecycle::{Action, LifecycleError, Status};
pub use priority::{detect_priority, Priority, PriorityRules};
