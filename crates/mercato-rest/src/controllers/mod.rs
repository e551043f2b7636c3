//! REST API controllers.

pub mod geocode_controller;
pub mod health_controller;
pub mod listing_controller;
pub mod profile_controller;
pub mod proposal_controller;
pub mod user_controller;
pub mod username_controller;

pub use health_controller::*;
