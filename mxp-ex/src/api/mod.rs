//! HTTP API handlers for mxp-ex

pub mod analyze;
pub mod health;
pub mod upload;

pub use analyze::analyze_routes;
pub use health::health_routes;
pub use upload::upload_routes;
