//! HTTP API for the StorePulse analytics dashboard.

pub mod rest;
pub mod server;

pub use rest::AppState;
pub use server::ApiServer;
