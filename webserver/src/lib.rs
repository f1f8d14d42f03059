//! HTTP surface for the dashboard curator
//!
//! Exposes item listing and deletion, document analysis, optimization runs
//! and the persisted optimization log over a small JSON API.

pub mod error;
pub mod state;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use state::AppState;
pub use webserver_impl::WebServer;
