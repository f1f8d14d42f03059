//! Request handlers

pub mod api;
pub mod health;

pub use api::{delete_item, list_items, optimization_log, optimize, upload_document, DocumentRequest};
pub use health::health_check;
