//! Core types used throughout the curation system

pub mod component;
pub mod item;

pub use component::*;
pub use item::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global service ID singleton - set once at startup
static SERVICE_ID: OnceLock<ServiceId> = OnceLock::new();

/// Identity used when nothing has been initialized (library use, tests)
static UNSET_SERVICE_ID: ServiceId = ServiceId::Curator;

/// Identifier for the binary currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceId {
    /// Command line optimizer
    Curator,
    /// HTTP API server
    WebServer,
}

impl ServiceId {
    /// Initialize the global service ID for the curator binary
    pub fn init_curator() -> &'static ServiceId {
        SERVICE_ID.get_or_init(|| ServiceId::Curator)
    }

    /// Initialize the global service ID for the webserver binary
    pub fn init_webserver() -> &'static ServiceId {
        SERVICE_ID.get_or_init(|| ServiceId::WebServer)
    }

    /// Get the global service ID, falling back to `Curator` when uninitialized
    pub fn current() -> &'static ServiceId {
        SERVICE_ID.get().unwrap_or(&UNSET_SERVICE_ID)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Curator => write!(f, "curator"),
            ServiceId::WebServer => write!(f, "webserver"),
        }
    }
}

/// Name of a case: the tenant/project scope items are partitioned under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseName(String);

impl CaseName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for CaseName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Current time as an ISO-8601 string, the format every persisted timestamp uses
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
