//! Typed Azure DevOps client used by the time-log sync service.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{ApiResponse, DevOpsClient};
pub use config::DevOpsConfig;
pub use error::{DevOpsError, Result};
pub use models::{
    PatchOperation, TimeLogEntry, WiqlQueryResult, WorkItemId, WorkItemReference,
};
