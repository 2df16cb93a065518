//! Fastly API surface used by the CLI
//!
//! Commands only see the [`FastlyApi`] trait; [`Client`] is the HTTP
//! implementation and tests swap in a recording mock.

mod client;
#[cfg(test)]
pub mod mock;

pub use client::{Client, DEFAULT_ENDPOINT};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============ API Types ============

/// One version of a service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub number: u32,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub deployed: bool,
    #[serde(default)]
    pub staging: bool,
    #[serde(default)]
    pub testing: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Version {
    /// A version may only be changed while it is a draft.
    pub fn is_editable(&self) -> bool {
        !(self.active || self.locked)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub version: u32,
}

// ============ Errors ============

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

// ============ Client Interface ============

/// Calls against the Fastly API made by the resolution core and commands.
#[async_trait]
pub trait FastlyApi: Send + Sync {
    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>, ApiError>;

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError>;

    async fn list_services(&self) -> Result<Vec<Service>, ApiError>;

    async fn update_version(
        &self,
        service_id: &str,
        version: u32,
        comment: &str,
    ) -> Result<Version, ApiError>;

    async fn activate_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError>;

    async fn deactivate_version(&self, service_id: &str, version: u32)
        -> Result<Version, ApiError>;

    async fn lock_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError>;

    async fn list_domains(&self, service_id: &str, version: u32) -> Result<Vec<Domain>, ApiError>;

    async fn create_domain(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        comment: &str,
    ) -> Result<Domain, ApiError>;

    async fn delete_domain(&self, service_id: &str, version: u32, name: &str)
        -> Result<(), ApiError>;
}
