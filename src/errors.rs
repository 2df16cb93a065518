//! Errors raised while resolving which service and version to operate on

use thiserror::Error;

use crate::api::{ApiError, Version};

pub const AUTO_CLONE_REMEDIATION: &str =
    "Repeat the command with the --autoclone flag to operate on a clone of the selected version.";

pub const SERVICE_ID_REMEDIATION: &str = "Provide a service ID with --service-id (or a service name with --service-name), \
set FASTLY_SERVICE_ID, or add service_id to fastly.toml.";

/// Coarse classification used for rendering and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoServiceId,
    InvalidInput,
    NotFound,
    NotEditable,
    ApiFailure,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NoServiceId => "NO_SERVICE_ID",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::NotEditable => "NOT_EDITABLE",
            ErrorKind::ApiFailure => "API_FAILURE",
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no service ID found")]
    NoServiceId,

    #[error("invalid service version: {token}")]
    InvalidVersion {
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("no active service version found")]
    NoActiveVersion,

    #[error("specified service version not found: {0}")]
    VersionNotFound(String),

    #[error("error matching service name with available services: {0}")]
    ServiceNameNotFound(String),

    #[error("service version {0} is not editable")]
    NotEditable(u32),

    #[error("{context}: {source}")]
    Api {
        context: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("error listing service versions")]
    NoVersions,
}

impl ResolveError {
    pub fn api(context: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| ResolveError::Api { context, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::NoServiceId => ErrorKind::NoServiceId,
            ResolveError::InvalidVersion { .. } => ErrorKind::InvalidInput,
            ResolveError::NoActiveVersion | ResolveError::VersionNotFound(_) => {
                ErrorKind::NotFound
            }
            ResolveError::NotEditable(_) => ErrorKind::NotEditable,
            ResolveError::ServiceNameNotFound(_)
            | ResolveError::Api { .. }
            | ResolveError::NoVersions => ErrorKind::ApiFailure,
        }
    }

    /// Hint shown to the user alongside the error, if any.
    pub fn remediation(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::NoServiceId => Some(SERVICE_ID_REMEDIATION),
            ErrorKind::NotEditable => Some(AUTO_CLONE_REMEDIATION),
            _ => None,
        }
    }
}

/// Failure of the service details lookup.
///
/// Carries whatever was resolved before the failing step so callers can
/// still report the service and version that were attempted.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DetailsError {
    pub service_id: String,
    pub version: Option<Version>,
    pub error: ResolveError,
}

impl DetailsError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Version number for diagnostics, `-` when resolution never got that far.
    pub fn version_label(&self) -> String {
        self.version
            .as_ref()
            .map(|v| v.number.to_string())
            .unwrap_or_else(|| "-".into())
    }
}
