//! Working out which service a command targets

use crate::api::FastlyApi;
use crate::config::{ManifestData, Source, ENV_SERVICE_ID, MANIFEST_FILENAME};
use crate::errlog::ErrorLog;
use crate::errors::ResolveError;

pub const FLAG_SERVICE_ID: &str = "--service-id";
pub const FLAG_SERVICE_NAME: &str = "--service-name";

/// A resolved service ID and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub id: String,
    pub source: Source,
    /// Flag that supplied the ID when `source` is [`Source::Flag`].
    pub flag: &'static str,
}

impl ServiceIdentity {
    fn undefined() -> Self {
        Self {
            id: String::new(),
            source: Source::Undefined,
            flag: FLAG_SERVICE_ID,
        }
    }

    /// One-line provenance, e.g. `Service ID (via fastly.toml): abc`.
    pub fn describe(&self) -> String {
        let via = match self.source {
            Source::Flag => format!(" (via {})", self.flag),
            Source::File => format!(" (via {})", MANIFEST_FILENAME),
            Source::Env => format!(" (via {})", ENV_SERVICE_ID),
            Source::Undefined => " (not provided)".to_string(),
        };
        format!("Service ID{}: {}", via, self.id)
    }
}

/// Resolve the service ID.
///
/// Precedence: `--service-id`, then `--service-name` (one API lookup), then
/// fastly.toml, then `FASTLY_SERVICE_ID`. On failure the partially resolved
/// identity is handed back with the error so it can still be displayed.
pub async fn resolve_service_id(
    service_name: Option<&str>,
    data: &ManifestData,
    api: &dyn FastlyApi,
    errlog: &ErrorLog,
) -> Result<ServiceIdentity, (ServiceIdentity, ResolveError)> {
    let service_name = service_name.map(str::trim).filter(|n| !n.is_empty());

    if let Some(name) = service_name {
        if data.has_flag() {
            tracing::warn!(service_name = name, "both {} and {} given, using {}", FLAG_SERVICE_ID, FLAG_SERVICE_NAME, FLAG_SERVICE_ID);
        } else {
            return match service_id_by_name(api, name).await {
                Ok(id) => Ok(ServiceIdentity {
                    id,
                    source: Source::Flag,
                    flag: FLAG_SERVICE_NAME,
                }),
                Err(e) => {
                    errlog.add(&e);
                    Err((ServiceIdentity::undefined(), e))
                }
            };
        }
    }

    let (id, source) = data.service_id();
    if source == Source::Undefined {
        let err = ResolveError::NoServiceId;
        errlog.add(&err);
        return Err((ServiceIdentity::undefined(), err));
    }

    Ok(ServiceIdentity {
        id,
        source,
        flag: FLAG_SERVICE_ID,
    })
}

/// Look up a service ID by exact service name.
pub async fn service_id_by_name(api: &dyn FastlyApi, name: &str) -> Result<String, ResolveError> {
    let services = api
        .list_services()
        .await
        .map_err(ResolveError::api("error listing services"))?;

    services
        .into_iter()
        .find(|s| s.name == name)
        .map(|s| s.id)
        .ok_or_else(|| ResolveError::ServiceNameNotFound(name.to_string()))
}
