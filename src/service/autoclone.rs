//! Cloning non-editable versions on request

use crate::api::{FastlyApi, Version};
use crate::errors::ResolveError;
use crate::output::Output;

/// Return a version that is safe to edit.
///
/// Editable versions pass through untouched. An active or locked version is
/// cloned when `requested` is set and rejected otherwise.
pub async fn auto_clone(
    api: &dyn FastlyApi,
    version: Version,
    service_id: &str,
    requested: bool,
    verbose: bool,
    out: &Output,
) -> Result<Version, ResolveError> {
    if version.is_editable() {
        return Ok(version);
    }
    if !requested {
        return Err(ResolveError::NotEditable(version.number));
    }

    let cloned = api
        .clone_version(service_id, version.number)
        .await
        .map_err(ResolveError::api("error cloning service version"))?;

    tracing::info!(service_id, from = version.number, to = cloned.number, "auto-cloned service version");
    if verbose {
        out.message(&format!(
            "Service version {} is not editable, so it was automatically cloned because --autoclone is enabled. Now operating on version {}.",
            version.number, cloned.number
        ));
    }

    Ok(cloned)
}
