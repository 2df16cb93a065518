//! Picking one service version out of the user's `--version` token

use std::fmt;
use std::str::FromStr;

use crate::api::{FastlyApi, Version};
use crate::errors::ResolveError;

/// Parsed form of the `--version` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    Unspecified,
    Latest,
    Active,
    Specific(u32),
}

impl VersionSelector {
    /// Parse a token case-insensitively. Anything other than an empty string,
    /// `latest` or `active` must be a version number.
    pub fn parse(token: &str) -> Result<Self, ResolveError> {
        let token = token.trim();
        match token.to_lowercase().as_str() {
            "" => Ok(VersionSelector::Unspecified),
            "latest" => Ok(VersionSelector::Latest),
            "active" => Ok(VersionSelector::Active),
            _ => token
                .parse()
                .map(VersionSelector::Specific)
                .map_err(|source| ResolveError::InvalidVersion {
                    token: token.to_string(),
                    source,
                }),
        }
    }
}

impl FromStr for VersionSelector {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Unspecified => f.write_str(""),
            VersionSelector::Latest => f.write_str("latest"),
            VersionSelector::Active => f.write_str("active"),
            VersionSelector::Specific(n) => write!(f, "{}", n),
        }
    }
}

/// Fetch every version of `service_id` and return the one `selector` names.
///
/// `Latest` and `Unspecified` return the highest version number whatever its
/// state; `Active` and `Specific` only match a version that exists as asked.
pub async fn select_version(
    api: &dyn FastlyApi,
    service_id: &str,
    selector: VersionSelector,
) -> Result<Version, ResolveError> {
    let mut versions = api
        .list_versions(service_id)
        .await
        .map_err(ResolveError::api("error listing service versions"))?;
    if versions.is_empty() {
        return Err(ResolveError::NoVersions);
    }

    versions.sort_by(|a, b| b.number.cmp(&a.number));
    tracing::debug!(service_id, count = versions.len(), %selector, "selecting service version");

    match selector {
        VersionSelector::Latest | VersionSelector::Unspecified => Ok(versions.swap_remove(0)),
        VersionSelector::Active => versions
            .into_iter()
            .find(|v| v.active)
            .ok_or(ResolveError::NoActiveVersion),
        VersionSelector::Specific(n) => versions
            .into_iter()
            .find(|v| v.number == n)
            .ok_or_else(|| ResolveError::VersionNotFound(n.to_string())),
    }
}
