//! Configuration loading (.env + fastly.toml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_SERVICE_ID: &str = "FASTLY_SERVICE_ID";
pub const ENV_PROJECT_DIR: &str = "FASTLY_PROJECT_DIR";
pub const ENV_ERROR_LOG: &str = "FASTLY_ERROR_LOG";

pub const MANIFEST_FILENAME: &str = "fastly.toml";

/// Project directory (where .env and fastly.toml are)
pub fn project_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_PROJECT_DIR) {
        return PathBuf::from(dir);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Load .env file, if the project has one
pub fn load_env() -> Result<()> {
    let env_path = project_dir().join(".env");
    if !env_path.exists() {
        return Ok(());
    }
    dotenvy::from_path(&env_path)
        .with_context(|| format!("Failed to load .env from {:?}", env_path))?;
    Ok(())
}

/// Where the error log is persisted.
///
/// `FASTLY_ERROR_LOG` wins, then the user config directory. `None` when no
/// suitable directory can be found.
pub fn error_log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_ERROR_LOG) {
        return Some(PathBuf::from(path));
    }
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|home| Path::new(&home).join(".config")))
        .ok()?;
    Some(config_dir.join("fastly").join("errors.log"))
}

// ============ Manifest ============

/// The parts of fastly.toml the CLI cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub service_id: String,
}

impl ManifestFile {
    /// Read fastly.toml from `dir`. A missing file is not an error.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILENAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {} from {:?}", MANIFEST_FILENAME, path))?;
        let manifest: ManifestFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", MANIFEST_FILENAME))?;
        Ok(Some(manifest))
    }
}

/// Where a service ID came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    File,
    Env,
    Undefined,
}

/// Every place a service ID may be supplied from, gathered up front.
#[derive(Debug, Clone, Default)]
pub struct ManifestData {
    pub flag_service_id: Option<String>,
    pub file: Option<ManifestFile>,
    pub env_service_id: Option<String>,
}

impl ManifestData {
    /// Gather the flag value together with fastly.toml and the environment.
    pub fn load(flag_service_id: Option<String>) -> Result<Self> {
        Ok(Self {
            flag_service_id,
            file: ManifestFile::load(&project_dir())?,
            env_service_id: std::env::var(ENV_SERVICE_ID).ok(),
        })
    }

    /// Whether `--service-id` was given.
    pub fn has_flag(&self) -> bool {
        non_empty(self.flag_service_id.as_deref()).is_some()
    }

    /// Service ID from the first source that has one: flag, file, env.
    pub fn service_id(&self) -> (String, Source) {
        if let Some(id) = non_empty(self.flag_service_id.as_deref()) {
            return (id.to_string(), Source::Flag);
        }
        let file_id = self.file.as_ref().map(|f| f.service_id.as_str());
        if let Some(id) = non_empty(file_id) {
            return (id.to_string(), Source::File);
        }
        if let Some(id) = non_empty(self.env_service_id.as_deref()) {
            return (id.to_string(), Source::Env);
        }
        (String::new(), Source::Undefined)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
