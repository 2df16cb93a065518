pub mod domain;
pub mod service_version;

use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::{ApiError, FastlyApi};
use crate::cli::VersionArgs;
use crate::config::ManifestData;
use crate::errlog::ErrorLog;
use crate::errors::DetailsError;
use crate::output::Output;
use crate::service::{resolve_service_id, ServiceDetailsOpts};

/// Everything a command needs for one invocation.
pub struct Context {
    pub api: Arc<dyn FastlyApi>,
    pub out: Output,
    pub errlog: ErrorLog,
    pub manifest: ManifestData,
    pub service_name: Option<String>,
    pub verbose: bool,
}

impl Context {
    /// Options for a command that only reads the selected version.
    pub fn read_opts<'a>(&'a self, version: &'a str) -> ServiceDetailsOpts<'a> {
        self.opts(version, None, true)
    }

    /// Options for a command that changes the selected version.
    pub fn write_opts<'a>(&'a self, target: &'a VersionArgs) -> ServiceDetailsOpts<'a> {
        self.opts(&target.version, target.autoclone, false)
    }

    pub fn opts<'a>(
        &'a self,
        version: &'a str,
        auto_clone: Option<bool>,
        allow_active_locked: bool,
    ) -> ServiceDetailsOpts<'a> {
        ServiceDetailsOpts {
            allow_active_locked,
            auto_clone,
            api: self.api.as_ref(),
            manifest: &self.manifest,
            out: &self.out,
            service_name: self.service_name.as_deref(),
            service_version: Some(version),
            verbose: self.verbose,
            errlog: &self.errlog,
        }
    }

    /// Resolve only the service ID, for commands that are not tied to a version.
    pub async fn service_id(&self) -> Result<String, DetailsError> {
        let resolved = resolve_service_id(
            self.service_name.as_deref(),
            &self.manifest,
            self.api.as_ref(),
            &self.errlog,
        )
        .await;

        let (identity, error) = match resolved {
            Ok(identity) => (identity, None),
            Err((identity, error)) => (identity, Some(error)),
        };
        if self.verbose {
            self.out.message(&identity.describe());
        }
        match error {
            None => Ok(identity.id),
            Some(error) => Err(DetailsError {
                service_id: identity.id,
                version: None,
                error,
            }),
        }
    }

    /// Wrap a failed API call and record it in the error log.
    #[track_caller]
    pub fn api_failure(
        &self,
        err: ApiError,
        context: &'static str,
        service_id: &str,
        version: Option<u32>,
    ) -> anyhow::Error {
        let err = anyhow::Error::new(err).context(context);
        self.errlog.add_with_context(
            &format!("{:#}", err),
            [
                ("Service ID", service_id.to_string()),
                ("Service Version", version.map_or_else(|| "-".to_string(), |v| v.to_string())),
            ],
        );
        err
    }

    /// Report a successful change: plain text for humans, data for agents.
    pub fn success(&self, message: &str, data: Value) {
        if self.out.is_agent() {
            let mut payload = json!({ "success": true, "message": message });
            if let (Some(obj), Value::Object(extra)) = (payload.as_object_mut(), data) {
                obj.extend(extra);
            }
            self.out.result(payload);
        } else {
            self.out.message(message);
        }
    }
}
