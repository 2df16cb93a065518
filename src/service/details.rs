//! Service ID + version lookup shared by every service-scoped command

use crate::api::{FastlyApi, Version};
use crate::config::ManifestData;
use crate::errlog::ErrorLog;
use crate::errors::{DetailsError, ResolveError};
use crate::output::Output;

use super::autoclone::auto_clone;
use super::identity::resolve_service_id;
use super::version::{select_version, VersionSelector};

/// Inputs to [`service_details`].
pub struct ServiceDetailsOpts<'a> {
    /// Skip the editability check, for commands that never modify the version.
    pub allow_active_locked: bool,
    /// `None` when `--autoclone` was not given.
    pub auto_clone: Option<bool>,
    pub api: &'a dyn FastlyApi,
    pub manifest: &'a ManifestData,
    pub out: &'a Output,
    pub service_name: Option<&'a str>,
    pub service_version: Option<&'a str>,
    pub verbose: bool,
    pub errlog: &'a ErrorLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDetails {
    pub service_id: String,
    pub version: Version,
}

/// Resolve the service ID and the version a command should operate on.
///
/// When auto-cloning fails the error carries the version that was selected
/// before the clone was attempted.
pub async fn service_details(opts: ServiceDetailsOpts<'_>) -> Result<ServiceDetails, DetailsError> {
    let identity = match resolve_service_id(opts.service_name, opts.manifest, opts.api, opts.errlog).await {
        Ok(identity) => identity,
        Err((identity, error)) => {
            if opts.verbose {
                opts.out.message(&identity.describe());
            }
            return Err(fail(opts.errlog, identity.id, None, error));
        }
    };
    if opts.verbose {
        opts.out.message(&identity.describe());
    }
    let service_id = identity.id;

    let selected = match resolve_version(&opts, &service_id).await {
        Ok(v) => v,
        Err(error) => return Err(fail(opts.errlog, service_id, None, error)),
    };

    let version = match opts.auto_clone {
        Some(requested) => {
            let result = auto_clone(
                opts.api,
                selected.clone(),
                &service_id,
                requested,
                opts.verbose,
                opts.out,
            )
            .await;
            match result {
                Ok(v) => v,
                Err(error) => return Err(fail(opts.errlog, service_id, Some(selected), error)),
            }
        }
        None if !opts.allow_active_locked && !selected.is_editable() => {
            let error = ResolveError::NotEditable(selected.number);
            return Err(fail(opts.errlog, service_id, Some(selected), error));
        }
        None => selected,
    };

    tracing::debug!(service_id = %service_id, version = version.number, "resolved service details");
    Ok(ServiceDetails {
        service_id,
        version,
    })
}

async fn resolve_version(opts: &ServiceDetailsOpts<'_>, service_id: &str) -> Result<Version, ResolveError> {
    let selector = VersionSelector::parse(opts.service_version.unwrap_or_default())?;
    select_version(opts.api, service_id, selector).await
}

fn fail(errlog: &ErrorLog, service_id: String, version: Option<Version>, error: ResolveError) -> DetailsError {
    let err = DetailsError {
        service_id,
        version,
        error,
    };
    errlog.add_with_context(
        &err,
        [
            ("Service ID", err.service_id.clone()),
            ("Service Version", err.version_label()),
        ],
    );
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{fixture_error, versions, MockApi};
    use crate::errors::ErrorKind;
    use crate::output::capture::Capture;

    struct Harness {
        api: MockApi,
        manifest: ManifestData,
        cap: Capture,
        out: Output,
        errlog: ErrorLog,
    }

    impl Harness {
        fn new(api: MockApi) -> Self {
            let cap = Capture::default();
            Self {
                api,
                manifest: ManifestData {
                    flag_service_id: Some("123".into()),
                    ..ManifestData::default()
                },
                out: cap.output(false),
                cap,
                errlog: ErrorLog::new(),
            }
        }

        fn opts<'a>(&'a self, version: Option<&'a str>, auto_clone: Option<bool>) -> ServiceDetailsOpts<'a> {
            ServiceDetailsOpts {
                allow_active_locked: false,
                auto_clone,
                api: &self.api,
                manifest: &self.manifest,
                out: &self.out,
                service_name: None,
                service_version: version,
                verbose: false,
                errlog: &self.errlog,
            }
        }
    }

    #[tokio::test]
    async fn editable_latest_version() {
        let h = Harness::new(MockApi::new().with_versions(versions(&[(1, true, true), (2, false, false)])));
        let details = service_details(h.opts(None, None)).await.unwrap();
        assert_eq!(details.service_id, "123");
        assert_eq!(details.version.number, 2);
        assert!(h.errlog.is_empty());
    }

    #[tokio::test]
    async fn active_version_rejected_inline_without_clone() {
        let h = Harness::new(
            MockApi::new()
                .with_versions(versions(&[(1, false, false), (2, true, false)]))
                .with_clone(false),
        );
        let err = service_details(h.opts(Some("2"), None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotEditable);
        assert_eq!(err.to_string(), "service version 2 is not editable");
        assert_eq!(err.version.as_ref().map(|v| v.number), Some(2));
        assert_eq!(h.api.call_count("clone_version"), 0);

        let entry = &h.errlog.entries()[0];
        assert_eq!(entry.context["Service ID"], "123");
        assert_eq!(entry.context["Service Version"], "2");
    }

    #[tokio::test]
    async fn allow_active_locked_skips_check() {
        let h = Harness::new(MockApi::new().with_versions(versions(&[(1, false, true)])));
        let mut opts = h.opts(Some("active"), None);
        opts.allow_active_locked = true;
        let err = service_details(opts).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let mut opts = h.opts(Some("1"), None);
        opts.allow_active_locked = true;
        let details = service_details(opts).await.unwrap();
        assert!(details.version.locked);
    }

    #[tokio::test]
    async fn autoclone_replaces_locked_version() {
        let h = Harness::new(
            MockApi::new()
                .with_versions(versions(&[(1, false, false), (2, false, true)]))
                .on_clone_version(|(sid, _)| {
                    Ok(Version {
                        number: 4,
                        service_id: sid,
                        ..Version::default()
                    })
                }),
        );
        let mut opts = h.opts(Some("2"), Some(true));
        opts.verbose = true;
        let details = service_details(opts).await.unwrap();
        assert_eq!(details.version.number, 4);

        let printed = h.cap.contents();
        assert!(printed.starts_with("Service ID (via --service-id): 123\n"));
        assert!(printed.contains("Now operating on version 4."));
    }

    #[tokio::test]
    async fn autoclone_false_still_rejects() {
        let h = Harness::new(
            MockApi::new()
                .with_versions(versions(&[(2, true, false)]))
                .with_clone(false),
        );
        let err = service_details(h.opts(None, Some(false))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotEditable);
        assert_eq!(h.api.call_count("clone_version"), 0);
    }

    #[tokio::test]
    async fn clone_failure_returns_pre_clone_version() {
        let h = Harness::new(
            MockApi::new()
                .with_versions(versions(&[(3, true, false)]))
                .with_clone(true),
        );
        let err = service_details(h.opts(Some("latest"), Some(true))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiFailure);
        assert_eq!(err.version.map(|v| v.number), Some(3));
    }

    #[tokio::test]
    async fn missing_service_id_fails_before_any_api_call() {
        let mut h = Harness::new(MockApi::new());
        h.manifest = ManifestData::default();
        let mut opts = h.opts(None, Some(true));
        opts.verbose = true;

        let err = service_details(opts).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoServiceId);
        assert_eq!(err.version_label(), "-");
        assert!(h.api.calls().is_empty());
        assert_eq!(h.cap.contents(), "Service ID (not provided): \n");
    }

    #[tokio::test]
    async fn invalid_version_token() {
        let h = Harness::new(MockApi::new().with_versions(versions(&[(1, false, false)])));
        let err = service_details(h.opts(Some("newest"), None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn list_failure_is_logged_with_placeholder_version() {
        let h = Harness::new(MockApi::new().on_list_versions(|_| Err(fixture_error())));
        let err = service_details(h.opts(None, None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiFailure);
        assert_eq!(h.errlog.entries()[0].context["Service Version"], "-");
    }
}
