//! Recording mock of [`FastlyApi`] for tests.
//!
//! Each call is answered by an optional closure; calling a method that has no
//! closure configured panics so a test notices the unexpected request.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ApiError, Domain, FastlyApi, Service, Version};

type Handler<A, T> = Box<dyn Fn(A) -> Result<T, ApiError> + Send + Sync>;

#[derive(Default)]
pub struct MockApi {
    list_versions: Option<Handler<String, Vec<Version>>>,
    clone_version: Option<Handler<(String, u32), Version>>,
    list_services: Option<Handler<(), Vec<Service>>>,
    version_action: Option<Handler<(String, u32), Version>>,
    update_version: Option<Handler<(String, u32, String), Version>>,
    list_domains: Option<Handler<(String, u32), Vec<Domain>>>,
    create_domain: Option<Handler<(String, u32, String), Domain>>,
    delete_domain: Option<Handler<(String, u32, String), ()>>,
    calls: Mutex<Vec<String>>,
}

/// Error returned by failing fixtures.
pub fn fixture_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "fixture error".into(),
    }
}

/// Build a version list from `(number, active, locked)` triples.
pub fn versions(rows: &[(u32, bool, bool)]) -> Vec<Version> {
    rows.iter()
        .map(|&(number, active, locked)| Version {
            number,
            service_id: "123".into(),
            active,
            locked,
            ..Version::default()
        })
        .collect()
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(self, list: Vec<Version>) -> Self {
        self.on_list_versions(move |_| Ok(list.clone()))
    }

    pub fn on_list_versions<F>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Result<Vec<Version>, ApiError> + Send + Sync + 'static,
    {
        self.list_versions = Some(Box::new(f));
        self
    }

    /// Clones always yield `version + 1`, unless `fail` is set.
    pub fn with_clone(self, fail: bool) -> Self {
        self.on_clone_version(move |(sid, n)| {
            if fail {
                return Err(fixture_error());
            }
            Ok(Version {
                number: n + 1,
                service_id: sid,
                ..Version::default()
            })
        })
    }

    pub fn on_clone_version<F>(mut self, f: F) -> Self
    where
        F: Fn((String, u32)) -> Result<Version, ApiError> + Send + Sync + 'static,
    {
        self.clone_version = Some(Box::new(f));
        self
    }

    pub fn with_services(self, list: Vec<Service>) -> Self {
        self.on_list_services(move |_| Ok(list.clone()))
    }

    pub fn on_list_services<F>(mut self, f: F) -> Self
    where
        F: Fn(()) -> Result<Vec<Service>, ApiError> + Send + Sync + 'static,
    {
        self.list_services = Some(Box::new(f));
        self
    }

    /// Handler shared by activate, deactivate and lock.
    pub fn on_version_action<F>(mut self, f: F) -> Self
    where
        F: Fn((String, u32)) -> Result<Version, ApiError> + Send + Sync + 'static,
    {
        self.version_action = Some(Box::new(f));
        self
    }

    pub fn on_update_version<F>(mut self, f: F) -> Self
    where
        F: Fn((String, u32, String)) -> Result<Version, ApiError> + Send + Sync + 'static,
    {
        self.update_version = Some(Box::new(f));
        self
    }

    pub fn on_list_domains<F>(mut self, f: F) -> Self
    where
        F: Fn((String, u32)) -> Result<Vec<Domain>, ApiError> + Send + Sync + 'static,
    {
        self.list_domains = Some(Box::new(f));
        self
    }

    pub fn on_create_domain<F>(mut self, f: F) -> Self
    where
        F: Fn((String, u32, String)) -> Result<Domain, ApiError> + Send + Sync + 'static,
    {
        self.create_domain = Some(Box::new(f));
        self
    }

    pub fn on_delete_domain<F>(mut self, f: F) -> Self
    where
        F: Fn((String, u32, String)) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.delete_domain = Some(Box::new(f));
        self
    }

    /// Recorded calls, formatted as `method arg...`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls to `method`.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

fn handle<A, T>(handler: &Option<Handler<A, T>>, method: &str, args: A) -> Result<T, ApiError> {
    match handler {
        Some(f) => f(args),
        None => panic!("unexpected call to {}", method),
    }
}

#[async_trait]
impl FastlyApi for MockApi {
    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>, ApiError> {
        self.record(format!("list_versions {}", service_id));
        handle(&self.list_versions, "list_versions", service_id.to_string())
    }

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError> {
        self.record(format!("clone_version {} {}", service_id, version));
        handle(
            &self.clone_version,
            "clone_version",
            (service_id.to_string(), version),
        )
    }

    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        self.record("list_services".into());
        handle(&self.list_services, "list_services", ())
    }

    async fn update_version(
        &self,
        service_id: &str,
        version: u32,
        comment: &str,
    ) -> Result<Version, ApiError> {
        self.record(format!("update_version {} {}", service_id, version));
        handle(
            &self.update_version,
            "update_version",
            (service_id.to_string(), version, comment.to_string()),
        )
    }

    async fn activate_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError> {
        self.record(format!("activate_version {} {}", service_id, version));
        handle(
            &self.version_action,
            "activate_version",
            (service_id.to_string(), version),
        )
    }

    async fn deactivate_version(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Version, ApiError> {
        self.record(format!("deactivate_version {} {}", service_id, version));
        handle(
            &self.version_action,
            "deactivate_version",
            (service_id.to_string(), version),
        )
    }

    async fn lock_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError> {
        self.record(format!("lock_version {} {}", service_id, version));
        handle(
            &self.version_action,
            "lock_version",
            (service_id.to_string(), version),
        )
    }

    async fn list_domains(&self, service_id: &str, version: u32) -> Result<Vec<Domain>, ApiError> {
        self.record(format!("list_domains {} {}", service_id, version));
        handle(
            &self.list_domains,
            "list_domains",
            (service_id.to_string(), version),
        )
    }

    async fn create_domain(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        _comment: &str,
    ) -> Result<Domain, ApiError> {
        self.record(format!("create_domain {} {} {}", service_id, version, name));
        handle(
            &self.create_domain,
            "create_domain",
            (service_id.to_string(), version, name.to_string()),
        )
    }

    async fn delete_domain(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<(), ApiError> {
        self.record(format!("delete_domain {} {} {}", service_id, version, name));
        handle(
            &self.delete_domain,
            "delete_domain",
            (service_id.to_string(), version, name.to_string()),
        )
    }
}
