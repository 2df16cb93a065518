//! HTTP implementation of [`FastlyApi`]

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ApiError, Domain, FastlyApi, Service, Version};

pub const DEFAULT_ENDPOINT: &str = "https://api.fastly.com";

const SERVICES_PER_PAGE: usize = 100;

/// Error body returned by the Fastly API.
#[derive(Debug, Deserialize)]
struct FastlyErrorBody {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    detail: String,
}

pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl Client {
    pub fn new(endpoint: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        tracing::debug!(%method, %url, "fastly api request");
        self.http
            .request(method, url)
            .header("Fastly-Key", &self.token)
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = Self::check(req.send().await?).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<FastlyErrorBody>(&body) {
            Ok(e) if !e.detail.is_empty() => format!("{} ({})", e.msg, e.detail),
            Ok(e) if !e.msg.is_empty() => e.msg,
            _ => body,
        };

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn version_path(service_id: &str, version: u32) -> String {
        format!("/service/{}/version/{}", service_id, version)
    }
}

#[async_trait]
impl FastlyApi for Client {
    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>, ApiError> {
        let path = format!("/service/{}/version", service_id);
        self.send(self.request(Method::GET, &path)).await
    }

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError> {
        let path = format!("{}/clone", Self::version_path(service_id, version));
        self.send(self.request(Method::PUT, &path)).await
    }

    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        let mut services = Vec::new();
        let mut page = 1;

        loop {
            let req = self
                .request(Method::GET, "/service")
                .query(&[("page", page), ("per_page", SERVICES_PER_PAGE)]);
            let batch: Vec<Service> = self.send(req).await?;
            let done = batch.len() < SERVICES_PER_PAGE;
            services.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        Ok(services)
    }

    async fn update_version(
        &self,
        service_id: &str,
        version: u32,
        comment: &str,
    ) -> Result<Version, ApiError> {
        let req = self
            .request(Method::PUT, &Self::version_path(service_id, version))
            .form(&[("comment", comment)]);
        self.send(req).await
    }

    async fn activate_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError> {
        let path = format!("{}/activate", Self::version_path(service_id, version));
        self.send(self.request(Method::PUT, &path)).await
    }

    async fn deactivate_version(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Version, ApiError> {
        let path = format!("{}/deactivate", Self::version_path(service_id, version));
        self.send(self.request(Method::PUT, &path)).await
    }

    async fn lock_version(&self, service_id: &str, version: u32) -> Result<Version, ApiError> {
        let path = format!("{}/lock", Self::version_path(service_id, version));
        self.send(self.request(Method::PUT, &path)).await
    }

    async fn list_domains(&self, service_id: &str, version: u32) -> Result<Vec<Domain>, ApiError> {
        let path = format!("{}/domain", Self::version_path(service_id, version));
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create_domain(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        comment: &str,
    ) -> Result<Domain, ApiError> {
        let path = format!("{}/domain", Self::version_path(service_id, version));
        let req = self
            .request(Method::POST, &path)
            .form(&[("name", name), ("comment", comment)]);
        self.send(req).await
    }

    async fn delete_domain(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<(), ApiError> {
        let path = format!("{}/domain/{}", Self::version_path(service_id, version), name);
        let _: serde_json::Value = self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}
