//! HTTP implementation of [`ControlPlane`]

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use super::types::{
    Cluster, ClusterCreateSpec, ClusterResizeOperation, ErrorDetail, ItemList, Project, Task,
    Tenant, Vm,
};
use super::{ApiError, ApiResult, ControlPlane};

const DEFAULT_USER_AGENT: &str = concat!("photonctl-core/", env!("CARGO_PKG_VERSION"));
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`PhotonClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    token: Option<String>,
    user_agent: String,
    timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Bearer token sent with every request
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> ApiResult<PhotonClient> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.base_url));
        }

        let http = reqwest::Client::builder()
            .user_agent(self.user_agent)
            .timeout(self.timeout)
            .build()?;

        Ok(PhotonClient {
            http,
            base_url,
            token: self.token,
        })
    }
}

/// Client for the control-plane REST API
#[derive(Debug, Clone)]
pub struct PhotonClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl PhotonClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, url);
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        trace!("Response {}: {} bytes", status, bytes.len());

        if !status.is_success() {
            return Err(error_from_response(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        self.send::<(), T>(Method::GET, url, None).await
    }
}

fn error_from_response(status: StatusCode, body: &[u8]) -> ApiError {
    let detail: ErrorDetail = serde_json::from_slice(body).unwrap_or_default();
    let message = detail
        .message
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound { message }
    } else {
        ApiError::Http {
            status: status.as_u16(),
            code: detail.code,
            message,
        }
    }
}

#[async_trait]
impl ControlPlane for PhotonClient {
    async fn get_task(&self, task_id: &str) -> ApiResult<Task> {
        self.get(self.endpoint(&["tasks", task_id], &[])?).await
    }

    async fn get_cluster(&self, cluster_id: &str) -> ApiResult<Cluster> {
        self.get(self.endpoint(&["clusters", cluster_id], &[])?)
            .await
    }

    async fn list_clusters(&self, project_id: &str) -> ApiResult<Vec<Cluster>> {
        let list: ItemList<Cluster> = self
            .get(self.endpoint(&["projects", project_id, "clusters"], &[])?)
            .await?;
        Ok(list.items)
    }

    async fn list_cluster_vms(&self, cluster_id: &str) -> ApiResult<Vec<Vm>> {
        let list: ItemList<Vm> = self
            .get(self.endpoint(&["clusters", cluster_id, "vms"], &[])?)
            .await?;
        Ok(list.items)
    }

    async fn create_cluster(&self, project_id: &str, spec: &ClusterCreateSpec) -> ApiResult<Task> {
        let url = self.endpoint(&["projects", project_id, "clusters"], &[])?;
        self.send(Method::POST, url, Some(spec)).await
    }

    async fn resize_cluster(
        &self,
        cluster_id: &str,
        operation: &ClusterResizeOperation,
    ) -> ApiResult<Task> {
        let url = self.endpoint(&["clusters", cluster_id, "resize"], &[])?;
        self.send(Method::POST, url, Some(operation)).await
    }

    async fn delete_cluster(&self, cluster_id: &str) -> ApiResult<Task> {
        let url = self.endpoint(&["clusters", cluster_id], &[])?;
        self.send::<(), Task>(Method::DELETE, url, None).await
    }

    async fn find_tenant(&self, name: &str) -> ApiResult<Option<Tenant>> {
        let list: ItemList<Tenant> = self
            .get(self.endpoint(&["tenants"], &[("name", name)])?)
            .await?;
        Ok(list.items.into_iter().find(|t| t.name == name))
    }

    async fn find_project(&self, tenant_id: &str, name: &str) -> ApiResult<Option<Project>> {
        let list: ItemList<Project> = self
            .get(self.endpoint(&["tenants", tenant_id, "projects"], &[("name", name)])?)
            .await?;
        Ok(list.items.into_iter().find(|p| p.name == name))
    }
}
