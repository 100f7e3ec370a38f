//! REST adapter for the graph service

use crate::{ContextRequest, GraphService, GraphServiceFactory, NetworkInfo, ProviderError};
use async_trait::async_trait;
use ctxbench_graphml::AnnotationPayload;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the service listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Host name, with or without scheme
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Path prefix of the REST application
    pub application_context: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            application_context: "sbml4j".to_string(),
            timeout_secs: 300,
        }
    }
}

impl ServiceEndpoint {
    /// Base URL of the REST application
    ///
    /// A host without scheme gets `http://`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let scheme = if host.starts_with("http") { "" } else { "http://" };
        let context = self.application_context.trim_matches('/');
        if context.is_empty() {
            format!("{scheme}{host}:{}", self.port)
        } else {
            format!("{scheme}{host}:{}/{context}", self.port)
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterOptions {
    node_symbols: Vec<String>,
}

/// Graph service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpGraphService {
    client: reqwest::Client,
    base_url: String,
    user: Option<String>,
}

impl HttpGraphService {
    /// Create a client for `endpoint`, acting as `user` when given
    ///
    /// # Errors
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: &ServiceEndpoint, user: Option<&str>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: endpoint.base_url(),
            user: user.map(str::to_string),
        })
    }

    /// Base URL requests go to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// User the requests act as
    #[inline]
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn with_user(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.user {
            Some(user) => req.header("user", user),
            None => req,
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ProviderError::api(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let resp = self.with_user(self.client.get(&url)).send().await?;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("{url}: {e}")))
    }

    async fn post_json<B, T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ProviderError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let resp = self
            .with_user(self.client.post(&url))
            .query(query)
            .json(body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("{url}: {e}")))
    }
}

#[async_trait]
impl GraphService for HttpGraphService {
    async fn network_by_name(&self, name: &str) -> Result<NetworkInfo, ProviderError> {
        let networks: Vec<NetworkInfo> = self.get_json("networks").await?;
        networks
            .into_iter()
            .find(|n| n.name == name)
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    async fn network_by_uuid(&self, uuid: &str) -> Result<NetworkInfo, ProviderError> {
        self.get_json(&format!("networks/{uuid}")).await
    }

    async fn node_symbols(&self, network: &NetworkInfo) -> Result<Vec<String>, ProviderError> {
        let options: FilterOptions = self
            .get_json(&format!("networks/{}/filterOptions", network.uuid))
            .await?;
        Ok(options.node_symbols)
    }

    async fn create_context(
        &self,
        network: &NetworkInfo,
        request: &ContextRequest,
    ) -> Result<NetworkInfo, ProviderError> {
        self.post_json(&format!("networks/{}/context", network.uuid), &[], request)
            .await
    }

    async fn annotate(
        &self,
        network: &NetworkInfo,
        payload: &AnnotationPayload,
        target_name: &str,
        prefix_name: bool,
    ) -> Result<NetworkInfo, ProviderError> {
        let query = [
            ("networkname", target_name.to_string()),
            ("prefixName", prefix_name.to_string()),
        ];
        self.post_json(&format!("networks/{}/annotation", network.uuid), &query, payload)
            .await
    }

    async fn export_graphml(&self, network: &NetworkInfo) -> Result<String, ProviderError> {
        let url = self.url(&format!("networks/{}/graphml", network.uuid));
        tracing::debug!("GET {}", url);
        let resp = self
            .with_user(self.client.get(&url))
            .header(reqwest::header::ACCEPT, "application/octet-stream")
            .send()
            .await?;
        let text = Self::check(resp).await?.text().await?;
        if text.trim().is_empty() {
            return Err(ProviderError::NoResult(format!(
                "empty GraphML for network {}",
                network.uuid
            )));
        }
        Ok(text)
    }
}

/// Opens [`HttpGraphService`]s for one endpoint
#[derive(Debug, Clone, Default)]
pub struct HttpServiceFactory {
    endpoint: ServiceEndpoint,
}

impl HttpServiceFactory {
    /// Create a factory for `endpoint`
    #[inline]
    #[must_use]
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self { endpoint }
    }

    /// Endpoint services connect to
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }
}

impl GraphServiceFactory for HttpServiceFactory {
    type Service = HttpGraphService;

    fn connect(&self, user: Option<&str>) -> Result<Self::Service, ProviderError> {
        HttpGraphService::new(&self.endpoint, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(host: &str, context: &str) -> ServiceEndpoint {
        ServiceEndpoint {
            host: host.to_string(),
            port: 8080,
            application_context: context.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn base_url_adds_scheme() {
        assert_eq!(
            endpoint("sbml4j", "sbml4j").base_url(),
            "http://sbml4j:8080/sbml4j"
        );
        assert_eq!(
            endpoint("https://graph.example.org", "/api/").base_url(),
            "https://graph.example.org:8080/api"
        );
        assert_eq!(endpoint("localhost", "").base_url(), "http://localhost:8080");
    }

    #[test]
    fn request_urls_join_paths() {
        let service = HttpGraphService::new(&endpoint("localhost", "sbml4j"), None).unwrap();
        assert_eq!(
            service.url("networks/abc/context"),
            "http://localhost:8080/sbml4j/networks/abc/context"
        );
        assert_eq!(
            service.url("/networks"),
            "http://localhost:8080/sbml4j/networks"
        );
    }

    #[test]
    fn factory_sets_user() {
        let factory = HttpServiceFactory::new(endpoint("localhost", "sbml4j"));
        let service = factory.connect(Some("contextcreationtimer")).unwrap();
        assert_eq!(service.user(), Some("contextcreationtimer"));
        assert_eq!(factory.connect(None).unwrap().user(), None);
    }

    #[test]
    fn filter_options_symbols() {
        let options: FilterOptions =
            serde_json::from_str(r#"{"nodeSymbols":["A","B"],"edgeTypes":["x"]}"#).unwrap();
        assert_eq!(options.node_symbols, vec!["A", "B"]);
    }

    #[test]
    fn filter_options_without_symbols_is_rejected() {
        let nested = serde_json::from_str::<FilterOptions>(r#"{"filter":{"nodeSymbols":["A"]}}"#);
        assert!(nested.is_err());
        assert!(serde_json::from_str::<FilterOptions>("{}").is_err());
    }
}
