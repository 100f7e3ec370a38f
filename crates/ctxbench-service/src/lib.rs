//! ctxbench Service
//!
//! The remote graph service the workflows talk to: base network lookup,
//! context subgraph creation, node annotation and GraphML export.
//!
//! [`GraphService`] is the seam. [`http::HttpGraphService`] reaches a real
//! server over REST; tests substitute an in-memory implementation.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod http;

pub use error::ProviderError;
pub use http::{HttpGraphService, HttpServiceFactory, ServiceEndpoint};

use async_trait::async_trait;
use ctxbench_graphml::AnnotationPayload;
use serde::{Deserialize, Serialize};

/// Identity of a network held by the service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Service-assigned id
    pub uuid: String,
    /// Network name
    #[serde(default)]
    pub name: String,
    /// Mapping type, e.g. `PPI` or `SIGNALLING`
    #[serde(default)]
    pub mapping_type: String,
}

impl NetworkInfo {
    /// Create network info
    #[inline]
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        mapping_type: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            mapping_type: mapping_type.into(),
        }
    }
}

/// Request for a context subgraph around a set of symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRequest {
    /// Seed symbols
    #[serde(rename = "genes")]
    pub symbols: Vec<String>,
    /// Name of the network to create
    #[serde(rename = "networkname")]
    pub network_name: String,
    /// Minimum path length
    #[serde(rename = "minSize")]
    pub min_size: u32,
    /// Maximum path length
    #[serde(rename = "maxSize")]
    pub max_size: u32,
}

/// Operations the workflows need from a graph service
///
/// Every call may fail with [`ProviderError`]; none of them retries on its
/// own.
#[async_trait]
pub trait GraphService: Send + Sync {
    /// Look up a network by its name
    async fn network_by_name(&self, name: &str) -> Result<NetworkInfo, ProviderError>;

    /// Look up a network by its uuid
    async fn network_by_uuid(&self, uuid: &str) -> Result<NetworkInfo, ProviderError>;

    /// Node symbols currently exposed by `network`
    async fn node_symbols(&self, network: &NetworkInfo) -> Result<Vec<String>, ProviderError>;

    /// Create a context subgraph of `network`
    async fn create_context(
        &self,
        network: &NetworkInfo,
        request: &ContextRequest,
    ) -> Result<NetworkInfo, ProviderError>;

    /// Annotate nodes of `network`, yielding a new network named `target_name`
    async fn annotate(
        &self,
        network: &NetworkInfo,
        payload: &AnnotationPayload,
        target_name: &str,
        prefix_name: bool,
    ) -> Result<NetworkInfo, ProviderError>;

    /// Export `network` as GraphML text
    async fn export_graphml(&self, network: &NetworkInfo) -> Result<String, ProviderError>;
}

/// Opens services acting as a given user
pub trait GraphServiceFactory: Send + Sync {
    /// Service type produced
    type Service: GraphService;

    /// Open a service for `user`, or the server's default user
    ///
    /// # Errors
    /// Returns [`ProviderError`] if the client cannot be constructed.
    fn connect(&self, user: Option<&str>) -> Result<Self::Service, ProviderError>;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
