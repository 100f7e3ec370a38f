//! Network download against a mocked graph service

use async_trait::async_trait;
use ctxbench_core::workflows::fetch::{fetch_network, NetworkSelector};
use ctxbench_core::BenchError;
use ctxbench_graphml::AnnotationPayload;
use ctxbench_service::{ContextRequest, GraphService, NetworkInfo, ProviderError};
use mockall::mock;

mock! {
    pub Service {}

    #[async_trait]
    impl GraphService for Service {
        async fn network_by_name(&self, name: &str) -> Result<NetworkInfo, ProviderError>;
        async fn network_by_uuid(&self, uuid: &str) -> Result<NetworkInfo, ProviderError>;
        async fn node_symbols(&self, network: &NetworkInfo) -> Result<Vec<String>, ProviderError>;
        async fn create_context(
            &self,
            network: &NetworkInfo,
            request: &ContextRequest,
        ) -> Result<NetworkInfo, ProviderError>;
        async fn annotate(
            &self,
            network: &NetworkInfo,
            payload: &AnnotationPayload,
            target_name: &str,
            prefix_name: bool,
        ) -> Result<NetworkInfo, ProviderError>;
        async fn export_graphml(&self, network: &NetworkInfo) -> Result<String, ProviderError>;
    }
}

#[tokio::test]
async fn fetch_by_uuid_writes_uuid_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = MockService::new();
    service
        .expect_network_by_uuid()
        .withf(|uuid| uuid == "u-1")
        .times(1)
        .returning(|_| Ok(NetworkInfo::new("u-1", "base", "PPI")));
    service
        .expect_export_graphml()
        .withf(|network| network.uuid == "u-1")
        .times(1)
        .returning(|_| Ok("<graphml/>".to_string()));
    service.expect_network_by_name().times(0);

    let path = fetch_network(&service, &NetworkSelector::Uuid("u-1".to_string()), dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("u-1.graphml"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<graphml/>");
}

#[tokio::test]
async fn fetch_by_name_resolves_uuid() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = MockService::new();
    service
        .expect_network_by_name()
        .withf(|name| name == "PPI-base")
        .returning(|_| Ok(NetworkInfo::new("u-7", "PPI-base", "PPI")));
    service
        .expect_export_graphml()
        .returning(|_| Ok("<graphml/>".to_string()));

    let path = fetch_network(
        &service,
        &NetworkSelector::Name("PPI-base".to_string()),
        dir.path(),
    )
    .await
    .unwrap();

    assert_eq!(path.file_name().unwrap(), "u-7.graphml");
}

#[tokio::test]
async fn unknown_network_is_not_exported() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = MockService::new();
    service
        .expect_network_by_uuid()
        .returning(|uuid| Err(ProviderError::NotFound(uuid.to_string())));
    service.expect_export_graphml().times(0);

    let err = fetch_network(&service, &NetworkSelector::Uuid("nope".to_string()), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, BenchError::Provider(ProviderError::NotFound(ref id)) if id == "nope"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
