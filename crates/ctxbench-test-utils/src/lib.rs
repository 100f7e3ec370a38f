//! Testing utilities for ctxbench workspace
//!
//! Shared fakes and fixtures:
//! - [`FakeGraphService`]: in-memory graph service with scripted failures
//!   and call recording
//! - [`GraphmlBuilder`]: small GraphML documents for extractor and workflow tests

#![allow(missing_docs)]

use async_trait::async_trait;
use ctxbench_graphml::AnnotationPayload;
use ctxbench_service::{
    ContextRequest, GraphService, GraphServiceFactory, NetworkInfo, ProviderError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Key id used for the symbol attribute by [`symbols_graphml`]
pub const SYMBOL_KEY: &str = "v_symbol";

/// Builder for GraphML fixtures
#[derive(Debug, Clone, Default)]
pub struct GraphmlBuilder {
    keys: Vec<(String, String, String)>,
    nodes: Vec<(String, Vec<(String, String)>)>,
    edges: Vec<(String, String)>,
}

impl GraphmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node key
    pub fn key(mut self, id: &str, name: &str, attr_type: &str) -> Self {
        self.keys
            .push((id.to_string(), name.to_string(), attr_type.to_string()));
        self
    }

    /// Add a node with `(key id, value)` data
    pub fn node(mut self, id: &str, data: &[(&str, &str)]) -> Self {
        let data = data
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.nodes.push((id.to_string(), data));
        self
    }

    /// Add an edge
    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push((source.to_string(), target.to_string()));
        self
    }

    pub fn build(&self) -> String {
        use quick_xml::escape::escape;

        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n",
        );
        for (id, name, attr_type) in &self.keys {
            out.push_str(&format!(
                "  <key id=\"{}\" for=\"node\" attr.name=\"{}\" attr.type=\"{}\"/>\n",
                escape(id.as_str()),
                escape(name.as_str()),
                escape(attr_type.as_str())
            ));
        }
        out.push_str("  <graph id=\"G\" edgedefault=\"directed\">\n");
        for (id, data) in &self.nodes {
            out.push_str(&format!("    <node id=\"{}\">", escape(id.as_str())));
            for (key, value) in data {
                out.push_str(&format!(
                    "<data key=\"{}\">{}</data>",
                    escape(key.as_str()),
                    escape(value.as_str())
                ));
            }
            out.push_str("</node>\n");
        }
        for (source, target) in &self.edges {
            out.push_str(&format!(
                "    <edge source=\"{}\" target=\"{}\"/>\n",
                escape(source.as_str()),
                escape(target.as_str())
            ));
        }
        out.push_str("  </graph>\n</graphml>\n");
        out
    }
}

/// Document with one node per symbol, ids `n0`, `n1`, ...
pub fn symbols_graphml<S: AsRef<str>>(symbols: &[S]) -> String {
    let mut builder = GraphmlBuilder::new().key(SYMBOL_KEY, "symbol", "string");
    for (i, symbol) in symbols.iter().enumerate() {
        builder = builder.node(&format!("n{i}"), &[(SYMBOL_KEY, symbol.as_ref())]);
    }
    builder.build()
}

/// One recorded call on a [`FakeGraphService`]
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    NetworkByName(String),
    NetworkByUuid(String),
    NodeSymbols(String),
    CreateContext {
        network: String,
        request: ContextRequest,
    },
    Annotate {
        network: String,
        payload: AnnotationPayload,
        target: String,
        prefix_name: bool,
    },
    ExportGraphml(String),
}

#[derive(Debug, Default)]
struct FakeState {
    networks: Vec<NetworkInfo>,
    symbols: HashMap<String, Vec<String>>,
    graphml: HashMap<String, String>,
    context_failures: usize,
    failing_context_names: Vec<String>,
    fail_annotations: bool,
    export_failures: usize,
    calls: Vec<ServiceCall>,
    users: Vec<Option<String>>,
    next_id: usize,
}

impl FakeState {
    fn next_uuid(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{kind}-{}", self.next_id)
    }

    fn add(&mut self, network: NetworkInfo, graphml: String) {
        self.graphml.insert(network.uuid.clone(), graphml);
        self.networks.push(network);
    }
}

/// In-memory graph service
///
/// Context networks get the drawn symbols as nodes; annotated networks are
/// named `{target}_{source}` when the prefix flag is set. Clones share state,
/// so a clone handed to a workflow can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct FakeGraphService {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGraphService {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a base network exposing `symbols`
    pub fn with_network(self, name: &str, mapping_type: &str, symbols: &[&str]) -> Self {
        {
            let mut state = self.state();
            let uuid = state.next_uuid("net");
            let symbols: Vec<String> = symbols.iter().map(|s| (*s).to_string()).collect();
            let graphml = symbols_graphml(&symbols);
            state.symbols.insert(uuid.clone(), symbols);
            state.add(NetworkInfo::new(uuid, name, mapping_type), graphml);
        }
        self
    }

    /// The next `count` context creations fail with status 503
    pub fn failing_contexts(self, count: usize) -> Self {
        self.state().context_failures = count;
        self
    }

    /// Context creations whose network name contains `fragment` fail
    pub fn failing_contexts_named(self, fragment: &str) -> Self {
        self.state().failing_context_names.push(fragment.to_string());
        self
    }

    /// Every annotation fails with status 500
    pub fn failing_annotations(self) -> Self {
        self.state().fail_annotations = true;
        self
    }

    /// The next `count` exports fail with status 500
    pub fn failing_exports(self, count: usize) -> Self {
        self.state().export_failures = count;
        self
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state().calls.clone()
    }

    /// Context requests, in call order
    pub fn context_requests(&self) -> Vec<ContextRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ServiceCall::CreateContext { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Annotation payloads with target name and prefix flag, in call order
    pub fn annotations(&self) -> Vec<(AnnotationPayload, String, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ServiceCall::Annotate {
                    payload,
                    target,
                    prefix_name,
                    ..
                } => Some((payload, target, prefix_name)),
                _ => None,
            })
            .collect()
    }

    /// Users passed to [`GraphServiceFactory::connect`]
    pub fn users(&self) -> Vec<Option<String>> {
        self.state().users.clone()
    }

    /// Known network by name
    pub fn network(&self, name: &str) -> Option<NetworkInfo> {
        self.state().networks.iter().find(|n| n.name == name).cloned()
    }
}

#[async_trait]
impl GraphService for FakeGraphService {
    async fn network_by_name(&self, name: &str) -> Result<NetworkInfo, ProviderError> {
        let mut state = self.state();
        state.calls.push(ServiceCall::NetworkByName(name.to_string()));
        state
            .networks
            .iter()
            .find(|n| n.name == name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    async fn network_by_uuid(&self, uuid: &str) -> Result<NetworkInfo, ProviderError> {
        let mut state = self.state();
        state.calls.push(ServiceCall::NetworkByUuid(uuid.to_string()));
        state
            .networks
            .iter()
            .find(|n| n.uuid == uuid)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(uuid.to_string()))
    }

    async fn node_symbols(&self, network: &NetworkInfo) -> Result<Vec<String>, ProviderError> {
        let mut state = self.state();
        state.calls.push(ServiceCall::NodeSymbols(network.uuid.clone()));
        state
            .symbols
            .get(&network.uuid)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(network.uuid.clone()))
    }

    async fn create_context(
        &self,
        network: &NetworkInfo,
        request: &ContextRequest,
    ) -> Result<NetworkInfo, ProviderError> {
        let mut state = self.state();
        state.calls.push(ServiceCall::CreateContext {
            network: network.uuid.clone(),
            request: request.clone(),
        });
        if state.context_failures > 0 {
            state.context_failures -= 1;
            return Err(ProviderError::api(503, "context creation unavailable"));
        }
        if state
            .failing_context_names
            .iter()
            .any(|f| request.network_name.contains(f.as_str()))
        {
            return Err(ProviderError::NoResult(format!(
                "no context for {}",
                request.network_name
            )));
        }
        let uuid = state.next_uuid("ctx");
        let context = NetworkInfo::new(uuid, &request.network_name, &network.mapping_type);
        state.add(context.clone(), symbols_graphml(&request.symbols));
        Ok(context)
    }

    async fn annotate(
        &self,
        network: &NetworkInfo,
        payload: &AnnotationPayload,
        target_name: &str,
        prefix_name: bool,
    ) -> Result<NetworkInfo, ProviderError> {
        let mut state = self.state();
        state.calls.push(ServiceCall::Annotate {
            network: network.uuid.clone(),
            payload: payload.clone(),
            target: target_name.to_string(),
            prefix_name,
        });
        if state.fail_annotations {
            return Err(ProviderError::api(500, "annotation failed"));
        }
        let graphml = state
            .graphml
            .get(&network.uuid)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(network.uuid.clone()))?;
        let name = if prefix_name {
            format!("{target_name}_{}", network.name)
        } else {
            target_name.to_string()
        };
        let uuid = state.next_uuid("ann");
        let annotated = NetworkInfo::new(uuid, name, &network.mapping_type);
        state.add(annotated.clone(), graphml);
        Ok(annotated)
    }

    async fn export_graphml(&self, network: &NetworkInfo) -> Result<String, ProviderError> {
        let mut state = self.state();
        state.calls.push(ServiceCall::ExportGraphml(network.uuid.clone()));
        if state.export_failures > 0 {
            state.export_failures -= 1;
            return Err(ProviderError::api(500, "export failed"));
        }
        state
            .graphml
            .get(&network.uuid)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(network.uuid.clone()))
    }
}

impl GraphServiceFactory for FakeGraphService {
    type Service = FakeGraphService;

    fn connect(&self, user: Option<&str>) -> Result<Self::Service, ProviderError> {
        self.state().users.push(user.map(str::to_string));
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxbench_graphml::{extract_symbols, presence_annotation};

    #[test]
    fn builder_output_parses() {
        let doc = GraphmlBuilder::new()
            .key("s", "symbol", "string")
            .key("w", "score", "double")
            .node("a", &[("s", "A&B"), ("w", "0.5")])
            .node("b", &[("s", "<C>")])
            .edge("a", "b")
            .build();
        let symbols = extract_symbols(&doc).unwrap();
        assert_eq!(symbols["a"], "A&B");
        assert_eq!(symbols["b"], "<C>");
    }

    #[test]
    fn symbols_fixture_keeps_order() {
        let symbols = extract_symbols(&symbols_graphml(&["X", "Y", "X"])).unwrap();
        let values: Vec<_> = symbols.values().cloned().collect();
        assert_eq!(values, vec!["X", "Y", "X"]);
    }

    #[tokio::test]
    async fn fake_scripts_context_failures() {
        let fake = FakeGraphService::new()
            .with_network("base", "PPI", &["A", "B"])
            .failing_contexts(1);
        let base = fake.network_by_name("base").await.unwrap();
        let request = ContextRequest {
            symbols: vec!["A".to_string()],
            network_name: "ctx".to_string(),
            min_size: 0,
            max_size: 2,
        };

        assert!(fake.create_context(&base, &request).await.is_err());
        let context = fake.create_context(&base, &request).await.unwrap();
        assert_eq!(context.name, "ctx");
        assert_eq!(context.mapping_type, "PPI");
        assert_eq!(fake.context_requests().len(), 2);

        let graphml = fake.export_graphml(&context).await.unwrap();
        assert_eq!(extract_symbols(&graphml).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fake_prefixes_annotated_names() {
        let fake = FakeGraphService::new().with_network("base", "PPI", &["A"]);
        let base = fake.network_by_name("base").await.unwrap();
        let payload = presence_annotation("flag", &["A"]);

        let prefixed = fake.annotate(&base, &payload, "DRN", true).await.unwrap();
        assert_eq!(prefixed.name, "DRN_base");
        let plain = fake.annotate(&base, &payload, "DRN", false).await.unwrap();
        assert_eq!(plain.name, "DRN");
        assert_eq!(fake.annotations().len(), 2);
    }

    #[test]
    fn connect_records_users_and_shares_state() {
        let fake = FakeGraphService::new().with_network("base", "PPI", &[]);
        let service = fake.connect(Some("alice")).unwrap();
        fake.connect(None).unwrap();

        assert_eq!(fake.users(), vec![Some("alice".to_string()), None]);
        assert!(service.network("base").is_some());
    }
}
