//! ctxbench GraphML
//!
//! Reads GraphML exports of context networks and turns them into the data
//! the annotation workflows need.
//!
//! # Core Operations
//!
//! - **Parse**: one streaming pass over a document ([`GraphmlDocument::parse`])
//! - **Extract**: key mapping, node → symbol map, typed node attributes
//! - **Aggregate**: fold symbol occurrences over many documents
//!   ([`SymbolAggregator`]), skipping files that do not qualify
//! - **Annotate**: build the `nodeAnnotationName` / `nodeAnnotation` payloads
//!   sent to the graph service
//!
//! # Architecture
//!
//! ```text
//! GraphML text → GraphmlDocument → KeyMapping → NodeSymbolMap ─┐
//!                                            └→ NodeAttributeMap│
//!                                                               ↓
//!                            SymbolAggregator (SymbolCount) → AnnotationPayload
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use ctxbench_graphml::{FilePattern, SymbolAggregator, presence_annotation, count_annotation};
//!
//! let mut aggregator = SymbolAggregator::new(FilePattern::new("deregnet"));
//! aggregator.ingest("run1-deregnet.graphml", &text);
//!
//! let symbols: Vec<_> = aggregator.counts().keys().cloned().collect();
//! let presence = presence_annotation("DeRegNet_Node", &symbols);
//! let counts = count_annotation("DeRegNet_Count", &symbols, aggregator.counts())?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod aggregate;
pub mod annotation;
pub mod document;
pub mod error;
pub mod extract;

pub use aggregate::{FilePattern, SkipReason, SkippedFile, SymbolAggregator, SymbolCount};
pub use annotation::{
    count_annotation, presence_annotation, symbol_attribute_values, value_annotation,
    AnnotationPayload, AnnotationValue,
};
pub use document::{DataRecord, GraphmlDocument, KeyDeclaration, NodeRecord, GRAPHML_NAMESPACE};
pub use error::{AnnotationError, GraphmlError, ParseError, SchemaError};
pub use extract::{
    build_key_mapping, build_node_attribute_map, build_node_attribute_maps,
    build_node_symbol_map, extract_symbols, AttributeValue, DeclaredType, KeyMapping,
    NodeAttributeMap, NodeSymbolMap, TypeDeclarations, SYMBOL_ATTRIBUTE,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
