//! Key mapping and node attribute extraction
//!
//! GraphML stores node attributes indirectly: each `<data key="d3">` points
//! at a `<key id="d3" attr.name="symbol">` declaration. A [`KeyMapping`]
//! resolves those references for one document; it is never shared across
//! documents since key ids are document-local.

use crate::document::{GraphmlDocument, NodeRecord};
use crate::error::{GraphmlError, SchemaError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute name that carries a node's symbol
pub const SYMBOL_ATTRIBUTE: &str = "symbol";

/// Node id → symbol, in document order
pub type NodeSymbolMap = IndexMap<String, String>;

/// Attribute name → typed value for one node
pub type NodeAttributeMap = IndexMap<String, AttributeValue>;

/// Resolves document-local key ids to attribute names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMapping {
    names: IndexMap<String, String>,
    types: IndexMap<String, String>,
}

impl KeyMapping {
    /// Attribute name declared for `key_id`
    #[inline]
    #[must_use]
    pub fn resolve(&self, key_id: &str) -> Option<&str> {
        self.names.get(key_id).map(String::as_str)
    }

    /// `attr.type` declared for `key_id`, if any
    #[inline]
    #[must_use]
    pub fn declared_type(&self, key_id: &str) -> Option<&str> {
        self.types.get(key_id).map(String::as_str)
    }

    /// Number of declared keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no key was declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over `(key id, attribute name)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Declared value type of a node attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    /// `double` or `float`: value is parsed as `f64`
    Float,
    /// Anything else: value kept as text
    #[default]
    Text,
}

impl DeclaredType {
    /// Classify a type name; `double` and `float` are numeric, all else is text
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "double" | "float" => Self::Float,
            _ => Self::Text,
        }
    }
}

/// Attribute name → declared type, supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDeclarations {
    types: IndexMap<String, DeclaredType>,
}

impl TypeDeclarations {
    /// Empty declarations: every attribute is text
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair attribute names with type names position by position
    ///
    /// Extra entries of the longer list are ignored.
    #[must_use]
    pub fn from_lists<N: AsRef<str>, T: AsRef<str>>(names: &[N], types: &[T]) -> Self {
        names
            .iter()
            .zip(types)
            .map(|(name, type_name)| (name.as_ref().to_string(), type_name.as_ref()))
            .collect()
    }

    /// Declare the type of one attribute
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, declared: DeclaredType) -> Self {
        self.types.insert(name.into(), declared);
        self
    }

    /// Type of `name`, text when undeclared
    #[inline]
    #[must_use]
    pub fn type_of(&self, name: &str) -> DeclaredType {
        self.types.get(name).copied().unwrap_or_default()
    }

    /// Declared attribute names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl<N, T> FromIterator<(N, T)> for TypeDeclarations
where
    N: Into<String>,
    T: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Self {
            types: iter
                .into_iter()
                .map(|(name, type_name)| (name.into(), DeclaredType::from_type_name(type_name.as_ref())))
                .collect(),
        }
    }
}

/// Typed value of a node attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Float-declared attribute
    Number(f64),
    /// Any other attribute
    Text(String),
}

impl AttributeValue {
    /// Text value, if this is a text attribute
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Numeric value, if this is a float attribute
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Build the key id → attribute name mapping of a document
///
/// # Errors
/// Returns [`SchemaError::MissingAttribute`] for a `key` without `id` or
/// `attr.name`.
pub fn build_key_mapping(doc: &GraphmlDocument) -> Result<KeyMapping, SchemaError> {
    let mut mapping = KeyMapping::default();
    for key in doc.keys() {
        let id = key.id.clone().ok_or(SchemaError::missing("key", "id"))?;
        let name = key
            .name
            .clone()
            .ok_or(SchemaError::missing("key", "attr.name"))?;
        if let Some(attr_type) = &key.attr_type {
            mapping.types.insert(id.clone(), attr_type.clone());
        }
        mapping.names.insert(id, name);
    }
    Ok(mapping)
}

/// Map every node id to its `symbol` attribute
///
/// Nodes without a symbol, or with an empty one, are left out.
///
/// # Errors
/// Returns [`SchemaError`] if a node has no `id`, a `data` element has no
/// `key`, or a `key` is not in `keys`.
pub fn build_node_symbol_map(
    doc: &GraphmlDocument,
    keys: &KeyMapping,
) -> Result<NodeSymbolMap, SchemaError> {
    let mut symbols = NodeSymbolMap::new();
    for node in doc.nodes() {
        let id = node_id(node)?;
        for data in &node.data {
            let name = resolve(keys, id, data.key.as_deref())?;
            if name == SYMBOL_ATTRIBUTE && !data.value.is_empty() {
                symbols.insert(id.to_string(), data.value.clone());
            }
        }
    }
    Ok(symbols)
}

/// Collect one node's `data` children as typed attributes
///
/// Values of attributes declared `double`/`float` in `types` are parsed as
/// `f64`; everything else, including undeclared attributes, stays text.
///
/// # Errors
/// Returns [`SchemaError`] for unresolvable keys or unparsable numbers.
pub fn build_node_attribute_map(
    node: &NodeRecord,
    keys: &KeyMapping,
    types: &TypeDeclarations,
) -> Result<NodeAttributeMap, SchemaError> {
    let id = node_id(node)?;
    let mut attributes = NodeAttributeMap::new();
    for data in &node.data {
        let name = resolve(keys, id, data.key.as_deref())?;
        let value = match types.type_of(name) {
            DeclaredType::Float => {
                let number = data.value.trim().parse::<f64>().map_err(|_| {
                    SchemaError::InvalidNumber {
                        attribute: name.to_string(),
                        value: data.value.clone(),
                    }
                })?;
                AttributeValue::Number(number)
            }
            DeclaredType::Text => AttributeValue::Text(data.value.clone()),
        };
        attributes.insert(name.to_string(), value);
    }
    Ok(attributes)
}

/// Attribute maps of every node, keyed by node id
///
/// # Errors
/// Fails on the first node that [`build_node_attribute_map`] rejects.
pub fn build_node_attribute_maps(
    doc: &GraphmlDocument,
    keys: &KeyMapping,
    types: &TypeDeclarations,
) -> Result<IndexMap<String, NodeAttributeMap>, SchemaError> {
    doc.nodes()
        .iter()
        .map(|node| -> Result<_, SchemaError> {
            let attributes = build_node_attribute_map(node, keys, types)?;
            Ok((node_id(node)?.to_string(), attributes))
        })
        .collect()
}

/// Parse a document and return its node → symbol map
///
/// # Errors
/// Returns [`GraphmlError`] if the text is malformed or breaks the key scheme.
pub fn extract_symbols(text: &str) -> Result<NodeSymbolMap, GraphmlError> {
    let doc = GraphmlDocument::parse(text)?;
    let keys = build_key_mapping(&doc)?;
    Ok(build_node_symbol_map(&doc, &keys)?)
}

fn node_id(node: &NodeRecord) -> Result<&str, SchemaError> {
    node.id.as_deref().ok_or(SchemaError::missing("node", "id"))
}

fn resolve<'k>(keys: &'k KeyMapping, node: &str, key: Option<&str>) -> Result<&'k str, SchemaError> {
    let key = key.ok_or(SchemaError::missing("data", "key"))?;
    keys.resolve(key).ok_or_else(|| SchemaError::UnknownKey {
        node: node.to_string(),
        key: key.to_string(),
    })
}
