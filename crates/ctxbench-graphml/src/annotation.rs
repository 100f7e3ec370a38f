//! Node annotation payloads
//!
//! The graph service accepts annotations as
//! `{"nodeAnnotationName": name, "nodeAnnotation": {symbol: value}}`.

use crate::aggregate::SymbolCount;
use crate::error::AnnotationError;
use crate::extract::{AttributeValue, NodeAttributeMap, SYMBOL_ATTRIBUTE};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One annotation sent to the graph service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPayload {
    /// Name of the node property to create
    pub node_annotation_name: String,
    /// Symbol → value
    pub node_annotation: IndexMap<String, AnnotationValue>,
}

impl AnnotationPayload {
    /// Number of annotated symbols
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.node_annotation.len()
    }

    /// Whether no symbol is annotated
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_annotation.is_empty()
    }
}

/// Value of one node annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// Presence marker
    Flag(bool),
    /// Aggregated occurrence count
    Count(u64),
    /// Float attribute
    Number(f64),
    /// Text attribute
    Text(String),
}

impl From<AttributeValue> for AnnotationValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Number(n) => Self::Number(n),
            AttributeValue::Text(s) => Self::Text(s),
        }
    }
}

/// Mark every symbol as present
#[must_use]
pub fn presence_annotation<S: AsRef<str>>(name: &str, symbols: &[S]) -> AnnotationPayload {
    AnnotationPayload {
        node_annotation_name: name.to_string(),
        node_annotation: symbols
            .iter()
            .map(|s| (s.as_ref().to_string(), AnnotationValue::Flag(true)))
            .collect(),
    }
}

/// Annotate every symbol with its aggregated count
///
/// # Errors
/// Returns [`AnnotationError::MissingSymbol`] if a symbol was never counted.
pub fn count_annotation<S: AsRef<str>>(
    name: &str,
    symbols: &[S],
    counts: &SymbolCount,
) -> Result<AnnotationPayload, AnnotationError> {
    let node_annotation = symbols
        .iter()
        .map(|s| {
            let symbol = s.as_ref();
            counts
                .get(symbol)
                .map(|count| (symbol.to_string(), AnnotationValue::Count(*count)))
                .ok_or_else(|| AnnotationError::MissingSymbol(symbol.to_string()))
        })
        .collect::<Result<_, _>>()?;

    Ok(AnnotationPayload {
        node_annotation_name: name.to_string(),
        node_annotation,
    })
}

/// Annotate every symbol with a typed attribute value
///
/// # Errors
/// Returns [`AnnotationError::MissingSymbol`] if a symbol has no value.
pub fn value_annotation<S: AsRef<str>>(
    name: &str,
    symbols: &[S],
    values: &IndexMap<String, AttributeValue>,
) -> Result<AnnotationPayload, AnnotationError> {
    let node_annotation = symbols
        .iter()
        .map(|s| {
            let symbol = s.as_ref();
            values
                .get(symbol)
                .map(|value| (symbol.to_string(), value.clone().into()))
                .ok_or_else(|| AnnotationError::MissingSymbol(symbol.to_string()))
        })
        .collect::<Result<_, _>>()?;

    Ok(AnnotationPayload {
        node_annotation_name: name.to_string(),
        node_annotation,
    })
}

/// Symbol → value of `attribute`, over the attribute maps of all nodes
///
/// Nodes are keyed by the text of their `symbol` attribute. A later node
/// with the same symbol overwrites an earlier one.
///
/// # Errors
/// Returns [`AnnotationError::MissingAttribute`] for a node without a symbol
/// or without `attribute`.
pub fn symbol_attribute_values(
    nodes: &IndexMap<String, NodeAttributeMap>,
    attribute: &str,
) -> Result<IndexMap<String, AttributeValue>, AnnotationError> {
    let missing = |node: &str, attribute: &str| AnnotationError::MissingAttribute {
        node: node.to_string(),
        attribute: attribute.to_string(),
    };

    let mut values = IndexMap::with_capacity(nodes.len());
    for (node, attributes) in nodes {
        let symbol = attributes
            .get(SYMBOL_ATTRIBUTE)
            .ok_or_else(|| missing(node, SYMBOL_ATTRIBUTE))?;
        let value = attributes
            .get(attribute)
            .ok_or_else(|| missing(node, attribute))?;
        values.insert(symbol.to_string(), value.clone());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counts(pairs: &[(&str, u64)]) -> SymbolCount {
        pairs.iter().map(|(s, c)| ((*s).to_string(), *c)).collect()
    }

    #[test]
    fn presence_payload_serializes() {
        let payload = presence_annotation("X", &["A", "B"]);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"nodeAnnotationName":"X","nodeAnnotation":{"A":true,"B":true}}"#
        );
    }

    #[test]
    fn count_payload_serializes() {
        let c = counts(&[("A", 3), ("B", 1), ("C", 1)]);
        let payload = count_annotation("DeRegNet_Count", &["A", "C"], &c).unwrap();

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "nodeAnnotationName": "DeRegNet_Count",
                "nodeAnnotation": {"A": 3, "C": 1}
            })
        );
    }

    #[test]
    fn count_payload_rejects_uncounted_symbol() {
        let c = counts(&[("A", 3)]);
        assert_eq!(
            count_annotation("N", &["A", "Z"], &c),
            Err(AnnotationError::MissingSymbol("Z".to_string()))
        );
    }

    #[test]
    fn empty_symbol_list_gives_empty_payload() {
        let payload = presence_annotation::<&str>("X", &[]);
        assert!(payload.is_empty());
        assert_eq!(payload.len(), 0);
    }

    #[test]
    fn value_payload_keeps_types() {
        let mut values = IndexMap::new();
        values.insert("A".to_string(), AttributeValue::Number(0.5));
        values.insert("B".to_string(), AttributeValue::Text("up".to_string()));

        let payload = value_annotation("p_score", &["A", "B"], &values).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "nodeAnnotationName": "p_score",
                "nodeAnnotation": {"A": 0.5, "B": "up"}
            })
        );
        assert!(value_annotation("p", &["C"], &values).is_err());
    }

    #[test]
    fn attribute_values_keyed_by_symbol() {
        let mut nodes = IndexMap::new();
        let mut a = NodeAttributeMap::new();
        a.insert("symbol".to_string(), AttributeValue::Text("TP53".to_string()));
        a.insert("score".to_string(), AttributeValue::Number(1.5));
        nodes.insert("n0".to_string(), a);

        let values = symbol_attribute_values(&nodes, "score").unwrap();
        assert_eq!(values["TP53"], AttributeValue::Number(1.5));

        assert_eq!(
            symbol_attribute_values(&nodes, "regulation"),
            Err(AnnotationError::MissingAttribute {
                node: "n0".to_string(),
                attribute: "regulation".to_string()
            })
        );
    }

    #[test]
    fn payload_deserializes() {
        let payload: AnnotationPayload = serde_json::from_str(
            r#"{"nodeAnnotationName":"N","nodeAnnotation":{"A":true,"B":2,"C":0.5,"D":"x"}}"#,
        )
        .unwrap();
        assert_eq!(payload.node_annotation["A"], AnnotationValue::Flag(true));
        assert_eq!(payload.node_annotation["B"], AnnotationValue::Count(2));
        assert_eq!(payload.node_annotation["C"], AnnotationValue::Number(0.5));
        assert_eq!(payload.node_annotation["D"], AnnotationValue::Text("x".to_string()));
    }
}
