//! Error types for GraphML extraction
//!
//! - [`ParseError`]: the text is not well-formed XML
//! - [`SchemaError`]: well-formed XML that does not follow the GraphML key scheme
//! - [`AnnotationError`]: a payload was requested for symbols the data does not cover

/// The document is not well-formed XML
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Reader rejected the input
    #[error("malformed XML at byte {position}: {message}")]
    Malformed {
        /// Byte offset of the event that failed
        position: u64,
        /// Reader diagnostic
        message: String,
    },

    /// Document ended inside an element
    #[error("unclosed element <{0}> at end of document")]
    UnclosedElement(String),

    /// Second top-level element or stray text outside the root
    #[error("content outside the root element at byte {0}")]
    OutsideRoot(u64),

    /// No root element at all
    #[error("document has no root element")]
    Empty,
}

impl ParseError {
    /// Create malformed error from reader position and message
    pub fn malformed(position: u64, message: impl std::fmt::Display) -> Self {
        Self::Malformed {
            position,
            message: message.to_string(),
        }
    }
}

/// Well-formed XML that breaks the GraphML key scheme
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A `data` element references a key that was never declared
    #[error("node '{node}' references undeclared key '{key}'")]
    UnknownKey {
        /// Id of the node holding the `data` element
        node: String,
        /// Undeclared key id
        key: String,
    },

    /// Required attribute is missing
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Element lacking the attribute
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
    },

    /// Value of a float-declared attribute is not a number
    #[error("attribute '{attribute}' is declared numeric but holds '{value}'")]
    InvalidNumber {
        /// Attribute name
        attribute: String,
        /// Text that failed to parse
        value: String,
    },
}

impl SchemaError {
    /// Create missing attribute error
    #[inline]
    pub fn missing(element: &'static str, attribute: &'static str) -> Self {
        Self::MissingAttribute { element, attribute }
    }
}

/// Any failure while extracting from one document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphmlError {
    /// Not well-formed XML
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Key scheme violated
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Annotation payload could not be built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// Requested symbol has no value in the source map
    #[error("no value for symbol '{0}'")]
    MissingSymbol(String),

    /// A node lacks an attribute the annotation needs
    #[error("node '{node}' has no attribute '{attribute}'")]
    MissingAttribute {
        /// Node id
        node: String,
        /// Attribute the annotation needs
        attribute: String,
    },
}
