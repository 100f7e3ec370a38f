//! Streaming GraphML reader
//!
//! Walks a document once with quick-xml's namespace-aware reader and keeps
//! only what extraction needs: `key` declarations and, for every `node`
//! inside a `graph`, its `id` and direct `data` children. Everything else
//! (edges, hyperedges, ports, foreign elements) is skipped but still checked
//! for well-formedness.

use crate::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

/// GraphML XML namespace; elements outside it are ignored
pub const GRAPHML_NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";

/// A `<key>` declaration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyDeclaration {
    /// `id` attribute
    pub id: Option<String>,
    /// `attr.name` attribute
    pub name: Option<String>,
    /// `attr.type` attribute
    pub attr_type: Option<String>,
    /// `for` attribute (node, edge, graph, all)
    pub domain: Option<String>,
}

/// A `<data>` child of a node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataRecord {
    /// `key` attribute
    pub key: Option<String>,
    /// Unescaped text content, empty when the element has none
    pub value: String,
}

/// A `<node>` inside a `<graph>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeRecord {
    /// `id` attribute
    pub id: Option<String>,
    /// Direct `data` children in document order
    pub data: Vec<DataRecord>,
}

/// The parts of a GraphML document that extraction reads
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphmlDocument {
    keys: Vec<KeyDeclaration>,
    nodes: Vec<NodeRecord>,
    graphs: usize,
}

impl GraphmlDocument {
    /// Parse GraphML text
    ///
    /// # Errors
    /// Returns [`ParseError`] if the text is not well-formed XML.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut reader = NsReader::from_str(text);

        let mut walker = Walker::default();
        loop {
            let position = reader.buffer_position() as u64;
            let (namespace, event) = reader
                .read_resolved_event()
                .map_err(|e| ParseError::malformed(position, e))?;
            let in_graphml = matches!(
                namespace,
                ResolveResult::Bound(Namespace(ns)) if ns == GRAPHML_NAMESPACE.as_bytes()
            );

            match event {
                Event::Start(e) => walker.open(&e, in_graphml, false, position)?,
                Event::Empty(e) => walker.open(&e, in_graphml, true, position)?,
                Event::End(_) => walker.close(position)?,
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| ParseError::malformed(position, e))?;
                    walker.text(&text, position)?;
                }
                Event::CData(c) => walker.text(&String::from_utf8_lossy(&c), position)?,
                Event::Eof => break,
                _ => {}
            }
        }

        walker.finish()
    }

    /// All `key` declarations in document order
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[KeyDeclaration] {
        &self.keys
    }

    /// All nodes found inside `graph` elements, in document order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Number of `graph` elements seen
    #[inline]
    #[must_use]
    pub fn graph_count(&self) -> usize {
        self.graphs
    }
}

#[derive(Debug)]
enum FrameKind {
    Key,
    Graph,
    Node(usize),
    Data,
    Other,
}

#[derive(Debug)]
struct Frame {
    name: String,
    kind: FrameKind,
}

/// Element stack and collected records for one pass
#[derive(Debug, Default)]
struct Walker {
    doc: GraphmlDocument,
    stack: Vec<Frame>,
    open_graphs: usize,
    /// Node index and record of the `data` element being read
    data: Option<(usize, DataRecord)>,
    root_seen: bool,
}

impl Walker {
    fn open(
        &mut self,
        e: &BytesStart<'_>,
        in_graphml: bool,
        empty: bool,
        position: u64,
    ) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            if self.root_seen {
                return Err(ParseError::OutsideRoot(position));
            }
            self.root_seen = true;
        }

        let local = e.local_name();
        let kind = match (in_graphml, local.as_ref()) {
            (true, b"key") => {
                self.doc.keys.push(KeyDeclaration {
                    id: attribute(e, "id", position)?,
                    name: attribute(e, "attr.name", position)?,
                    attr_type: attribute(e, "attr.type", position)?,
                    domain: attribute(e, "for", position)?,
                });
                FrameKind::Key
            }
            (true, b"graph") => {
                self.doc.graphs += 1;
                FrameKind::Graph
            }
            (true, b"node") if self.open_graphs > 0 => {
                self.doc.nodes.push(NodeRecord {
                    id: attribute(e, "id", position)?,
                    data: Vec::new(),
                });
                FrameKind::Node(self.doc.nodes.len() - 1)
            }
            (true, b"data") => match self.stack.last() {
                Some(Frame {
                    kind: FrameKind::Node(index),
                    ..
                }) => {
                    let record = DataRecord {
                        key: attribute(e, "key", position)?,
                        value: String::new(),
                    };
                    self.data = Some((*index, record));
                    FrameKind::Data
                }
                _ => FrameKind::Other,
            },
            _ => FrameKind::Other,
        };

        if empty {
            self.finish_element(&kind);
        } else {
            if matches!(kind, FrameKind::Graph) {
                self.open_graphs += 1;
            }
            self.stack.push(Frame {
                name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                kind,
            });
        }
        Ok(())
    }

    fn close(&mut self, position: u64) -> Result<(), ParseError> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| ParseError::malformed(position, "end tag without start tag"))?;
        if matches!(frame.kind, FrameKind::Graph) {
            self.open_graphs -= 1;
        }
        self.finish_element(&frame.kind);
        Ok(())
    }

    fn finish_element(&mut self, kind: &FrameKind) {
        if let FrameKind::Data = kind {
            if let Some((index, record)) = self.data.take() {
                self.doc.nodes[index].data.push(record);
            }
        }
    }

    fn text(&mut self, text: &str, position: u64) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(ParseError::OutsideRoot(position));
        }
        if let Some((_, record)) = self.data.as_mut() {
            if matches!(self.stack.last().map(|f| &f.kind), Some(FrameKind::Data)) {
                record.value.push_str(text);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<GraphmlDocument, ParseError> {
        if let Some(frame) = self.stack.last() {
            return Err(ParseError::UnclosedElement(frame.name.clone()));
        }
        if !self.root_seen {
            return Err(ParseError::Empty);
        }
        Ok(self.doc)
    }
}

fn attribute(
    e: &BytesStart<'_>,
    name: &str,
    position: u64,
) -> Result<Option<String>, ParseError> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|err| ParseError::malformed(position, err))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|err| ParseError::malformed(position, err))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}
