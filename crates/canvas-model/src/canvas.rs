// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The document root: ordered nodes and edges.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::attach::EdgeEnd;
use crate::edge::Edge;
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::ident::Identifier;
use crate::json::{Fields, JsonPath};
use crate::node::Node;

/// Knobs for [`Canvas::decode_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject documents with duplicate ids or edges pointing at missing
    /// nodes. Off by default: the host app itself tolerates both.
    pub strict_references: bool,
}

impl DecodeOptions {
    /// Options with reference checks on.
    pub const fn strict() -> Self {
        Self {
            strict_references: true,
        }
    }
}

/// A structural problem the format permits but a careful caller may reject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// The same id is used by two elements (nodes and edges share one id
    /// space). Reported at the second occurrence.
    DuplicateId {
        /// Repeated id.
        id: Identifier,
        /// Location of the repeat, e.g. `$.edges[4].id`.
        at: JsonPath,
    },
    /// An edge end names a node that is not in the canvas.
    DanglingEndpoint {
        /// Offending edge.
        edge: Identifier,
        /// Which end.
        end: EdgeEnd,
        /// Missing node id.
        node: Identifier,
        /// Location of the reference, e.g. `$.edges[0].toNode`.
        at: JsonPath,
    },
}

impl IntegrityIssue {
    /// Location of the offending value.
    pub fn path(&self) -> &JsonPath {
        match self {
            Self::DuplicateId { at, .. } | Self::DanglingEndpoint { at, .. } => at,
        }
    }

    fn into_decode_error(self) -> DecodeError {
        match self {
            Self::DuplicateId { id, at } => DecodeError::new(at, DecodeErrorKind::DuplicateId(id)),
            Self::DanglingEndpoint { edge, node, at, .. } => {
                DecodeError::new(at, DecodeErrorKind::DanglingEndpoint { edge, node })
            }
        }
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id, at } => write!(f, "{at}: duplicate id {id}"),
            Self::DanglingEndpoint {
                edge,
                end,
                node,
                at,
            } => write!(f, "{at}: {end} of edge {edge} references missing node {node}"),
        }
    }
}

/// A canvas document.
///
/// Node and edge order is the order of the source document and survives a
/// decode/encode round-trip; it carries no meaning beyond that.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Canvas {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Canvas {
    /// Empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas from existing sequences.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Hand back the sequences.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in document order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Append a node.
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append an edge.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Append a node in place.
    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Append an edge in place.
    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// First node with `id`.
    pub fn node(&self, id: Identifier) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// First edge with `id`.
    pub fn edge(&self, id: Identifier) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    /// Edges with a bound end on `node`.
    pub fn edges_touching(&self, node: Identifier) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.touches(node))
    }

    /// Swap in `node` for the first node with the same id, keeping its slot.
    /// Returns the previous node, or hands `node` back if no slot matched.
    pub fn replace_node(&mut self, node: Node) -> Result<Node, Node> {
        match self.nodes.iter_mut().find(|n| n.id() == node.id()) {
            Some(slot) => Ok(std::mem::replace(slot, node)),
            None => Err(node),
        }
    }

    /// Swap in `edge` for the first edge with the same id, keeping its slot.
    pub fn replace_edge(&mut self, edge: Edge) -> Result<Edge, Edge> {
        match self.edges.iter_mut().find(|e| e.id() == edge.id()) {
            Some(slot) => Ok(std::mem::replace(slot, edge)),
            None => Err(edge),
        }
    }

    /// Remove the first node with `id`. Edges referencing it are left alone.
    pub fn remove_node(&mut self, id: Identifier) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id() == id)?;
        Some(self.nodes.remove(index))
    }

    /// Remove the first edge with `id`.
    pub fn remove_edge(&mut self, id: Identifier) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id() == id)?;
        Some(self.edges.remove(index))
    }

    /// True when every edge is bound, i.e. [`Canvas::encode`] will succeed.
    pub fn is_serializable(&self) -> bool {
        self.edges.iter().all(|e| e.attachments().is_bound())
    }

    /// Duplicate ids and dangling edge endpoints, in document order.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let root = JsonPath::root();

        for (index, node) in self.nodes.iter().enumerate() {
            if !seen.insert(node.id()) {
                issues.push(IntegrityIssue::DuplicateId {
                    id: node.id(),
                    at: root.key("nodes").index(index).key("id"),
                });
            }
        }
        for (index, edge) in self.edges.iter().enumerate() {
            if !seen.insert(edge.id()) {
                issues.push(IntegrityIssue::DuplicateId {
                    id: edge.id(),
                    at: root.key("edges").index(index).key("id"),
                });
            }
        }

        let node_ids: HashSet<Identifier> = self.nodes.iter().map(Node::id).collect();
        for (index, edge) in self.edges.iter().enumerate() {
            let attachments = edge.attachments();
            let ends = [
                (EdgeEnd::Start, "fromNode", attachments.start_attachment()),
                (EdgeEnd::End, "toNode", attachments.end_attachment()),
            ];
            for (end, key, attachment) in ends {
                let Some(attachment) = attachment else {
                    continue;
                };
                if !node_ids.contains(&attachment.node()) {
                    issues.push(IntegrityIssue::DanglingEndpoint {
                        edge: edge.id(),
                        end,
                        node: attachment.node(),
                        at: root.key("edges").index(index).key(key),
                    });
                }
            }
        }
        issues
    }

    /// Decode a document with default (lenient) options.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        Self::decode_with(value, DecodeOptions::default())
    }

    /// Decode a document. Any bad element fails the whole document.
    pub fn decode_with(value: &Value, options: DecodeOptions) -> Result<Self, DecodeError> {
        let root = JsonPath::root();
        let fields = Fields::of(value, &root)?;
        let raw_nodes = fields.array("nodes")?;
        let raw_edges = fields.array("edges")?;

        let nodes_path = root.key("nodes");
        let nodes = raw_nodes
            .iter()
            .enumerate()
            .map(|(i, raw)| Node::decode_at(raw, &nodes_path.index(i)))
            .collect::<Result<Vec<_>, _>>()?;
        let edges_path = root.key("edges");
        let edges = raw_edges
            .iter()
            .enumerate()
            .map(|(i, raw)| Edge::decode_at(raw, &edges_path.index(i)))
            .collect::<Result<Vec<_>, _>>()?;

        let canvas = Self { nodes, edges };
        if options.strict_references {
            if let Some(issue) = canvas.integrity_issues().into_iter().next() {
                return Err(issue.into_decode_error());
            }
        }
        debug!(
            nodes = canvas.nodes.len(),
            edges = canvas.edges.len(),
            strict = options.strict_references,
            "decoded canvas"
        );
        Ok(canvas)
    }

    /// Encode the document. Fails on the first edge that is not bound; no
    /// partial output is produced.
    pub fn encode(&self) -> Result<Value, EncodeError> {
        let nodes: Vec<Value> = self.nodes.iter().map(Node::encode).collect();
        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| {
                edge.encode().map_err(|source| EncodeError::Edge {
                    index,
                    edge: edge.id(),
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(nodes = nodes.len(), edges = edges.len(), "encoded canvas");
        let mut out = Map::new();
        out.insert("nodes".into(), Value::Array(nodes));
        out.insert("edges".into(), Value::Array(edges));
        Ok(Value::Object(out))
    }

    /// Parse and decode document text.
    pub fn from_json_str(text: &str) -> Result<Self, DecodeError> {
        Self::from_json_str_with(text, DecodeOptions::default())
    }

    /// Parse and decode document text with `options`.
    pub fn from_json_str_with(text: &str, options: DecodeOptions) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text).map_err(|err| {
            DecodeError::new(
                JsonPath::root(),
                DecodeErrorKind::Syntax {
                    line: err.line(),
                    column: err.column(),
                    message: err.to_string(),
                },
            )
        })?;
        Self::decode_with(&value, options)
    }

    /// Encode to document text, compact or pretty-printed.
    pub fn to_json_string(&self, pretty: bool) -> Result<String, EncodeError> {
        let value = self.encode()?;
        Ok(if pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::attach::Attachment;
    use crate::geom::Position;
    use crate::ident::SequentialIds;
    use crate::node::Frame;
    use crate::side::Side;
    use serde_json::json;

    fn two_nodes_one_edge() -> Canvas {
        let mut ids = SequentialIds::starting_at(1);
        let frame = Frame::new(Position::new(0, 0), 100, 50);
        let a = Node::make_text(frame.clone(), "a", &mut ids);
        let b = Node::make_text(frame, "b", &mut ids);
        let edge = Edge::make_from_endpoints(
            Attachment::new(a.id(), Side::Right),
            Attachment::new(b.id(), Side::Left),
            None,
            None,
            &mut ids,
        );
        Canvas::new().with_node(a).with_node(b).with_edge(edge)
    }

    #[test]
    fn round_trips_a_small_canvas() {
        let canvas = two_nodes_one_edge();
        let encoded = canvas.encode().unwrap();
        assert_eq!(Canvas::decode(&encoded).unwrap(), canvas);
    }

    #[test]
    fn nodes_and_edges_are_required() {
        let err = Canvas::decode(&json!({"nodes": []})).unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::MissingField("edges"));
        let err = Canvas::decode(&json!({"edges": []})).unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::MissingField("nodes"));
        let err = Canvas::decode(&json!({"nodes": {}, "edges": []})).unwrap_err();
        assert_eq!(err.path().to_string(), "$.nodes");
    }

    #[test]
    fn one_bad_node_fails_the_document() {
        let doc = json!({
            "nodes": [
                {"id":"1","type":"text","x":0,"y":0,"width":1,"height":1,"text":"ok"},
                {"id":"2","type":"sticker","x":0,"y":0,"width":1,"height":1}
            ],
            "edges": []
        });
        let err = Canvas::decode(&doc).unwrap_err();
        assert_eq!(err.path().to_string(), "$.nodes[1].type");
        assert_eq!(err.kind(), &DecodeErrorKind::UnknownNodeType("sticker".into()));
    }

    #[test]
    fn floating_edge_blocks_encode_and_is_named() {
        let mut canvas = two_nodes_one_edge();
        let edge = canvas.edges()[0].clone();
        let id = edge.id();
        let dragging = edge.attachments().detach_start(Position::new(9, 9)).unwrap();
        canvas.replace_edge(edge.with_attachments(dragging)).unwrap();

        assert!(!canvas.is_serializable());
        let err = canvas.encode().unwrap_err();
        assert_eq!(err.edge_id(), id);
        match err {
            EncodeError::Edge { index, source, .. } => {
                assert_eq!(index, 0);
                assert!(matches!(*source, EncodeError::IncompleteAttachment { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(canvas.to_json_string(false).is_err());
    }

    #[test]
    fn lenient_decode_keeps_dangling_edges_and_duplicates() {
        let doc = json!({
            "nodes": [
                {"id":"1","type":"group","x":0,"y":0,"width":1,"height":1},
                {"id":"1","type":"group","x":5,"y":5,"width":1,"height":1}
            ],
            "edges": [
                {"id":"e","fromNode":"1","fromSide":"top","toNode":"ff","toSide":"left"}
            ]
        });
        let canvas = Canvas::decode(&doc).unwrap();
        let issues = canvas.integrity_issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path().to_string(), "$.nodes[1].id");
        assert_eq!(issues[1].path().to_string(), "$.edges[0].toNode");
        assert_eq!(
            issues[1].to_string(),
            "$.edges[0].toNode: end of edge e references missing node ff"
        );
    }

    #[test]
    fn strict_decode_rejects_the_first_issue() {
        let doc = json!({
            "nodes": [{"id":"1","type":"group","x":0,"y":0,"width":1,"height":1}],
            "edges": [{"id":"e","fromNode":"2","fromSide":"top","toNode":"1","toSide":"left"}]
        });
        let err = Canvas::decode_with(&doc, DecodeOptions::strict()).unwrap_err();
        assert_eq!(err.path().to_string(), "$.edges[0].fromNode");
        assert_eq!(
            err.kind(),
            &DecodeErrorKind::DanglingEndpoint {
                edge: Identifier::from_integer(0xe),
                node: Identifier::from_integer(2),
            }
        );
    }

    #[test]
    fn node_and_edge_ids_share_one_space() {
        let doc = json!({
            "nodes": [{"id":"a","type":"group","x":0,"y":0,"width":1,"height":1}],
            "edges": [{"id":"a","fromNode":"a","fromSide":"top","toNode":"a","toSide":"left"}]
        });
        let err = Canvas::decode_with(&doc, DecodeOptions::strict()).unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::DuplicateId(Identifier::from_integer(0xa)));
    }

    #[test]
    fn removing_a_node_leaves_its_edges() {
        let mut canvas = two_nodes_one_edge();
        let first = canvas.nodes()[0].id();
        assert_eq!(canvas.edges_touching(first).count(), 1);
        assert!(canvas.remove_node(first).is_some());
        assert_eq!(canvas.edges().len(), 1);
        assert_eq!(canvas.integrity_issues().len(), 1);
        assert!(canvas.remove_node(first).is_none());
    }

    #[test]
    fn replace_node_keeps_slot_order() {
        let mut canvas = two_nodes_one_edge();
        let first = canvas.nodes()[0].clone();
        let converted = first.clone().convert_to_link("https://example.com");
        let previous = canvas.replace_node(converted).unwrap();
        assert_eq!(previous, first);
        assert_eq!(canvas.nodes()[0].id(), first.id());
        assert_eq!(canvas.nodes()[0].kind(), crate::node::NodeKind::Link);
    }

    #[test]
    fn syntax_errors_carry_position() {
        let err = Canvas::from_json_str("{\"nodes\": [,]}").unwrap_err();
        assert!(matches!(
            err.kind(),
            DecodeErrorKind::Syntax { line: 1, .. }
        ));
    }

    #[test]
    fn empty_canvas_encodes_both_arrays() {
        assert_eq!(
            Canvas::new().to_json_string(false).unwrap(),
            r#"{"nodes":[],"edges":[]}"#
        );
    }
}
