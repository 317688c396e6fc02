// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Directed, optionally labelled connectors between node sides.

use serde_json::{Map, Value};

use crate::attach::{Attachment, Attachments, EdgeEnd};
use crate::color::Color;
use crate::error::{DecodeError, EncodeError};
use crate::ident::{IdAllocator, Identifier};
use crate::json::{insert_opt, Fields, JsonPath};
use crate::side::Side;

/// A canvas edge.
///
/// The id is fixed at construction; there is no setter for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    id: Identifier,
    attachments: Attachments,
    color: Option<Color>,
    label: Option<String>,
}

impl Edge {
    /// Build a bound edge with a freshly allocated id.
    pub fn make_from_endpoints(
        from: Attachment,
        to: Attachment,
        color: Option<Color>,
        label: Option<String>,
        ids: &mut impl IdAllocator,
    ) -> Self {
        Self {
            id: ids.allocate(),
            attachments: Attachments::bound(from, to),
            color,
            label,
        }
    }

    /// Edge id.
    pub const fn id(&self) -> Identifier {
        self.id
    }

    /// Endpoint state.
    pub const fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    /// Color, if set.
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    /// Label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Endpoint view, available only while both ends are bound.
    pub fn bound(&self) -> Option<BoundEdge<'_>> {
        match self.attachments {
            Attachments::Bound { from, to } => Some(BoundEdge {
                edge: self,
                from,
                to,
            }),
            _ => None,
        }
    }

    /// True if a bound end of this edge attaches to `node`.
    pub fn touches(&self, node: Identifier) -> bool {
        self.attachments.touches(node)
    }

    /// Replace the whole endpoint state.
    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }

    /// Set or clear the color.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Set or clear the label.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Decode an edge object. Decoded edges are always bound.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        Self::decode_at(value, &JsonPath::root())
    }

    pub(crate) fn decode_at(value: &Value, path: &JsonPath) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, path)?;
        let id = fields.identifier("id")?;
        let from = Attachment::new(fields.identifier("fromNode")?, fields.side("fromSide")?);
        let to = Attachment::new(fields.identifier("toNode")?, fields.side("toSide")?);
        Ok(Self {
            id,
            attachments: Attachments::bound(from, to),
            color: fields.opt_string("color")?.map(Color::from),
            label: fields.opt_string("label")?.map(str::to_owned),
        })
    }

    /// Encode as a JSON object. Fails unless both ends are bound.
    pub fn encode(&self) -> Result<Value, EncodeError> {
        let (from, to) = match self.attachments {
            Attachments::Bound { from, to } => (from, to),
            Attachments::FloatingStart { .. } => return Err(self.incomplete(EdgeEnd::Start)),
            Attachments::FloatingEnd { .. } => return Err(self.incomplete(EdgeEnd::End)),
        };
        let mut out = Map::new();
        out.insert("id".into(), Value::from(self.id.render()));
        out.insert("fromNode".into(), Value::from(from.node().render()));
        out.insert("fromSide".into(), Value::from(from.side().as_str()));
        out.insert("toNode".into(), Value::from(to.node().render()));
        out.insert("toSide".into(), Value::from(to.side().as_str()));
        insert_opt(&mut out, "color", self.color.as_ref().map(Color::as_str));
        insert_opt(&mut out, "label", self.label());
        Ok(Value::Object(out))
    }

    fn incomplete(&self, loose: EdgeEnd) -> EncodeError {
        EncodeError::IncompleteAttachment {
            edge: self.id,
            loose,
        }
    }
}

/// Borrowed view of an edge whose ends are both bound.
///
/// Obtained from [`Edge::bound`]; the endpoint accessors live here so they
/// cannot be called on a floating edge.
#[derive(Clone, Copy, Debug)]
pub struct BoundEdge<'a> {
    edge: &'a Edge,
    from: Attachment,
    to: Attachment,
}

impl<'a> BoundEdge<'a> {
    /// The underlying edge.
    pub const fn edge(&self) -> &'a Edge {
        self.edge
    }

    /// Edge id.
    pub const fn id(&self) -> Identifier {
        self.edge.id
    }

    /// Start attachment.
    pub const fn start(&self) -> Attachment {
        self.from
    }

    /// End attachment.
    pub const fn end(&self) -> Attachment {
        self.to
    }

    /// Start node.
    pub const fn from_node(&self) -> Identifier {
        self.from.node()
    }

    /// Side of the start node.
    pub const fn from_side(&self) -> Side {
        self.from.side()
    }

    /// End node.
    pub const fn to_node(&self) -> Identifier {
        self.to.node()
    }

    /// Side of the end node.
    pub const fn to_side(&self) -> Side {
        self.to.side()
    }
}
