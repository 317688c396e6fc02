// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canvas nodes: a sum type over file, text, link and group cards.
//!
//! Every variant embeds the same [`NodeBase`] (id, position, size, color).
//! Variant payloads are private; values are only produced by the builders,
//! by [`Node::decode`], or by converting an existing node, so the id of a
//! node is always one that an [`IdAllocator`] handed out or a document named.

use std::fmt;

use serde_json::{Map, Value};

use crate::color::Color;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::geom::Position;
use crate::ident::{IdAllocator, Identifier};
use crate::json::{insert_opt, Fields, JsonPath};

/// Discriminant of a node, the `type` key in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Reference to a file in the vault.
    File,
    /// Inline markdown text.
    Text,
    /// External URL.
    Link,
    /// Visual container for other nodes.
    Group,
}

impl NodeKind {
    /// All kinds in declaration order.
    pub const ALL: [Self; 4] = [Self::File, Self::Text, Self::Link, Self::Group];

    /// Parse the `type` discriminant.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "file" => Some(Self::File),
            "text" => Some(Self::Text),
            "link" => Some(Self::Link),
            "group" => Some(Self::Group),
            _ => None,
        }
    }

    /// The `type` discriminant.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Text => "text",
            Self::Link => "link",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement and look of a node: everything in [`NodeBase`] except the id.
///
/// `width`/`height` are passed through as given; the host app expects them
/// positive but this layer does not check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Top-left corner.
    pub position: Position,
    /// Width in canvas units.
    pub width: i64,
    /// Height in canvas units.
    pub height: i64,
    /// Optional color.
    pub color: Option<Color>,
}

impl Frame {
    /// Uncolored frame.
    pub const fn new(position: Position, width: i64, height: i64) -> Self {
        Self {
            position,
            width,
            height,
            color: None,
        }
    }

    /// Same frame with a color.
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Fields shared by every node variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeBase {
    id: Identifier,
    position: Position,
    width: i64,
    height: i64,
    color: Option<Color>,
}

impl NodeBase {
    fn with_frame(id: Identifier, frame: Frame) -> Self {
        Self {
            id,
            position: frame.position,
            width: frame.width,
            height: frame.height,
            color: frame.color,
        }
    }

    /// Node id.
    pub const fn id(&self) -> Identifier {
        self.id
    }

    /// Top-left corner.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Width.
    pub const fn width(&self) -> i64 {
        self.width
    }

    /// Height.
    pub const fn height(&self) -> i64 {
        self.height
    }

    /// Color, if set.
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    /// Everything but the id, e.g. to build a sibling node with the same
    /// placement.
    pub fn frame(&self) -> Frame {
        Frame {
            position: self.position,
            width: self.width,
            height: self.height,
            color: self.color.clone(),
        }
    }
}

/// A file reference, optionally narrowed to a heading or block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileNode {
    base: NodeBase,
    file: String,
    subpath: Option<String>,
}

impl FileNode {
    /// Shared fields.
    pub const fn base(&self) -> &NodeBase {
        &self.base
    }

    /// Vault-relative path.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// `#heading` or `#^block` reference inside the file.
    pub fn subpath(&self) -> Option<&str> {
        self.subpath.as_deref()
    }
}

/// Inline markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode {
    base: NodeBase,
    text: String,
}

impl TextNode {
    /// Shared fields.
    pub const fn base(&self) -> &NodeBase {
        &self.base
    }

    /// Raw markdown.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// External link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkNode {
    base: NodeBase,
    url: String,
}

impl LinkNode {
    /// Shared fields.
    pub const fn base(&self) -> &NodeBase {
        &self.base
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Labelled container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupNode {
    base: NodeBase,
    label: Option<String>,
}

impl GroupNode {
    /// Shared fields.
    pub const fn base(&self) -> &NodeBase {
        &self.base
    }

    /// Group heading.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Variant-specific payload, used to build nodes and to change a node's kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeContent {
    /// File payload.
    File {
        /// Vault-relative path.
        file: String,
        /// Optional `#…` reference inside the file.
        subpath: Option<String>,
    },
    /// Text payload.
    Text {
        /// Raw markdown.
        text: String,
    },
    /// Link payload.
    Link {
        /// Target URL.
        url: String,
    },
    /// Group payload.
    Group {
        /// Optional heading.
        label: Option<String>,
    },
}

impl NodeContent {
    /// Kind of node this payload builds.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::File { .. } => NodeKind::File,
            Self::Text { .. } => NodeKind::Text,
            Self::Link { .. } => NodeKind::Link,
            Self::Group { .. } => NodeKind::Group,
        }
    }
}

/// A canvas node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// File card.
    File(FileNode),
    /// Text card.
    Text(TextNode),
    /// Link card.
    Link(LinkNode),
    /// Group container.
    Group(GroupNode),
}

impl Node {
    /// Build a node with a freshly allocated id.
    pub fn make(frame: Frame, content: NodeContent, ids: &mut impl IdAllocator) -> Self {
        Self::assemble(NodeBase::with_frame(ids.allocate(), frame), content)
    }

    /// Build a file node.
    pub fn make_file(
        frame: Frame,
        file: impl Into<String>,
        subpath: Option<String>,
        ids: &mut impl IdAllocator,
    ) -> Self {
        let file = file.into();
        Self::make(frame, NodeContent::File { file, subpath }, ids)
    }

    /// Build a text node.
    pub fn make_text(frame: Frame, text: impl Into<String>, ids: &mut impl IdAllocator) -> Self {
        let text = text.into();
        Self::make(frame, NodeContent::Text { text }, ids)
    }

    /// Build a link node.
    pub fn make_link(frame: Frame, url: impl Into<String>, ids: &mut impl IdAllocator) -> Self {
        let url = url.into();
        Self::make(frame, NodeContent::Link { url }, ids)
    }

    /// Build a group node.
    pub fn make_group(frame: Frame, label: Option<String>, ids: &mut impl IdAllocator) -> Self {
        Self::make(frame, NodeContent::Group { label }, ids)
    }

    fn assemble(base: NodeBase, content: NodeContent) -> Self {
        match content {
            NodeContent::File { file, subpath } => Self::File(FileNode {
                base,
                file,
                subpath,
            }),
            NodeContent::Text { text } => Self::Text(TextNode { base, text }),
            NodeContent::Link { url } => Self::Link(LinkNode { base, url }),
            NodeContent::Group { label } => Self::Group(GroupNode { base, label }),
        }
    }

    /// Project any variant down to its shared fields.
    pub const fn base(&self) -> &NodeBase {
        match self {
            Self::File(n) => &n.base,
            Self::Text(n) => &n.base,
            Self::Link(n) => &n.base,
            Self::Group(n) => &n.base,
        }
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        match self {
            Self::File(n) => &mut n.base,
            Self::Text(n) => &mut n.base,
            Self::Link(n) => &mut n.base,
            Self::Group(n) => &mut n.base,
        }
    }

    /// Split into shared fields and payload.
    pub fn into_parts(self) -> (NodeBase, NodeContent) {
        match self {
            Self::File(FileNode {
                base,
                file,
                subpath,
            }) => (base, NodeContent::File { file, subpath }),
            Self::Text(TextNode { base, text }) => (base, NodeContent::Text { text }),
            Self::Link(LinkNode { base, url }) => (base, NodeContent::Link { url }),
            Self::Group(GroupNode { base, label }) => (base, NodeContent::Group { label }),
        }
    }

    /// Copy of the payload.
    pub fn content(&self) -> NodeContent {
        self.clone().into_parts().1
    }

    /// Discriminant.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::File(_) => NodeKind::File,
            Self::Text(_) => NodeKind::Text,
            Self::Link(_) => NodeKind::Link,
            Self::Group(_) => NodeKind::Group,
        }
    }

    /// Node id.
    pub const fn id(&self) -> Identifier {
        self.base().id
    }

    /// Top-left corner.
    pub const fn position(&self) -> Position {
        self.base().position
    }

    /// Width.
    pub const fn width(&self) -> i64 {
        self.base().width
    }

    /// Height.
    pub const fn height(&self) -> i64 {
        self.base().height
    }

    /// Color, if set.
    pub fn color(&self) -> Option<&Color> {
        self.base().color()
    }

    /// Change the node's kind in place: keep id, position, size and color,
    /// drop the old payload, use `content` instead.
    pub fn convert_to(self, content: NodeContent) -> Self {
        let (base, _) = self.into_parts();
        Self::assemble(base, content)
    }

    /// Convert to a file node.
    pub fn convert_to_file(self, file: impl Into<String>, subpath: Option<String>) -> Self {
        let file = file.into();
        self.convert_to(NodeContent::File { file, subpath })
    }

    /// Convert to a text node.
    pub fn convert_to_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.convert_to(NodeContent::Text { text })
    }

    /// Convert to a link node.
    pub fn convert_to_link(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.convert_to(NodeContent::Link { url })
    }

    /// Convert to a group node.
    pub fn convert_to_group(self, label: Option<String>) -> Self {
        self.convert_to(NodeContent::Group { label })
    }

    /// Move the node.
    pub fn with_position(mut self, position: Position) -> Self {
        self.base_mut().position = position;
        self
    }

    /// Resize the node.
    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        let base = self.base_mut();
        base.width = width;
        base.height = height;
        self
    }

    /// Set or clear the color.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.base_mut().color = color;
        self
    }

    /// Decode a node object.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        Self::decode_at(value, &JsonPath::root())
    }

    pub(crate) fn decode_at(value: &Value, path: &JsonPath) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, path)?;
        let raw_kind = fields.string("type")?;
        let kind = NodeKind::parse(raw_kind).ok_or_else(|| {
            DecodeError::new(
                fields.path_of("type"),
                DecodeErrorKind::UnknownNodeType(raw_kind.to_owned()),
            )
        })?;

        let base = NodeBase {
            id: fields.identifier("id")?,
            position: Position::new(fields.integer("x")?, fields.integer("y")?),
            width: fields.integer("width")?,
            height: fields.integer("height")?,
            color: fields.opt_string("color")?.map(Color::from),
        };
        let content = match kind {
            NodeKind::File => NodeContent::File {
                file: fields.string("file")?.to_owned(),
                subpath: fields.opt_string("subpath")?.map(str::to_owned),
            },
            NodeKind::Text => NodeContent::Text {
                text: fields.string("text")?.to_owned(),
            },
            NodeKind::Link => NodeContent::Link {
                url: fields.string("url")?.to_owned(),
            },
            NodeKind::Group => NodeContent::Group {
                label: fields.opt_string("label")?.map(str::to_owned),
            },
        };
        Ok(Self::assemble(base, content))
    }

    /// Encode as a JSON object. Keys: `id, type, x, y, width, height`,
    /// `color` when set, then the variant's own keys.
    pub fn encode(&self) -> Value {
        let base = self.base();
        let mut out = Map::new();
        out.insert("id".into(), Value::from(base.id.render()));
        out.insert("type".into(), Value::from(self.kind().as_str()));
        out.insert("x".into(), Value::from(base.position.x()));
        out.insert("y".into(), Value::from(base.position.y()));
        out.insert("width".into(), Value::from(base.width));
        out.insert("height".into(), Value::from(base.height));
        insert_opt(&mut out, "color", base.color.as_ref().map(Color::as_str));
        match self {
            Self::File(n) => {
                out.insert("file".into(), Value::from(n.file.as_str()));
                insert_opt(&mut out, "subpath", n.subpath());
            }
            Self::Text(n) => {
                out.insert("text".into(), Value::from(n.text.as_str()));
            }
            Self::Link(n) => {
                out.insert("url".into(), Value::from(n.url.as_str()));
            }
            Self::Group(n) => insert_opt(&mut out, "label", n.label()),
        }
        Value::Object(out)
    }
}
