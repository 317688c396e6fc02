// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed model of the JSON canvas document format.
//!
//! A canvas is an ordered list of nodes (file, text, link and group cards) and
//! an ordered list of edges connecting node sides. This crate owns the value
//! types and the encode/decode contract:
//!
//! - Decoding is bottom-up and fail-fast. Every rejection carries the JSON path
//!   of the offending value ([`DecodeError::path`]).
//! - Encoding is top-down and only fails when an edge is mid-drag, i.e. its
//!   [`Attachments`] are not [`Attachments::Bound`].
//! - Optional fields are `Option`s; absent keys are never re-emitted as `null`.
//!
//! The crate performs no I/O. Loading and saving documents lives in
//! `canvas-store`.
//!
//! # Identity
//!
//! Ids are allocated once, by a caller-supplied [`IdAllocator`], and are never
//! reassigned. Uniqueness and referential integrity are not enforced by
//! default; see [`Canvas::integrity_issues`] and [`DecodeOptions`].

mod attach;
mod canvas;
mod color;
mod edge;
mod error;
mod geom;
mod ident;
mod json;
mod node;
mod serde_impls;
mod side;

pub use attach::{Attachment, Attachments, EdgeEnd};
pub use canvas::{Canvas, DecodeOptions, IntegrityIssue};
pub use color::Color;
pub use edge::{BoundEdge, Edge};
pub use error::{
    DecodeError, DecodeErrorKind, EncodeError, IdentifierFault, ParseError, TransitionError,
};
pub use geom::Position;
pub use ident::{DerivedIds, IdAllocator, Identifier, SequentialIds};
pub use json::JsonPath;
pub use node::{
    FileNode, Frame, GroupNode, LinkNode, Node, NodeBase, NodeContent, NodeKind, TextNode,
};
pub use side::Side;
