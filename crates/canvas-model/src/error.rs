// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for parsing, decoding, encoding and attachment transitions.

use thiserror::Error;

use crate::attach::EdgeEnd;
use crate::ident::Identifier;
use crate::json::JsonPath;

/// Failure to parse a primitive (identifier or side) from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The string is not a valid hexadecimal identifier.
    #[error("invalid identifier {raw:?}: {reason}")]
    Identifier {
        /// Offending input.
        raw: String,
        /// What is wrong with it.
        reason: IdentifierFault,
    },
    /// The string is not one of `top`, `right`, `bottom`, `left`.
    #[error("unknown side {raw:?} (expected top, right, bottom or left)")]
    Side {
        /// Offending input.
        raw: String,
    },
}

/// Reason an identifier string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentifierFault {
    /// Empty input.
    #[error("empty string")]
    Empty,
    /// A character outside `[0-9a-fA-F]`.
    #[error("non-hexadecimal character {0:?}")]
    NonHex(char),
    /// More significant digits than fit in 64 bits.
    #[error("value exceeds 64 bits")]
    Overflow,
}

/// A document (or fragment) failed to decode.
///
/// `path` locates the offending value, e.g. `$.edges[3].toSide`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {kind}")]
pub struct DecodeError {
    path: JsonPath,
    kind: DecodeErrorKind,
}

impl DecodeError {
    /// Build an error at `path`.
    pub fn new(path: JsonPath, kind: DecodeErrorKind) -> Self {
        Self { path, kind }
    }

    /// Location of the offending value.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// What went wrong.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

/// Reason a decode failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// Input text is not JSON.
    #[error("invalid json at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Parser message.
        message: String,
    },
    /// A required key is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// A value has the wrong JSON shape.
    #[error("expected {expected}, found {found}")]
    WrongType {
        /// Shape the format requires.
        expected: &'static str,
        /// Shape actually present.
        found: &'static str,
    },
    /// Node discriminant is not `file`, `text`, `link` or `group`.
    #[error("unknown node type {0:?}")]
    UnknownNodeType(String),
    /// A string primitive failed to parse.
    #[error(transparent)]
    InvalidValue(#[from] ParseError),
    /// Strict mode: an id is used by more than one element.
    #[error("duplicate id {0}")]
    DuplicateId(Identifier),
    /// Strict mode: an edge endpoint names a node that does not exist.
    #[error("edge {edge} references missing node {node}")]
    DanglingEndpoint {
        /// Offending edge.
        edge: Identifier,
        /// Referenced node id.
        node: Identifier,
    },
}

/// A value could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The edge is mid-drag; one end is not bound to a node side.
    #[error("edge {edge} cannot be encoded while its {loose} point is floating")]
    IncompleteAttachment {
        /// Edge that cannot be serialized.
        edge: Identifier,
        /// Which end is floating.
        loose: EdgeEnd,
    },
    /// Canvas-level wrapper naming the edge that blocked serialization.
    #[error("cannot encode canvas: edges[{index}] (id {edge}) is not fully attached")]
    Edge {
        /// Position of the edge in the canvas.
        index: usize,
        /// Id of the edge.
        edge: Identifier,
        /// Edge-level failure.
        #[source]
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    /// Id of the edge that caused the failure.
    pub fn edge_id(&self) -> Identifier {
        match self {
            Self::IncompleteAttachment { edge, .. } | Self::Edge { edge, .. } => *edge,
        }
    }
}

/// An attachment state change that the edge state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Detaching requires both ends to be bound; one end already floats.
    #[error("cannot detach the {requested} end while the {loose} end is floating")]
    AlreadyFloating {
        /// End the caller tried to detach.
        requested: EdgeEnd,
        /// End that is currently floating.
        loose: EdgeEnd,
    },
    /// Binding targets an end that is already bound.
    #[error("the {0} end is already bound")]
    AlreadyBound(EdgeEnd),
    /// Moving a floating end on a fully bound edge.
    #[error("no end is floating")]
    NothingFloating,
}
