// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge endpoint state.
//!
//! An edge normally has both ends bound to a node side. While the user drags
//! one end around, that end is a free canvas position instead:
//!
//! ```text
//!   FloatingStart <--detach_start-- Bound --detach_end--> FloatingEnd
//!   FloatingStart --bind_start----> Bound <---bind_end--- FloatingEnd
//! ```
//!
//! `move_floating` repositions the loose end of either floating state.
//! There is no state with both ends loose. Only `Bound` can be serialized.

use std::fmt;

use crate::error::TransitionError;
use crate::geom::Position;
use crate::ident::Identifier;
use crate::side::Side;

/// Where an edge touches a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Attachment {
    node: Identifier,
    side: Side,
}

impl Attachment {
    /// Attach to `side` of `node`.
    pub const fn new(node: Identifier, side: Side) -> Self {
        Self { node, side }
    }

    /// Node the edge touches.
    pub const fn node(self) -> Identifier {
        self.node
    }

    /// Side of that node.
    pub const fn side(self) -> Side {
        self.side
    }
}

/// Names one end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeEnd {
    /// The `from` end.
    Start,
    /// The `to` end.
    End,
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

/// Binding state of both ends of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attachments {
    /// Both ends bound.
    Bound {
        /// Start attachment.
        from: Attachment,
        /// End attachment.
        to: Attachment,
    },
    /// Start end is being dragged; end end still bound.
    FloatingStart {
        /// Current free position of the start end.
        start: Position,
        /// End attachment.
        to: Attachment,
    },
    /// End end is being dragged; start end still bound.
    FloatingEnd {
        /// Start attachment.
        from: Attachment,
        /// Current free position of the end end.
        end: Position,
    },
}

impl Attachments {
    /// Both ends bound.
    pub const fn bound(from: Attachment, to: Attachment) -> Self {
        Self::Bound { from, to }
    }

    /// True when the edge can be serialized.
    pub const fn is_bound(&self) -> bool {
        matches!(self, Self::Bound { .. })
    }

    /// The floating end, if any.
    pub const fn loose_end(&self) -> Option<EdgeEnd> {
        match self {
            Self::Bound { .. } => None,
            Self::FloatingStart { .. } => Some(EdgeEnd::Start),
            Self::FloatingEnd { .. } => Some(EdgeEnd::End),
        }
    }

    /// Start attachment when the start end is bound.
    pub const fn start_attachment(&self) -> Option<Attachment> {
        match self {
            Self::Bound { from, .. } | Self::FloatingEnd { from, .. } => Some(*from),
            Self::FloatingStart { .. } => None,
        }
    }

    /// End attachment when the end end is bound.
    pub const fn end_attachment(&self) -> Option<Attachment> {
        match self {
            Self::Bound { to, .. } | Self::FloatingStart { to, .. } => Some(*to),
            Self::FloatingEnd { .. } => None,
        }
    }

    /// Position of the floating end, if any.
    pub const fn floating_position(&self) -> Option<Position> {
        match self {
            Self::Bound { .. } => None,
            Self::FloatingStart { start, .. } => Some(*start),
            Self::FloatingEnd { end, .. } => Some(*end),
        }
    }

    /// True if either bound end attaches to `node`.
    pub fn touches(&self, node: Identifier) -> bool {
        self.start_attachment().is_some_and(|a| a.node() == node)
            || self.end_attachment().is_some_and(|a| a.node() == node)
    }

    /// Start dragging the start end from a bound edge.
    pub fn detach_start(self, at: Position) -> Result<Self, TransitionError> {
        match self {
            Self::Bound { to, .. } => Ok(Self::FloatingStart { start: at, to }),
            other => Err(other.already_floating(EdgeEnd::Start)),
        }
    }

    /// Start dragging the end end from a bound edge.
    pub fn detach_end(self, at: Position) -> Result<Self, TransitionError> {
        match self {
            Self::Bound { from, .. } => Ok(Self::FloatingEnd { from, end: at }),
            other => Err(other.already_floating(EdgeEnd::End)),
        }
    }

    /// Move whichever end is floating.
    pub fn move_floating(self, at: Position) -> Result<Self, TransitionError> {
        match self {
            Self::Bound { .. } => Err(TransitionError::NothingFloating),
            Self::FloatingStart { to, .. } => Ok(Self::FloatingStart { start: at, to }),
            Self::FloatingEnd { from, .. } => Ok(Self::FloatingEnd { from, end: at }),
        }
    }

    /// Finish dragging the start end by binding it.
    pub fn bind_start(self, from: Attachment) -> Result<Self, TransitionError> {
        match self {
            Self::FloatingStart { to, .. } => Ok(Self::Bound { from, to }),
            _ => Err(TransitionError::AlreadyBound(EdgeEnd::Start)),
        }
    }

    /// Finish dragging the end end by binding it.
    pub fn bind_end(self, to: Attachment) -> Result<Self, TransitionError> {
        match self {
            Self::FloatingEnd { from, .. } => Ok(Self::Bound { from, to }),
            _ => Err(TransitionError::AlreadyBound(EdgeEnd::End)),
        }
    }

    fn already_floating(self, requested: EdgeEnd) -> TransitionError {
        match self.loose_end() {
            Some(loose) => TransitionError::AlreadyFloating { requested, loose },
            None => TransitionError::NothingFloating,
        }
    }
}
