// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifiers and id allocation strategies.
use std::fmt;
use std::str::FromStr;

use blake3::Hasher;

use crate::canvas::Canvas;
use crate::error::{IdentifierFault, ParseError};

/// Identifier shared by nodes and edges.
///
/// Wraps a `u64`. The external form is lowercase hexadecimal with no `0x`
/// prefix and no padding; parsing accepts either case and leading zeros, so
/// `"00AB"` and `"ab"` name the same id.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Identifier(u64);

impl Identifier {
    /// Wrap a raw integer.
    pub const fn from_integer(value: u64) -> Self {
        Self(value)
    }

    /// The raw integer.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Parse the hexadecimal external form.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let fault = |reason| ParseError::Identifier {
            raw: raw.to_owned(),
            reason,
        };
        if raw.is_empty() {
            return Err(fault(IdentifierFault::Empty));
        }
        // from_str_radix tolerates a leading `+`; the format does not.
        if let Some(bad) = raw.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(fault(IdentifierFault::NonHex(bad)));
        }
        u64::from_str_radix(raw, 16)
            .map(Self)
            .map_err(|_| fault(IdentifierFault::Overflow))
    }

    /// Render the canonical external form.
    pub fn render(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl FromStr for Identifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Source of fresh identifiers for newly built nodes and edges.
///
/// The model never invents ids itself; every builder takes an allocator.
/// Closures `FnMut() -> Identifier` implement the trait directly.
pub trait IdAllocator {
    /// Hand out the next identifier.
    fn allocate(&mut self) -> Identifier;
}

impl<F> IdAllocator for F
where
    F: FnMut() -> Identifier,
{
    fn allocate(&mut self) -> Identifier {
        self()
    }
}

/// Monotonic counter.
///
/// Saturates at `u64::MAX`; past that point it keeps returning the maximum id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Start counting at `first`.
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Start one past the largest node or edge id already in `canvas`.
    pub fn after(canvas: &Canvas) -> Self {
        let highest = canvas
            .nodes()
            .iter()
            .map(|n| n.id())
            .chain(canvas.edges().iter().map(|e| e.id()))
            .max();
        match highest {
            Some(id) => Self::starting_at(id.value().saturating_add(1)),
            None => Self::starting_at(0),
        }
    }
}

impl IdAllocator for SequentialIds {
    fn allocate(&mut self) -> Identifier {
        let id = Identifier(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Reproducible, well-spread ids: the first 8 bytes of
/// `blake3("canvas-id:" || namespace || counter_le)`.
///
/// Two allocators with the same namespace produce the same sequence, which
/// keeps fixtures stable while still looking like host-app random ids.
#[derive(Clone, Debug)]
pub struct DerivedIds {
    namespace: String,
    counter: u64,
}

impl DerivedIds {
    /// New allocator for `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            counter: 0,
        }
    }
}

impl IdAllocator for DerivedIds {
    fn allocate(&mut self) -> Identifier {
        let mut hasher = Hasher::new();
        hasher.update(b"canvas-id:");
        hasher.update(self.namespace.as_bytes());
        hasher.update(&self.counter.to_le_bytes());
        self.counter = self.counter.wrapping_add(1);
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        Identifier(u64::from_be_bytes(head))
    }
}
