// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Opaque color descriptor.

use std::fmt;

/// Color string as stored in the document (a preset like `"4"` or a hex
/// value like `"#ff8800"`). Not interpreted here; renderers decide.
///
/// A missing color is `Option::<Color>::None`, never an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Wrap a raw color string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Color {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
