// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted preferences shared by the canvas tools.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigService, ConfigStore};

/// How newlines inside string values are written on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineMode {
    /// Standard JSON `\n` escapes.
    #[default]
    Escaped,
    /// Raw line breaks inside strings, for hand-edited documents.
    Literal,
}

/// Saved tool preferences. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolPrefs {
    /// Fail loads on duplicate ids or dangling edge endpoints.
    pub strict_references: bool,
    /// Pretty-print saved documents.
    pub pretty: bool,
    /// Newline handling on save.
    pub newline_mode: NewlineMode,
    /// Spaces per indent level when pretty-printing.
    pub indent: usize,
}

impl Default for ToolPrefs {
    fn default() -> Self {
        Self {
            strict_references: false,
            pretty: true,
            newline_mode: NewlineMode::Escaped,
            indent: 2,
        }
    }
}

impl ToolPrefs {
    /// Config key the preferences are stored under.
    pub const KEY: &'static str = "prefs";

    /// Load from `service`, or defaults when nothing is stored yet.
    pub fn load<S: ConfigStore>(service: &ConfigService<S>) -> Result<Self, ConfigError> {
        service.load_or_default(Self::KEY)
    }

    /// Persist to `service`.
    pub fn save<S: ConfigStore>(&self, service: &ConfigService<S>) -> Result<(), ConfigError> {
        service.save(Self::KEY, self)
    }
}
