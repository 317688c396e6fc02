// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Document I/O and preference storage for canvas tools.
//! Keeps the model crate free of filesystem and platform concerns.

pub mod config;
pub mod document;
pub mod escape;
pub mod fs;
pub mod prefs;

pub use config::{ConfigError, ConfigService, ConfigStore, MemoryConfigStore};
pub use document::{load, parse, render, save, DocumentError, LoadOptions, SaveOptions};
pub use escape::{escape_raw_newlines, unescape_newlines};
pub use fs::FsConfigStore;
pub use prefs::{NewlineMode, ToolPrefs};
