// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations. Each writes its report to `out`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use canvas_model::{Canvas, NodeKind};
use canvas_store::{
    load, save, ConfigService, ConfigStore, DocumentError, LoadOptions, NewlineMode, SaveOptions,
    ToolPrefs,
};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing::{debug, info};

use crate::cli::NewlineArg;

/// `canvas check`. Returns whether the document decoded.
pub fn check(out: &mut impl Write, file: &Path, strict: bool, prefs: &ToolPrefs) -> Result<bool> {
    let mut options = LoadOptions::from(prefs);
    options.decode.strict_references |= strict;

    let canvas = match load(file, &options) {
        Ok(canvas) => canvas,
        Err(err @ DocumentError::Decode { .. }) => {
            writeln!(out, "error: {err}")?;
            return Ok(false);
        }
        Err(err) => return Err(err).context("failed to read document"),
    };

    for issue in canvas.integrity_issues() {
        writeln!(out, "warning: {issue}")?;
    }
    writeln!(
        out,
        "ok: {} nodes, {} edges",
        canvas.nodes().len(),
        canvas.edges().len()
    )?;
    Ok(true)
}

/// Formatting choices for `canvas fmt`, layered over the saved preferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct FmtFlags {
    /// Force single-line output.
    pub compact: bool,
    /// Force raw newlines inside strings.
    pub literal_newlines: bool,
}

/// `canvas fmt`
pub fn fmt(
    out: &mut impl Write,
    file: &Path,
    output: Option<PathBuf>,
    flags: FmtFlags,
    prefs: &ToolPrefs,
) -> Result<()> {
    let canvas = load(file, &LoadOptions::from(prefs))
        .with_context(|| format!("failed to load {}", file.display()))?;

    let mut options = SaveOptions::from(prefs);
    if flags.compact {
        options.pretty = false;
    }
    if flags.literal_newlines {
        options.newline_mode = NewlineMode::Literal;
    }

    let target = output.unwrap_or_else(|| file.to_path_buf());
    save(&canvas, &target, &options)
        .with_context(|| format!("failed to write {}", target.display()))?;
    writeln!(out, "wrote {}", target.display())?;
    Ok(())
}

/// `canvas stats`
pub fn stats(out: &mut impl Write, file: &Path, prefs: &ToolPrefs) -> Result<()> {
    let canvas = load_lenient(file, prefs)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["element", "count"]);
    for kind in NodeKind::ALL {
        let count = canvas.nodes().iter().filter(|n| n.kind() == kind).count();
        table.add_row(vec![format!("{kind} nodes"), count.to_string()]);
    }
    table.add_row(vec!["edges".to_owned(), canvas.edges().len().to_string()]);
    table.add_row(vec![
        "integrity issues".to_owned(),
        canvas.integrity_issues().len().to_string(),
    ]);
    writeln!(out, "{table}")?;
    Ok(())
}

/// `canvas ids`
pub fn ids(out: &mut impl Write, file: &Path, prefs: &ToolPrefs) -> Result<()> {
    let canvas = load_lenient(file, prefs)?;
    for node in canvas.nodes() {
        writeln!(out, "{}\t{}", node.id(), node.kind())?;
    }
    for edge in canvas.edges() {
        writeln!(out, "{}\tedge", edge.id())?;
    }
    Ok(())
}

/// Requested changes for `canvas prefs`; `None` leaves a value alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefsUpdate {
    /// New `strict_references`.
    pub strict_references: Option<bool>,
    /// New `pretty`.
    pub pretty: Option<bool>,
    /// New newline mode.
    pub newline_mode: Option<NewlineArg>,
    /// New indent width.
    pub indent: Option<usize>,
}

impl PrefsUpdate {
    fn is_empty(&self) -> bool {
        self.strict_references.is_none()
            && self.pretty.is_none()
            && self.newline_mode.is_none()
            && self.indent.is_none()
    }

    fn apply(self, prefs: &mut ToolPrefs) {
        if let Some(strict) = self.strict_references {
            prefs.strict_references = strict;
        }
        if let Some(pretty) = self.pretty {
            prefs.pretty = pretty;
        }
        if let Some(mode) = self.newline_mode {
            prefs.newline_mode = mode.into();
        }
        if let Some(indent) = self.indent {
            prefs.indent = indent;
        }
    }
}

/// `canvas prefs`
pub fn prefs<S: ConfigStore>(
    out: &mut impl Write,
    service: &ConfigService<S>,
    update: PrefsUpdate,
) -> Result<()> {
    let mut prefs = ToolPrefs::load(service).context("failed to read preferences")?;
    if !update.is_empty() {
        update.apply(&mut prefs);
        prefs.save(service).context("failed to save preferences")?;
        info!("preferences updated");
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
    Ok(())
}

/// Load ignoring `strict_references`; reporting commands should still run
/// on documents with integrity issues.
fn load_lenient(file: &Path, prefs: &ToolPrefs) -> Result<Canvas> {
    let mut options = LoadOptions::from(prefs);
    options.decode.strict_references = false;
    debug!(file = %file.display(), "loading for report");
    load(file, &options).with_context(|| format!("failed to load {}", file.display()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use canvas_store::MemoryConfigStore;

    const DOC: &str = r#"{"nodes":[{"id":"a","type":"group","x":0,"y":0,"width":1,"height":1}],"edges":[{"id":"b","fromNode":"a","fromSide":"top","toNode":"c","toSide":"left"}]}"#;

    fn write_doc(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("doc.canvas");
        std::fs::write(&path, DOC).unwrap();
        path
    }

    #[test]
    fn check_warns_in_lenient_mode_and_fails_in_strict() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir);
        let prefs = ToolPrefs::default();

        let mut out = Vec::new();
        assert!(check(&mut out, &path, false, &prefs).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("warning: $.edges[0].toNode"), "{text}");
        assert!(text.contains("ok: 1 nodes, 1 edges"));

        let mut out = Vec::new();
        assert!(!check(&mut out, &path, true, &prefs).unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("error: "));
    }

    #[test]
    fn ids_lists_nodes_then_edges() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir);
        let mut out = Vec::new();
        ids(&mut out, &path, &ToolPrefs::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\tgroup\nb\tedge\n");
    }

    #[test]
    fn prefs_update_persists() {
        let service = ConfigService::new(MemoryConfigStore::new());
        let update = PrefsUpdate {
            newline_mode: Some(NewlineArg::Literal),
            indent: Some(4),
            ..PrefsUpdate::default()
        };
        let mut out = Vec::new();
        prefs(&mut out, &service, update).unwrap();
        let stored = ToolPrefs::load(&service).unwrap();
        assert_eq!(stored.newline_mode, NewlineMode::Literal);
        assert_eq!(stored.indent, 4);
        assert!(String::from_utf8(out).unwrap().contains("\"indent\": 4"));
    }
}
