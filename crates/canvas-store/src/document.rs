// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reading and writing canvas documents on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canvas_model::{Canvas, DecodeError, DecodeOptions, EncodeError};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;
use tracing::{debug, info};

use crate::escape::{escape_raw_newlines, unescape_newlines};
use crate::prefs::{NewlineMode, ToolPrefs};

/// Error raised while loading or saving a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Filesystem failure.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not a valid canvas document.
    #[error("{}: {source}", .path.display())]
    Decode {
        /// File involved.
        path: PathBuf,
        /// Decode failure, including its JSON path.
        #[source]
        source: DecodeError,
    },
    /// The canvas holds an edge that cannot be written yet.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// JSON serialization failure.
    #[error("serde error: {0}")]
    Json(#[from] serde_json::Error),
    /// Serialized output was not UTF-8.
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl DocumentError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Options for [`load`] and [`parse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Options passed to the decoder.
    pub decode: DecodeOptions,
}

/// Options for [`save`] and [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Pretty-print instead of a single line.
    pub pretty: bool,
    /// Spaces per indent level when pretty-printing.
    pub indent: usize,
    /// Newline handling inside string values.
    pub newline_mode: NewlineMode,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self::from(&ToolPrefs::default())
    }
}

impl From<&ToolPrefs> for LoadOptions {
    fn from(prefs: &ToolPrefs) -> Self {
        Self {
            decode: DecodeOptions {
                strict_references: prefs.strict_references,
            },
        }
    }
}

impl From<&ToolPrefs> for SaveOptions {
    fn from(prefs: &ToolPrefs) -> Self {
        Self {
            pretty: prefs.pretty,
            indent: prefs.indent,
            newline_mode: prefs.newline_mode,
        }
    }
}

/// Decode document text, tolerating raw newlines inside strings.
pub fn parse(text: &str, options: &LoadOptions) -> Result<Canvas, DecodeError> {
    let text = escape_raw_newlines(text);
    Canvas::from_json_str_with(&text, options.decode)
}

/// Encode `canvas` to document text (with a trailing newline).
pub fn render(canvas: &Canvas, options: &SaveOptions) -> Result<String, DocumentError> {
    let value = canvas.encode()?;
    let mut buf = if options.pretty {
        let indent = vec![b' '; options.indent];
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        value.serialize(&mut ser)?;
        buf
    } else {
        serde_json::to_vec(&value)?
    };
    buf.push(b'\n');
    let text = String::from_utf8(buf)?;
    Ok(match options.newline_mode {
        NewlineMode::Escaped => text,
        NewlineMode::Literal => unescape_newlines(&text).into_owned(),
    })
}

/// Read and decode the document at `path`.
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Canvas, DocumentError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
    let canvas = parse(&text, options).map_err(|source| DocumentError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        nodes = canvas.nodes().len(),
        edges = canvas.edges().len(),
        "loaded canvas"
    );
    Ok(canvas)
}

/// Encode `canvas` and write it to `path`.
///
/// The document is written to a sibling temp file first and renamed into
/// place, so an existing file is never left half-written.
pub fn save(
    canvas: &Canvas,
    path: impl AsRef<Path>,
    options: &SaveOptions,
) -> Result<(), DocumentError> {
    let path = path.as_ref();
    let text = render(canvas, options)?;
    let tmp = temp_path(path)?;
    fs::write(&tmp, &text).map_err(|e| DocumentError::io(&tmp, e))?;
    if let Err(err) = fs::rename(&tmp, path) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            debug!(path = %tmp.display(), error = %cleanup, "could not remove temp file");
        }
        return Err(DocumentError::io(path, err));
    }
    info!(path = %path.display(), bytes = text.len(), "saved canvas");
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, DocumentError> {
    let name = path.file_name().ok_or_else(|| {
        DocumentError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use canvas_model::{Attachments, Identifier, Position};

    const DOC: &str = r#"{"nodes":[{"id":"1","type":"text","x":0,"y":0,"width":10,"height":10,"text":"a\nb"}],"edges":[]}"#;

    #[test]
    fn parse_accepts_raw_newlines_in_text() {
        let raw = DOC.replace("\\n", "\n");
        let canvas = parse(&raw, &LoadOptions::default()).unwrap();
        assert_eq!(canvas, parse(DOC, &LoadOptions::default()).unwrap());
    }

    #[test]
    fn compact_render_is_one_line() {
        let canvas = parse(DOC, &LoadOptions::default()).unwrap();
        let options = SaveOptions {
            pretty: false,
            ..SaveOptions::default()
        };
        assert_eq!(render(&canvas, &options).unwrap(), format!("{DOC}\n"));
    }

    #[test]
    fn pretty_render_honours_indent() {
        let canvas = parse(DOC, &LoadOptions::default()).unwrap();
        let options = SaveOptions {
            indent: 4,
            ..SaveOptions::default()
        };
        let text = render(&canvas, &options).unwrap();
        assert!(text.starts_with("{\n    \"nodes\": [\n        {\n"), "{text}");
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn literal_mode_writes_raw_newlines_and_loads_back() {
        let canvas = parse(DOC, &LoadOptions::default()).unwrap();
        let options = SaveOptions {
            newline_mode: NewlineMode::Literal,
            ..SaveOptions::default()
        };
        let text = render(&canvas, &options).unwrap();
        assert!(text.contains("\"a\nb\""));
        assert_eq!(parse(&text, &LoadOptions::default()).unwrap(), canvas);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.canvas");
        let canvas = parse(DOC, &LoadOptions::default()).unwrap();
        save(&canvas, &path, &SaveOptions::default()).unwrap();
        assert_eq!(load(&path, &LoadOptions::default()).unwrap(), canvas);
        assert!(!dir.path().join(".board.canvas.tmp").exists());
    }

    #[test]
    fn failed_encode_leaves_existing_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.canvas");
        fs::write(&path, "original").unwrap();

        let edge_doc = r#"{"nodes":[],"edges":[{"id":"e","fromNode":"1","fromSide":"top","toNode":"2","toSide":"top"}]}"#;
        let mut canvas = parse(edge_doc, &LoadOptions::default()).unwrap();
        let edge = canvas.edge(Identifier::from_integer(0xe)).unwrap().clone();
        let target = edge.bound().unwrap().end();
        canvas
            .replace_edge(edge.with_attachments(Attachments::FloatingStart {
                start: Position::new(1, 1),
                to: target,
            }))
            .unwrap();

        let err = save(&canvas, &path, &SaveOptions::default()).unwrap_err();
        assert!(matches!(err, DocumentError::Encode(_)), "{err}");
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn decode_errors_name_file_and_json_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.canvas");
        fs::write(&path, r#"{"nodes":[{"id":"zz"}],"edges":[]}"#).unwrap();
        let err = load(&path, &LoadOptions::default()).unwrap_err();
        let DocumentError::Decode { source, .. } = &err else {
            panic!("expected decode error, got {err}");
        };
        assert_eq!(source.path().to_string(), "$.nodes[0]");
        assert!(err.to_string().contains("bad.canvas"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("nope.canvas"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn prefs_map_onto_options() {
        let prefs = ToolPrefs {
            strict_references: true,
            pretty: false,
            newline_mode: NewlineMode::Literal,
            indent: 8,
        };
        assert!(LoadOptions::from(&prefs).decode.strict_references);
        let save = SaveOptions::from(&prefs);
        assert!(!save.pretty);
        assert_eq!(save.indent, 8);
        assert_eq!(save.newline_mode, NewlineMode::Literal);
    }
}
