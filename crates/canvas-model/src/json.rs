// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON paths and typed field readers shared by the decoders.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{DecodeError, DecodeErrorKind};
use crate::ident::Identifier;
use crate::side::Side;

/// Location of a value inside a document, rendered as `$.nodes[2].type`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonPath(Vec<Segment>);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

impl JsonPath {
    /// The document root (`$`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to `key` inside the object at `self`.
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_owned()));
        Self(segments)
    }

    /// Path to element `index` inside the array at `self`.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Short name of a value's JSON shape, for error messages.
pub(crate) fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Insert `key` only when `value` is present; absent optionals are never `null`.
pub(crate) fn insert_opt(out: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.insert(key.to_owned(), Value::from(value));
    }
}

/// Typed access to the keys of one JSON object.
///
/// Required readers reject absent keys and `null`; optional readers map both
/// to `None`.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a JsonPath,
}

impl<'a> Fields<'a> {
    pub(crate) fn of(value: &'a Value, path: &'a JsonPath) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(DecodeError::new(
                path.clone(),
                DecodeErrorKind::WrongType {
                    expected: "object",
                    found: shape_of(other),
                },
            )),
        }
    }

    pub(crate) fn path_of(&self, key: &str) -> JsonPath {
        self.path.key(key)
    }

    fn required(&self, key: &'static str) -> Result<&'a Value, DecodeError> {
        self.map.get(key).ok_or_else(|| {
            DecodeError::new(self.path.clone(), DecodeErrorKind::MissingField(key))
        })
    }

    fn optional(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    fn wrong_type(&self, key: &str, expected: &'static str, found: &Value) -> DecodeError {
        DecodeError::new(
            self.path_of(key),
            DecodeErrorKind::WrongType {
                expected,
                found: shape_of(found),
            },
        )
    }

    pub(crate) fn string(&self, key: &'static str) -> Result<&'a str, DecodeError> {
        let value = self.required(key)?;
        value
            .as_str()
            .ok_or_else(|| self.wrong_type(key, "string", value))
    }

    pub(crate) fn opt_string(&self, key: &str) -> Result<Option<&'a str>, DecodeError> {
        match self.optional(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "string", value)),
        }
    }

    pub(crate) fn integer(&self, key: &'static str) -> Result<i64, DecodeError> {
        let value = self.required(key)?;
        value
            .as_i64()
            .ok_or_else(|| self.wrong_type(key, "integer", value))
    }

    pub(crate) fn identifier(&self, key: &'static str) -> Result<Identifier, DecodeError> {
        let raw = self.string(key)?;
        Identifier::parse(raw).map_err(|err| DecodeError::new(self.path_of(key), err.into()))
    }

    pub(crate) fn side(&self, key: &'static str) -> Result<Side, DecodeError> {
        let raw = self.string(key)?;
        raw.parse::<Side>()
            .map_err(|err| DecodeError::new(self.path_of(key), err.into()))
    }

    pub(crate) fn array(&self, key: &'static str) -> Result<&'a [Value], DecodeError> {
        let value = self.required(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.wrong_type(key, "array", value))
    }
}
