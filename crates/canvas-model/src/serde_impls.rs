// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `serde` bridges: every impl routes through the hand-written encode/decode
//! so both paths enforce the same rules and key order.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::canvas::Canvas;
use crate::edge::Edge;
use crate::node::Node;

impl Serialize for Canvas {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Canvas {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(D::Error::custom)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(D::Error::custom)
    }
}

impl Serialize for Edge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Edge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::attach::{Attachment, Attachments};
    use crate::geom::Position;
    use crate::ident::Identifier;
    use crate::side::Side;

    #[test]
    fn serde_json_matches_encode() {
        let text = r#"{"nodes":[{"id":"1","type":"link","x":1,"y":2,"width":3,"height":4,"url":"https://a"}],"edges":[]}"#;
        let canvas: Canvas = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&canvas).unwrap(), text);
    }

    #[test]
    fn serde_reports_decode_path() {
        let err = serde_json::from_str::<Canvas>(r#"{"nodes":[{"id":"1"}],"edges":[]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("$.nodes[0]"), "{err}");
    }

    #[test]
    fn floating_edge_fails_serialization() {
        let edge = Edge::decode(&serde_json::json!({
            "id":"5","fromNode":"1","fromSide":"top","toNode":"2","toSide":"top"
        }))
        .unwrap();
        let floating = edge.with_attachments(Attachments::FloatingEnd {
            from: Attachment::new(Identifier::from_integer(1), Side::Top),
            end: Position::new(0, 0),
        });
        let err = serde_json::to_string(&floating).unwrap_err();
        assert!(err.to_string().contains("end point is floating"), "{err}");
    }
}
