// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property tests for identifier rendering and whole-canvas round-trips.
#![allow(clippy::unwrap_used)]

use canvas_model::{
    Attachment, Canvas, Color, Edge, Frame, Identifier, Node, NodeContent, Position, Side,
};
use proptest::prelude::*;

fn side() -> impl Strategy<Value = Side> {
    prop::sample::select(Side::ALL.to_vec())
}

fn content() -> impl Strategy<Value = NodeContent> {
    prop_oneof![
        (".*", prop::option::of("[a-z#]{1,8}")).prop_map(|(file, subpath)| NodeContent::File {
            file,
            subpath
        }),
        ".*".prop_map(|text| NodeContent::Text { text }),
        "https?://[a-z]{1,12}".prop_map(|url| NodeContent::Link { url }),
        prop::option::of(".*").prop_map(|label| NodeContent::Group { label }),
    ]
}

fn frame() -> impl Strategy<Value = Frame> {
    (
        any::<i64>(),
        any::<i64>(),
        0i64..10_000,
        0i64..10_000,
        prop::option::of("[1-6]|#[0-9a-f]{6}"),
    )
        .prop_map(|(x, y, w, h, color)| {
            let frame = Frame::new(Position::new(x, y), w, h);
            match color {
                Some(c) => frame.with_color(c),
                None => frame,
            }
        })
}

/// Canvas whose node ids are `0..n` and whose edges (ids from `0x1000`) only
/// reference those nodes.
fn canvas() -> impl Strategy<Value = Canvas> {
    prop::collection::vec((frame(), content()), 1..8).prop_flat_map(|parts| {
        let count = parts.len() as u64;
        let edge = (
            0..count,
            side(),
            0..count,
            side(),
            prop::option::of("[1-6]"),
            prop::option::of("[a-z ]{0,12}"),
        );
        (Just(parts), prop::collection::vec(edge, 0..6)).prop_map(|(parts, edges)| {
            let mut next = 0u64;
            let mut ids = move || {
                let id = Identifier::from_integer(next);
                next += 1;
                id
            };
            let mut canvas = Canvas::new();
            for (frame, content) in parts {
                canvas.push_node(Node::make(frame, content, &mut ids));
            }
            let mut edge_ids = (0x1000u64..).map(Identifier::from_integer);
            let mut alloc = move || edge_ids.next().unwrap_or(Identifier::from_integer(u64::MAX));
            for (from, from_side, to, to_side, color, label) in edges {
                canvas.push_edge(Edge::make_from_endpoints(
                    Attachment::new(Identifier::from_integer(from), from_side),
                    Attachment::new(Identifier::from_integer(to), to_side),
                    color.map(Color::from),
                    label,
                    &mut alloc,
                ));
            }
            canvas
        })
    })
}

proptest! {
    #[test]
    fn identifier_render_parse_is_identity(n in any::<u64>()) {
        let id = Identifier::from_integer(n);
        prop_assert_eq!(Identifier::parse(&id.render()).unwrap(), id);
    }

    #[test]
    fn identifier_parse_accepts_upper_case(n in any::<u64>()) {
        let upper = format!("{n:X}");
        prop_assert_eq!(Identifier::parse(&upper).unwrap().value(), n);
    }

    #[test]
    fn side_parse_rejects_everything_else(raw in "[a-zA-Z]{0,8}") {
        let known = Side::ALL.iter().any(|s| s.as_str() == raw);
        prop_assert_eq!(Side::parse(&raw).is_some(), known);
    }

    #[test]
    fn canvas_decode_encode_round_trip(canvas in canvas()) {
        let encoded = canvas.encode().unwrap();
        let decoded = Canvas::decode(&encoded).unwrap();
        prop_assert_eq!(&decoded, &canvas);
        prop_assert_eq!(decoded.encode().unwrap(), encoded);
    }

    #[test]
    fn generated_canvases_pass_strict_checks(canvas in canvas()) {
        prop_assert!(canvas.integrity_issues().is_empty());
        let text = canvas.to_json_string(true).unwrap();
        let strict = Canvas::from_json_str_with(&text, canvas_model::DecodeOptions::strict());
        prop_assert_eq!(strict.unwrap(), canvas);
    }
}
