//! Integration tests for the document model.

use tether_dom::{
    snap_to_edge, Corner, Edges, InputEvent, NodeTree, Point, Rect, Selector, Size, Throttle,
};

const TEMPLATE: &str = r#"<div class="tooltip">
    <div class="tooltip-inner">
        <div class="tooltip-head"></div>
        <div class="tooltip-body"></div>
    </div>
    <div class="tooltip-arrow"></div>
</div>"#;

#[test]
fn test_panel_template_places_by_corner() {
    let mut tree = NodeTree::new();
    let anchor = tree.create_element("a");
    tree.set_rect(anchor, Rect::new(100.0, 100.0, 50.0, 20.0)).unwrap();

    let panel = tree.instantiate(TEMPLATE).unwrap();
    tree.set_margin(panel, Edges::ZERO.with_bottom(8.0)).unwrap();

    // Put the panel's bottom-left corner on the anchor's top-right corner.
    let point = tree.rect(anchor).unwrap().corner_point(Corner::TopRight);
    let origin = snap_to_edge(point, Corner::TopRight.opposite().edge(), Size::new(80.0, 30.0));
    tree.set_rect(panel, Rect::from_origin_size(origin, Size::new(80.0, 30.0))).unwrap();

    assert_eq!(tree.rect(panel).unwrap(), Rect::new(150.0, 70.0, 80.0, 30.0));
    assert_eq!(tree.margin(panel).unwrap().bottom, 8.0);
}

#[test]
fn test_reference_lookup_across_roots() {
    let mut tree = NodeTree::new();
    let help = tree.instantiate(r#"<section id="help"><p>Press <b>F1</b></p></section>"#).unwrap();
    let anchor = tree.create_element("a");
    tree.set_attribute(anchor, "data-tooltip", "#help").unwrap();

    let reference = tree.attribute(anchor, "data-tooltip").unwrap();
    let found = tree.query_document(&Selector::parse(&reference).unwrap());

    assert_eq!(found, Some(help));
    let paragraph = tree.children(help)[0];
    assert_eq!(tree.html(paragraph), Some("Press"));
}

#[test]
fn test_delegate_query_finds_all_triggers() {
    let mut tree = NodeTree::new();
    let nav = tree.create_element("nav");
    let first = tree.append_element(nav, "a").unwrap();
    let second = tree.append_element(nav, "a").unwrap();
    let plain = tree.append_element(nav, "a").unwrap();
    tree.add_class(first, "js-tooltip").unwrap();
    tree.add_class(second, "js-tooltip").unwrap();

    let found = tree.query_document_all(&Selector::parse(".js-tooltip").unwrap());

    assert_eq!(found, vec![first, second]);
    assert!(!found.contains(&plain));
}

#[test]
fn test_move_stream_throttling() {
    let mut tree = NodeTree::new();
    let node = tree.create_element("a");
    let mut throttle = Throttle::new(50);

    let accepted = (0..10u64)
        .map(|i| InputEvent::PointerMove {
            node,
            position: Point::new(i as f32, 0.0),
            time_ms: i * 20,
        })
        .filter(|event| throttle.ready(event.time_ms()))
        .count();

    // 0, 60, 120, 180 pass
    assert_eq!(accepted, 4);
}
