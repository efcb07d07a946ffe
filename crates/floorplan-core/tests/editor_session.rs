//! End-to-end editing sessions driven through the public API.

use floorplan_core::{
    Editor, EditorConfig, ExportDocument, Key, Modifiers, Shape, ShapePatch, ToolKind,
};
use kurbo::{Point, Vec2};

fn label_text(editor: &Editor) -> String {
    editor
        .selected_element()
        .and_then(Shape::as_text)
        .map(|t| t.content.clone())
        .unwrap_or_default()
}

#[test]
fn test_every_kind_gets_defaults() {
    let mut editor = Editor::default();
    for tool in [ToolKind::Rectangle, ToolKind::Circle, ToolKind::Arrow, ToolKind::Text] {
        editor.select_tool(tool);
        let shape = editor.selected_element().cloned().unwrap();
        assert_eq!(shape.position(), Point::new(50.0, 50.0));
        assert_eq!(shape.style().fill_color, "#2f2f2f");
    }
    assert_eq!(editor.scene().len(), 4);
}

#[test]
fn test_layout_then_export() {
    let mut editor = Editor::default();
    editor.select_tool(ToolKind::Rectangle);
    let room = editor.selection().unwrap();

    editor.pointer_move(Point::new(400.0, 300.0));
    editor.select_tool(ToolKind::Circle);
    editor.set_active_color("#3366ff");

    editor.drag_start(room, Point::new(60.0, 60.0));
    editor.drag_end(Point::new(110.0, 80.0));

    editor.pointer_move(Point::new(200.0, 40.0));
    editor.select_tool(ToolKind::Text);
    editor.double_click(Point::new(210.0, 50.0));
    editor.set_overlay_text("Living");
    editor.key_down_with(Key::Enter, Modifiers::SHIFT);
    for c in "Room".chars() {
        editor.key_down(Key::Character(c.to_string()));
    }
    editor.key_down(Key::Enter);
    assert_eq!(label_text(&editor), "Living\nRoom");

    let doc = editor.export_document();
    assert_eq!(doc.len(), 3);

    let square = &doc.elements.squares[0];
    assert!((square.x - 100.0).abs() < f64::EPSILON);
    assert!((square.y - 70.0).abs() < f64::EPSILON);
    assert_eq!(square.color, "#2f2f2f");

    let circle = &doc.elements.circles[0];
    assert!((circle.x - 400.0).abs() < f64::EPSILON);
    assert_eq!(circle.color, "#3366ff");

    let text = &doc.elements.text_boxes[0];
    assert_eq!(text.text, "Living\nRoom");
    let metrics = editor.scene().metrics();
    let longest = metrics.text_width("Living", "Arial", 24.0, Default::default());
    assert!(text.width >= longest + metrics.padding());

    let parsed = ExportDocument::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(parsed.elements, doc.elements);
}

#[test]
fn test_escape_leaves_label_untouched() {
    let mut editor = Editor::default();
    editor.select_tool(ToolKind::Text);
    let id = editor.selection().unwrap();
    let before = editor.get_element(id).cloned();
    editor.begin_text_edit(id);
    editor.key_down(Key::Backspace);
    editor.key_down(Key::Backspace);
    editor.key_down(Key::Escape);
    assert_eq!(editor.get_element(id).cloned(), before);
}

#[test]
fn test_handle_drag_sets_circle_radius() {
    let mut editor = Editor::default();
    editor.pointer_move(Point::new(300.0, 300.0));
    editor.select_tool(ToolKind::Circle);
    let id = editor.selection().unwrap();

    let handle = editor
        .handles()
        .into_iter()
        .find(|h| (h.position.y - 300.0).abs() < f64::EPSILON && h.position.x > 300.0)
        .unwrap();
    let end = handle.position + Vec2::new(30.0, 0.0);
    editor.pointer_down(handle.position);
    editor.pointer_move(end);
    editor.pointer_up(end);

    match editor.get_element(id) {
        Some(Shape::Circle(c)) => assert!((c.radius - 80.0).abs() < 1e-9),
        other => panic!("unexpected element {:?}", other),
    }
}

#[test]
fn test_stale_updates_are_ignored() {
    let mut editor = Editor::new(EditorConfig::default());
    editor.select_tool(ToolKind::Arrow);
    let id = editor.selection().unwrap();
    editor.key_down(Key::Delete);
    assert!(editor.selection().is_none());

    editor.update_element(id, &ShapePatch::fill("red"));
    editor.drag_start(id, Point::ZERO);
    editor.drag_end(Point::new(10.0, 10.0));
    assert!(editor.scene().is_empty());
    assert!(editor.export_document().is_empty());
}
