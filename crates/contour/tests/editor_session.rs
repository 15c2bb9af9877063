use contour::{
    render_mask, CanvasSurface, ClassificationGrid, ColorSpec, ContourError, Editor, EditorConfig, ExportFormat,
    PointerEvent, PointerEventSource, RasterEncoder, Result,
};
use image::{Rgba, RgbaImage};

const WIDTH: u32 = 120;
const HEIGHT: u32 = 90;

/// 24x18 grid holding a filled ellipse, so the display scale is 5x5.
fn ellipse_grid() -> ClassificationGrid {
    let data = (0..18)
        .flat_map(|y| (0..24).map(move |x| (x as f32, y as f32)))
        .map(|(x, y)| {
            let (dx, dy) = ((x - 11.5) / 8.0, (y - 8.5) / 6.0);
            if dx * dx + dy * dy <= 1.0 { 1.0 } else { 0.0 }
        })
        .collect();
    ClassificationGrid::new(data, 24, 18).unwrap()
}

fn backdrop() -> RgbaImage {
    RgbaImage::from_fn(WIDTH, HEIGHT, |x, y| Rgba([(x * 2) as u8, (y * 2) as u8, 40, 255]))
}

fn new_editor() -> (Editor<CanvasSurface>, PointerEventSource) {
    let events = PointerEventSource::new();
    let surface = CanvasSurface::new(WIDTH, HEIGHT).with_event_source(events.clone());
    let editor = Editor::new(surface, Some(backdrop()), ellipse_grid()).unwrap();
    (editor, events)
}

fn drag(events: &PointerEventSource, from: (f32, f32), to: (f32, f32)) {
    events.dispatch(&PointerEvent::down(from.0, from.1));
    events.dispatch(&PointerEvent::moved((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
    events.dispatch(&PointerEvent::moved(to.0, to.1));
    events.dispatch(&PointerEvent::up(to.0, to.1));
}

struct FailingEncoder;

impl RasterEncoder for FailingEncoder {
    fn encode(&self, _image: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>> {
        Err(ContourError::EncodingFailed(format!("no {} encoder available", format)))
    }
}

#[test]
fn redraw_is_idempotent() {
    let (mut editor, _events) = new_editor();
    editor.render_mask("#00FF00", 0.5, 3);
    editor.extract_control_points(5);

    editor.redraw();
    let first = editor.surface_pixels();
    editor.redraw();
    let second = editor.surface_pixels();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn render_mask_never_accumulates() {
    let (mut editor, _events) = new_editor();
    editor.render_mask("#00FF00", 0.5, 3);
    let once = editor.surface_pixels();
    editor.render_mask("#00FF00", 0.5, 3);
    editor.render_mask("#00FF00", 0.5, 3);
    assert_eq!(editor.surface_pixels(), once);

    let expected = render_mask(&backdrop(), &ellipse_grid(), ColorSpec::DEFAULT, 127);
    assert_eq!(once, expected);
}

#[test]
fn drag_does_not_change_the_overlay() {
    let (mut editor, events) = new_editor();
    editor.render_mask("#ff8800", 0.75, 3);
    let before = editor.surface_pixels();

    let points = editor.extract_control_points(5);
    assert!(!points.is_empty());
    let target = points[points.len() / 2];
    drag(&events, (target.display_x, target.display_y), (target.display_x + 20.0, target.display_y - 10.0));

    let moved = editor
        .control_points()
        .into_iter()
        .find(|p| p.grid_x() == target.grid_x() && p.grid_y() == target.grid_y())
        .unwrap();
    assert_eq!(moved.display(), [target.display_x + 20.0, target.display_y - 10.0]);

    editor.hide_control_point_markers();
    assert_eq!(editor.surface_pixels(), before);
}

#[test]
fn drag_redraws_markers_at_new_position() {
    let (mut editor, events) = new_editor();
    editor.render_mask("#00FF00", 0.5, 3);
    let points = editor.extract_control_points(5);
    let target = points[0];

    events.dispatch(&PointerEvent::down(target.display_x, target.display_y));
    assert!(editor.is_dragging());
    // Far corner, away from every boundary cell and other marker.
    events.dispatch(&PointerEvent::moved(115.0, 85.0));

    let shown = editor.surface_pixels();
    let red = shown.get_pixel(115, 85);
    assert!(red.0[0] > 150 && red.0[1] < 150, "marker expected at drag target, got {:?}", red);

    events.dispatch(&PointerEvent::leave(115.0, 85.0));
    assert!(!editor.is_dragging());
}

#[test]
fn pointer_down_away_from_points_does_nothing() {
    let (mut editor, events) = new_editor();
    editor.render_mask("#00FF00", 0.5, 3);
    editor.extract_control_points(5);
    let before = editor.surface_pixels();

    events.dispatch(&PointerEvent::down(1.0, 1.0));
    assert!(!editor.is_dragging());
    events.dispatch(&PointerEvent::moved(60.0, 45.0));
    assert_eq!(editor.surface_pixels(), before);
}

#[test]
fn reextraction_discards_drag_edits() {
    let (mut editor, events) = new_editor();
    let original = editor.extract_control_points(5);
    let target = original[0];
    drag(&events, (target.display_x, target.display_y), (100.0, 80.0));
    assert_ne!(editor.control_points(), original);

    let fresh = editor.extract_control_points(5);
    assert_eq!(fresh, original);
    assert_eq!(editor.control_points(), original);
}

#[tokio::test]
async fn export_excludes_markers() {
    let (mut plain, _a) = new_editor();
    plain.render_mask("#00FF00", 0.5, 3);
    let without_markers = plain.export_composite("image/png").await.unwrap();

    let (mut marked, events) = new_editor();
    marked.render_mask("#00FF00", 0.5, 3);
    let points = marked.extract_control_points(5);
    marked.render_control_point_markers(6);
    let target = points[0];
    drag(&events, (target.display_x, target.display_y), (60.0, 45.0));
    let with_markers = marked.export_composite("image/png").await.unwrap();

    let decoded_plain = image::load_from_memory(&without_markers).unwrap().to_rgba8();
    let decoded_marked = image::load_from_memory(&with_markers).unwrap().to_rgba8();
    assert_eq!(decoded_plain, decoded_marked);
    assert_ne!(decoded_marked, marked.surface_pixels(), "surface shows markers, export must not");
}

#[tokio::test]
async fn export_matches_mask_composite() {
    let (mut editor, _events) = new_editor();
    editor.render_mask("#123456", 1.0, 3);
    let bytes = editor.export_composite("image/png").await.unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    let expected = render_mask(&backdrop(), &ellipse_grid(), ColorSpec::new(0x12, 0x34, 0x56), 255);
    assert_eq!(decoded, expected);
}

#[tokio::test]
async fn export_rejects_unknown_format() {
    let (editor, _events) = new_editor();
    let err = editor.export_composite("image/bmp").await.unwrap_err();
    assert!(matches!(err, ContourError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn export_propagates_encoder_failure() {
    let (editor, _events) = new_editor();
    let editor = editor.with_encoder(FailingEncoder);
    let err = editor.export_composite("image/png").await.unwrap_err();
    assert!(matches!(err, ContourError::EncodingFailed(_)));
}

#[tokio::test]
async fn export_does_not_touch_the_surface() {
    let (mut editor, _events) = new_editor();
    editor.render_mask("#00FF00", 0.5, 3);
    editor.extract_control_points(5);
    editor.redraw();
    let shown = editor.surface_pixels();
    editor.export_composite("image/jpeg").await.unwrap();
    assert_eq!(editor.surface_pixels(), shown);
}

#[test]
fn empty_grid_leaves_base_image() {
    let surface = CanvasSurface::new(WIDTH, HEIGHT);
    let mut editor = Editor::new(surface, Some(backdrop()), ClassificationGrid::from_square(Vec::new())).unwrap();
    editor.render_mask("#00FF00", 1.0, 3);
    assert!(editor.extract_control_points(5).is_empty());
    editor.redraw();
    assert_eq!(editor.surface_pixels(), backdrop());
}

#[test]
fn config_drives_defaults() {
    let config = EditorConfig::from_json_str(r#"{ "sample_stride": 1, "hit_threshold": 2.0 }"#).unwrap();
    let events = PointerEventSource::new();
    let surface = CanvasSurface::new(WIDTH, HEIGHT).with_event_source(events.clone());
    let mut editor = Editor::with_config(surface, Some(backdrop()), ellipse_grid(), &config).unwrap();

    let fine = editor.extract_default_control_points();
    let coarse = editor.extract_control_points(5);
    assert!(fine.len() > coarse.len());

    // Tight hit threshold: 3 units away is a miss.
    let target = coarse[0];
    events.dispatch(&PointerEvent::down(target.display_x + 3.0, target.display_y));
    assert!(!editor.is_dragging());
}

#[test]
fn second_session_on_same_source_is_independent() {
    let events = PointerEventSource::new();
    let mut first = Editor::new(
        CanvasSurface::new(WIDTH, HEIGHT).with_event_source(events.clone()),
        Some(backdrop()),
        ellipse_grid(),
    )
    .unwrap();
    first.dispose();

    let mut second = Editor::new(
        CanvasSurface::new(WIDTH, HEIGHT).with_event_source(events.clone()),
        Some(backdrop()),
        ellipse_grid(),
    )
    .unwrap();
    assert_eq!(events.listener_count(), 4);

    let target = second.extract_control_points(5)[0];
    events.dispatch(&PointerEvent::down(target.display_x, target.display_y));
    assert!(second.is_dragging());
    assert!(!first.is_dragging());
}
