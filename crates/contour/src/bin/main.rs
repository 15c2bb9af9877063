use contour::{
    algorithms::render_silhouette, CanvasSurface, ClassificationGrid, ColorSpec, Editor, EditorCommand, EditorConfig,
    PointerEvent, PointerEventSource,
};
use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

const GRID_WIDTH: u32 = 64;
const GRID_HEIGHT: u32 = 48;
const DISPLAY_WIDTH: u32 = 640;
const DISPLAY_HEIGHT: u32 = 480;

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .finish()
        .init();

    let output = std::env::args().nth(1).unwrap_or_else(|| "contour_composite.png".to_string());
    let config = match std::env::args().nth(2) {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    println!("📋 Editor commands:");
    for (i, name) in EditorCommand::command_names().iter().enumerate() {
        println!("   {}. {}", i + 1, name);
    }

    let grid = person_grid()?;
    println!("🧍 Synthetic grid: {}x{}, {} foreground cells", grid.width(), grid.height(), grid.foreground_count());

    let events = PointerEventSource::new();
    let surface = CanvasSurface::new(DISPLAY_WIDTH, DISPLAY_HEIGHT).with_event_source(events.clone());
    let mut editor = Editor::with_config(surface, Some(backdrop()), grid.clone(), &config)?;

    editor.render_mask(&config.contour_color, config.contour_opacity, config.contour_width);
    let points = editor.extract_default_control_points();
    println!("🎯 Sampled {} control points", points.len());
    editor.render_control_point_markers(config.marker_radius);

    // Simulated drag of the first control point.
    if let Some(first) = points.first() {
        events.dispatch(&PointerEvent::down(first.display_x + 2.0, first.display_y + 2.0));
        for step in 1..=10 {
            let offset = step as f32 * 4.0;
            events.dispatch(&PointerEvent::moved(first.display_x + 2.0 + offset, first.display_y + 2.0));
        }
        events.dispatch(&PointerEvent::up(first.display_x + 42.0, first.display_y + 2.0));
        println!("✋ Dragged point from grid cell ({}, {})", first.grid_x(), first.grid_y());
    }

    let png = editor.export_composite("image/png").await?;
    std::fs::write(&output, &png)?;
    println!("💾 Composite written to {} ({} bytes)", output, png.len());

    let silhouette = render_silhouette(
        &grid,
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
        ColorSpec::from_hex_or_default(&config.contour_color),
        76,
        ColorSpec::from_hex_or_default(&config.contour_color),
    );
    let output_path = Path::new(&output);
    let file_name = output_path.file_name().and_then(|n| n.to_str()).unwrap_or("contour_composite.png");
    let silhouette_path = output_path.with_file_name(format!("silhouette_{}", file_name));
    silhouette.save(&silhouette_path)?;
    println!("💾 Silhouette preview written to {}", silhouette_path.display());

    editor.dispose();
    Ok(())
}

/// Head and torso made of two ellipses.
fn person_grid() -> contour::Result<ClassificationGrid> {
    let inside = |x: f32, y: f32, cx: f32, cy: f32, rx: f32, ry: f32| {
        let (dx, dy) = ((x - cx) / rx, (y - cy) / ry);
        dx * dx + dy * dy <= 1.0
    };

    let data = (0..GRID_HEIGHT)
        .flat_map(|y| (0..GRID_WIDTH).map(move |x| (x as f32, y as f32)))
        .map(|(x, y)| {
            let head = inside(x, y, 32.0, 12.0, 6.0, 7.0);
            let torso = inside(x, y, 32.0, 34.0, 13.0, 15.0);
            if head || torso { 1.0 } else { 0.0 }
        })
        .collect();

    ClassificationGrid::new(data, GRID_WIDTH, GRID_HEIGHT)
}

fn backdrop() -> RgbaImage {
    RgbaImage::from_fn(DISPLAY_WIDTH, DISPLAY_HEIGHT, |x, y| {
        Rgba([(x * 255 / DISPLAY_WIDTH) as u8, (y * 255 / DISPLAY_HEIGHT) as u8, 160, 255])
    })
}
