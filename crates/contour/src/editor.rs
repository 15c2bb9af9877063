use std::{
    cell::RefCell,
    rc::Rc,
    sync::Arc,
};

use image::RgbaImage;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::{
    algorithms::{compositor, sampler},
    command::EditorCommand,
    config::EditorConfig,
    error::{ContourError, Result},
    export::{ExportFormat, ImageEncoder},
    grid::ClassificationGrid,
    interaction::{InteractionState, PointerEvent, PointerEventKind},
    surface::{PointerEventSource, PointerHandler},
    traits::{DisplaySurface, RasterEncoder},
    types::{ControlPoint, MarkerStyle, RenderStyle},
};

/// Everything the pointer handlers and the public API mutate.
struct EditorState<S> {
    surface: S,
    grid: ClassificationGrid,
    snapshot: RgbaImage,
    style: RenderStyle,
    markers: MarkerStyle,
    stride: u32,
    interaction: InteractionState,
}

impl<S: DisplaySurface> EditorState<S> {
    /// Base snapshot plus the boundary overlay for the current style. Never
    /// includes markers and never reads back from the surface.
    fn mask_frame(&self) -> RgbaImage {
        compositor::render_mask(&self.snapshot, &self.grid, self.style.color, self.style.alpha())
    }

    fn render_mask(&mut self) {
        let frame = self.mask_frame();
        self.surface.write_pixels(&frame);
    }

    fn redraw(&mut self) {
        let frame = compositor::draw_markers(self.mask_frame(), self.interaction.points(), &self.markers);
        self.surface.write_pixels(&frame);
    }

    fn on_pointer(&mut self, event: &PointerEvent) {
        if self.interaction.handle(event) {
            self.redraw();
        }
    }
}

/// Interactive boundary editor bound to one display surface.
///
/// The editor owns the base snapshot, the classification grid and the control
/// points. Every repaint restores the snapshot first, so overlays never stack.
/// Control points are sampled from the grid; dragging them moves markers only
/// and never changes the boundary overlay.
pub struct Editor<S: DisplaySurface + 'static> {
    state: Rc<RefCell<EditorState<S>>>,
    /// Created once so that attaching and detaching use the same handle.
    handler: PointerHandler,
    bound_to: Option<PointerEventSource>,
    encoder: Arc<dyn RasterEncoder>,
}

impl<S: DisplaySurface + 'static> Editor<S> {
    /// Start a session with default settings. See [`Editor::with_config`].
    pub fn new(surface: S, base_image: Option<RgbaImage>, grid: ClassificationGrid) -> Result<Self> {
        Self::with_config(surface, base_image, grid, &EditorConfig::default())
    }

    /// Start a session. `base_image` must match the surface dimensions; when
    /// absent the snapshot is fully transparent. Pointer listeners are
    /// attached immediately if the surface has an event source.
    pub fn with_config(
        surface: S,
        base_image: Option<RgbaImage>,
        grid: ClassificationGrid,
        config: &EditorConfig,
    ) -> Result<Self> {
        let (width, height) = (surface.width(), surface.height());
        let snapshot = match base_image {
            Some(image) if image.dimensions() != (width, height) => {
                return Err(ContourError::SurfaceDimensionMismatch {
                    expected_width: width,
                    expected_height: height,
                    actual_width: image.width(),
                    actual_height: image.height(),
                });
            }
            Some(image) => image,
            None => RgbaImage::new(width, height),
        };

        let state = Rc::new(RefCell::new(EditorState {
            surface,
            grid,
            snapshot,
            style: config.render_style(),
            markers: config.marker_style(),
            stride: config.stride(),
            interaction: InteractionState::new(config.hit_threshold),
        }));
        let handler = Self::bind_handler(&state);

        let mut editor = Self {
            state,
            handler,
            bound_to: None,
            encoder: Arc::new(ImageEncoder),
        };
        editor.init_event_listeners();
        info!(width, height, "contour editor session started");
        Ok(editor)
    }

    /// Replace the raster encoder used by [`Editor::export_composite`].
    pub fn with_encoder(mut self, encoder: impl RasterEncoder + 'static) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    fn bind_handler(state: &Rc<RefCell<EditorState<S>>>) -> PointerHandler {
        let weak = Rc::downgrade(state);
        Rc::new(move |event: &PointerEvent| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Ok(mut editor) = shared.try_borrow_mut() else {
                warn!(kind = %event.kind, "pointer event dropped while the editor is busy");
                return;
            };
            editor.on_pointer(event);
        })
    }

    /// Attach pointer listeners to the surface's event source, removing any
    /// previously attached ones first. Without an event source this is a no-op.
    pub fn init_event_listeners(&mut self) {
        self.remove_event_listeners();

        let Some(source) = self.state.borrow().surface.event_source() else {
            debug!("surface has no pointer event source");
            return;
        };
        for kind in PointerEventKind::iter() {
            source.add_listener(kind, &self.handler);
        }
        self.bound_to = Some(source);
        debug!("pointer listeners attached");
    }

    /// Detach pointer listeners. Safe to call when none were attached.
    pub fn remove_event_listeners(&mut self) {
        let source = self
            .bound_to
            .take()
            .or_else(|| self.state.borrow().surface.event_source());
        let Some(source) = source else {
            return;
        };
        let removed = PointerEventKind::iter()
            .filter(|&kind| source.remove_listener(kind, &self.handler))
            .count();
        if removed > 0 {
            debug!(removed, "pointer listeners detached");
        }
    }

    /// Restore the base snapshot and paint the boundary overlay. The style is
    /// kept for later redraws and exports; a malformed colour falls back to green.
    pub fn render_mask(&mut self, color: &str, opacity: f32, width: u32) {
        let mut state = self.state.borrow_mut();
        state.style = RenderStyle::new(color, opacity, width);
        state.render_mask();
        debug!(color = %state.style.color.to_hex(), alpha = state.style.alpha(), "boundary overlay rendered");
    }

    /// Resample control points from the grid, discarding the previous points
    /// and any drag edits made to them.
    pub fn extract_control_points(&mut self, stride: u32) -> Vec<ControlPoint> {
        let mut state = self.state.borrow_mut();
        let (width, height) = (state.surface.width(), state.surface.height());
        let points = sampler::extract_contour_points(&state.grid, width, height, stride);
        state.stride = stride.max(1);
        state.interaction.set_points(points.clone());
        points
    }

    /// Resample with the configured stride.
    pub fn extract_default_control_points(&mut self) -> Vec<ControlPoint> {
        let stride = self.state.borrow().stride;
        self.extract_control_points(stride)
    }

    /// Paint markers for the current control points onto whatever the surface
    /// currently shows.
    pub fn render_control_point_markers(&mut self, radius: u32) {
        let mut state = self.state.borrow_mut();
        state.markers.radius = radius;
        let frame = compositor::draw_markers(state.surface.read_pixels(), state.interaction.points(), &state.markers);
        state.surface.write_pixels(&frame);
    }

    /// Restore the snapshot, paint the boundary overlay, then the markers.
    /// Idempotent while nothing changes.
    pub fn redraw(&mut self) {
        self.state.borrow_mut().redraw();
    }

    /// Restore the snapshot and paint the boundary overlay only.
    pub fn hide_control_point_markers(&mut self) {
        self.state.borrow_mut().render_mask();
    }

    /// Drive the drag state machine directly, for hosts that do not provide an
    /// event source.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.state.borrow_mut().on_pointer(event);
    }

    pub fn execute(&mut self, command: EditorCommand) {
        debug!(command = %command, "executing editor command");
        match command {
            EditorCommand::RenderMask { color, opacity, width } => self.render_mask(&color, opacity, width),
            EditorCommand::ExtractControlPoints { stride } => {
                self.extract_control_points(stride);
            }
            EditorCommand::RenderControlPointMarkers { radius } => self.render_control_point_markers(radius),
            EditorCommand::Redraw => self.redraw(),
            EditorCommand::HideControlPointMarkers => self.hide_control_point_markers(),
        }
    }

    /// Encode the base snapshot with a freshly computed boundary overlay.
    ///
    /// The composite is rebuilt rather than read from the surface, so markers
    /// shown on screen are never part of the export.
    pub async fn export_composite(&self, mime_type: &str) -> Result<Vec<u8>> {
        let format = ExportFormat::from_mime(mime_type)?;
        let composite = self.state.borrow().mask_frame();
        let encoder = Arc::clone(&self.encoder);

        let bytes = tokio::task::spawn_blocking(move || encoder.encode(&composite, format))
            .await
            .map_err(|e| ContourError::EncodingFailed(e.to_string()))??;
        debug!(format = %format, bytes = bytes.len(), "composite exported");
        Ok(bytes)
    }

    /// Release the pointer bindings. The session stays usable through the
    /// direct API.
    pub fn dispose(&mut self) {
        self.remove_event_listeners();
        info!("contour editor session disposed");
    }

    pub fn control_points(&self) -> Vec<ControlPoint> {
        self.state.borrow().interaction.points().to_vec()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().interaction.is_dragging()
    }

    pub fn style(&self) -> RenderStyle {
        self.state.borrow().style
    }

    pub fn marker_style(&self) -> MarkerStyle {
        self.state.borrow().markers
    }

    pub fn is_bound(&self) -> bool {
        self.bound_to.is_some()
    }

    /// Pixels currently shown on the surface.
    pub fn surface_pixels(&self) -> RgbaImage {
        self.state.borrow().surface.read_pixels()
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow().surface)
    }

    pub fn snapshot(&self) -> RgbaImage {
        self.state.borrow().snapshot.clone()
    }
}

impl<S: DisplaySurface + 'static> Drop for Editor<S> {
    fn drop(&mut self) {
        self.remove_event_listeners();
    }
}
