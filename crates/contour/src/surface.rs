use std::{cell::RefCell, fmt, rc::Rc};

use image::RgbaImage;

use crate::{
    interaction::{PointerEvent, PointerEventKind},
    traits::DisplaySurface,
};

/// A registered pointer callback. Listeners are identified by the `Rc`
/// allocation, so the same handle must be used to add and remove one.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent)>;

/// Listener registry for one surface's pointer events.
///
/// Cloning yields another handle to the same registry, so the host keeps one
/// clone to dispatch events while the surface hands out others for binding.
#[derive(Clone, Default)]
pub struct PointerEventSource {
    listeners: Rc<RefCell<Vec<(PointerEventKind, PointerHandler)>>>,
}

impl PointerEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`. Registering the same handler twice for
    /// the same kind is a no-op and returns `false`.
    pub fn add_listener(&self, kind: PointerEventKind, handler: &PointerHandler) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        if listeners.iter().any(|(k, h)| *k == kind && Rc::ptr_eq(h, handler)) {
            return false;
        }
        listeners.push((kind, Rc::clone(handler)));
        true
    }

    /// Remove a previously registered handler. Returns `false` if it was not
    /// registered.
    pub fn remove_listener(&self, kind: PointerEventKind, handler: &PointerHandler) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(k, h)| !(*k == kind && Rc::ptr_eq(h, handler)));
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, kind: PointerEventKind) -> usize {
        self.listeners.borrow().iter().filter(|(k, _)| *k == kind).count()
    }

    /// Invoke every handler registered for the event's kind, in registration
    /// order. Returns the number of handlers called.
    ///
    /// Handlers run against a snapshot of the registry, so they may add or
    /// remove listeners without affecting the current dispatch.
    pub fn dispatch(&self, event: &PointerEvent) -> usize {
        let handlers: Vec<PointerHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _)| *k == event.kind)
            .map(|(_, h)| Rc::clone(h))
            .collect();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }
}

impl fmt::Debug for PointerEventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerEventSource")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// In-memory RGBA surface, optionally wired to a pointer event source.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    pixels: RgbaImage,
    events: Option<PointerEventSource>,
}

impl CanvasSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels, events: None }
    }

    pub fn with_event_source(mut self, events: PointerEventSource) -> Self {
        self.events = Some(events);
        self
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl DisplaySurface for CanvasSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn read_pixels(&self) -> RgbaImage {
        self.pixels.clone()
    }

    fn write_pixels(&mut self, pixels: &RgbaImage) {
        self.pixels.clone_from(pixels);
    }

    fn event_source(&self) -> Option<PointerEventSource> {
        self.events.clone()
    }
}
