use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, trace};

use crate::types::ControlPoint;

pub const DEFAULT_HIT_THRESHOLD: f32 = 15.0;

#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Leave,
}

/// A pointer event in surface-local display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    pub fn leave(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Leave, x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Index of the selected point in the current point list.
        index: usize,
        /// Pointer position minus the point's display position at grab time.
        offset: [f32; 2],
    },
}

/// Single-pointer drag state machine over the current control points.
#[derive(Debug, Clone)]
pub struct InteractionState {
    points: Vec<ControlPoint>,
    drag: DragState,
    hit_threshold: f32,
}

impl InteractionState {
    pub fn new(hit_threshold: f32) -> Self {
        Self {
            points: Vec::new(),
            drag: DragState::Idle,
            hit_threshold,
        }
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Replace the point list wholesale. Any drag in progress is dropped since
    /// its index refers to the old list.
    pub fn set_points(&mut self, points: Vec<ControlPoint>) {
        self.points = points;
        self.drag = DragState::Idle;
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn selected(&self) -> Option<&ControlPoint> {
        match self.drag {
            DragState::Dragging { index, .. } => self.points.get(index),
            DragState::Idle => None,
        }
    }

    pub fn hit_threshold(&self) -> f32 {
        self.hit_threshold
    }

    /// Index of the point nearest to `(x, y)` strictly within `threshold`.
    /// On equal distances the earliest point in list order wins.
    pub fn find_nearest_point(&self, x: f32, y: f32, threshold: f32) -> Option<usize> {
        let mut nearest = None;
        let mut min_dist = threshold;
        for (i, point) in self.points.iter().enumerate() {
            let dist = point.distance_to(x, y);
            if dist < min_dist {
                min_dist = dist;
                nearest = Some(i);
            }
        }
        nearest
    }

    /// Start dragging the nearest point within the hit threshold. Returns
    /// `true` when a drag started.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        let Some(index) = self.find_nearest_point(x, y, self.hit_threshold) else {
            return false;
        };
        let point = &self.points[index];
        let offset = [x - point.display_x, y - point.display_y];
        debug!(index, grid_x = point.grid_x(), grid_y = point.grid_y(), "drag started");
        self.drag = DragState::Dragging { index, offset };
        true
    }

    /// Move the selected point with the pointer. Returns `true` when a point
    /// moved and the surface needs a redraw.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let DragState::Dragging { index, offset } = self.drag else {
            return false;
        };
        let Some(point) = self.points.get_mut(index) else {
            self.drag = DragState::Idle;
            return false;
        };
        point.display_x = x - offset[0];
        point.display_y = y - offset[1];
        trace!(index, x = point.display_x, y = point.display_y, "drag moved");
        true
    }

    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    pub fn pointer_leave(&mut self) {
        self.end_drag();
    }

    /// Feed an event through the state machine. Returns `true` when a redraw
    /// is needed.
    pub fn handle(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => {
                self.pointer_down(event.x, event.y);
                false
            }
            PointerEventKind::Move => self.pointer_move(event.x, event.y),
            PointerEventKind::Up => {
                self.pointer_up();
                false
            }
            PointerEventKind::Leave => {
                self.pointer_leave();
                false
            }
        }
    }

    fn end_drag(&mut self) {
        if let DragState::Dragging { index, .. } = self.drag {
            debug!(index, "drag ended");
        }
        self.drag = DragState::Idle;
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_THRESHOLD)
    }
}
