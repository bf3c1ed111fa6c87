// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer gestures on the image canvas
//!
//! A press classifies the gesture once, in priority order:
//!
//! 1. a resize handle of the active box
//! 2. the body of the active box
//! 3. the body of any other box, topmost first
//! 4. empty canvas with Cmd/Ctrl held: pan
//! 5. empty canvas: draw a new box
//!
//! The gesture then runs until release or until the pointer leaves the
//! canvas, and the controller is back to `Idle` either way.

use super::handles::{ResizeHandle, hit_test_handle, resize_box};
use super::hit_test::{box_at, drag_origin, drawn_rect};
use super::mouse::{MouseDelegate, MouseEvent};
use super::store::AnnotationStore;
use super::viewport::{CanvasGeometry, ViewPort};
use crate::model::{BoundingBox, EntityId};
use crate::settings::EditorConfig;
use crate::theme::{ColorPalette, CyclingPalette};
use kurbo::{Point, Rect, Size, Vec2};

// ===== Gesture State =====

/// What the current pointer session is doing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// No button held
    Idle,
    /// Rubber-banding a new box, content coordinates
    Drawing { start: Point, current: Point },
    /// Dragging a handle of `id`; `original` is the box at press time
    Resizing {
        id: EntityId,
        handle: ResizeHandle,
        original: Rect,
        start: Point,
    },
    /// Moving `id`; `offset` is pointer minus box origin at press time
    Dragging { id: EntityId, offset: Vec2, size: Size },
    /// Panning the view; `last` is in client pixels
    Panning { last: Point },
}

// ===== CanvasController =====

/// Turns pointer events on the image canvas into box edits
#[derive(Debug, Clone)]
pub struct CanvasController {
    viewport: ViewPort,
    geometry: CanvasGeometry,
    config: EditorConfig,
    gesture: GestureState,
    palette: CyclingPalette,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            viewport: ViewPort::new(),
            geometry: CanvasGeometry::default(),
            config,
            gesture: GestureState::Idle,
            palette: CyclingPalette::new(),
        }
    }

    pub fn viewport(&self) -> &ViewPort {
        &self.viewport
    }

    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Prepare for a freshly loaded image of `canvas_size` pixels.
    ///
    /// Pan and zoom return to identity and any gesture in progress is
    /// abandoned. The caller clears the boxes.
    pub fn reset_for_new_image(&mut self, canvas_size: Size) {
        self.viewport.reset();
        self.geometry = match self.config.display_size {
            Some((width, height)) => CanvasGeometry::displayed(
                canvas_size,
                self.geometry.client_origin,
                Size::new(width, height),
            ),
            None => CanvasGeometry::unscaled(canvas_size),
        };
        self.gesture = GestureState::Idle;
        tracing::debug!(
            "Canvas reset for {}x{} image",
            canvas_size.width,
            canvas_size.height
        );
    }

    /// Where the canvas element is shown on screen (layout changes).
    pub fn set_client_rect(&mut self, origin: Point, size: Size) {
        self.geometry.client_origin = origin;
        self.geometry.client_size = size;
    }

    /// Set the zoom factor, clamped to the configured range.
    pub fn set_zoom(&mut self, scale: f64) {
        self.viewport
            .set_scale(scale, self.config.min_zoom, self.config.max_zoom);
        tracing::debug!("Zoom set to {:.2}", self.viewport.scale);
    }

    /// Client pixels to content coordinates.
    pub fn content_pos(&self, screen: Point) -> Point {
        self.viewport.screen_to_content(&self.geometry, screen)
    }

    /// Cursor to show with the pointer at `screen`.
    ///
    /// `None` while a draw, drag or resize is running: the cursor chosen
    /// at press time stays.
    pub fn cursor_hint(&self, store: &AnnotationStore, screen: Point) -> Option<&'static str> {
        match self.gesture {
            GestureState::Panning { .. } => return Some("grabbing"),
            GestureState::Idle => {}
            _ => return None,
        }

        let pos = self.content_pos(screen);
        if let Some(active) = store.active_box().and_then(|id| store.find_box(id))
            && let Some(handle) = hit_test_handle(active.bounds(), pos, self.config.handle_size)
        {
            return Some(handle.cursor());
        }
        if box_at(store.boxes(), pos).is_some() {
            Some("move")
        } else {
            Some("crosshair")
        }
    }

    fn begin_drag(&mut self, target: &BoundingBox, pos: Point, store: &mut AnnotationStore) {
        let (id, offset, size) = (
            target.id,
            pos - target.origin(),
            Size::new(target.width, target.height),
        );
        store.handle_box_select(Some(id));
        self.gesture = GestureState::Dragging { id, offset, size };
        tracing::debug!("Drag began on box {}", id);
    }

    /// End the gesture, committing a draw that cleared the threshold.
    fn finish(&mut self, store: &mut AnnotationStore) {
        let gesture = std::mem::replace(&mut self.gesture, GestureState::Idle);
        let GestureState::Drawing { start, current } = gesture else {
            return;
        };
        match drawn_rect(start, current, self.config.min_draw_size) {
            Some(rect) => {
                let id = store.add_box(BoundingBox::new(rect, self.palette.next_color()));
                store.handle_box_select(Some(id));
            }
            None => tracing::debug!("Draw gesture below threshold, no box"),
        }
    }
}

// ===== MouseDelegate Implementation =====

impl MouseDelegate for CanvasController {
    type Data = AnnotationStore;

    fn pointer_down(&mut self, event: MouseEvent, store: &mut AnnotationStore) {
        let pos = self.content_pos(event.pos);

        if let Some(active) = store.active_box().and_then(|id| store.find_box(id)).cloned() {
            if let Some(handle) = hit_test_handle(active.bounds(), pos, self.config.handle_size) {
                self.gesture = GestureState::Resizing {
                    id: active.id,
                    handle,
                    original: active.bounds(),
                    start: pos,
                };
                tracing::debug!("Resize began on box {} via {}", active.id, handle.name());
                return;
            }
            if active.contains(pos) {
                self.begin_drag(&active, pos, store);
                return;
            }
        }

        if let Some(hit) = box_at(store.boxes(), pos).cloned() {
            self.begin_drag(&hit, pos, store);
            return;
        }

        if event.mods.pan() {
            self.gesture = GestureState::Panning { last: event.pos };
            return;
        }

        self.gesture = GestureState::Drawing {
            start: pos,
            current: pos,
        };
    }

    fn pointer_move(&mut self, event: MouseEvent, store: &mut AnnotationStore) {
        let pos = self.content_pos(event.pos);

        match self.gesture {
            GestureState::Idle => {}
            GestureState::Drawing { start, .. } => {
                self.gesture = GestureState::Drawing {
                    start,
                    current: pos,
                };
            }
            GestureState::Panning { last } => {
                self.viewport
                    .pan_by((event.pos - last) * self.config.pan_speed);
                self.gesture = GestureState::Panning { last: event.pos };
            }
            GestureState::Dragging { id, offset, size } => {
                let limits = self.viewport.content_limits(self.geometry.canvas_size);
                let origin = drag_origin(pos, offset, size, limits);
                store.set_box_bounds(id, Rect::from_origin_size(origin, size));
            }
            GestureState::Resizing {
                id,
                handle,
                original,
                start,
            } => match resize_box(original, handle, pos - start, self.config.min_box_size) {
                Some(rect) => {
                    store.set_box_bounds(id, rect);
                }
                None => tracing::debug!("Resize candidate below minimum size, skipped"),
            },
        }
    }

    fn pointer_up(&mut self, event: MouseEvent, store: &mut AnnotationStore) {
        if let GestureState::Drawing { start, .. } = self.gesture {
            self.gesture = GestureState::Drawing {
                start,
                current: self.content_pos(event.pos),
            };
        }
        self.finish(store);
    }

    fn pointer_leave(&mut self, store: &mut AnnotationStore) {
        self.finish(store);
    }
}
