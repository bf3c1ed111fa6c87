// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Viewport transformation between screen and content coordinates
//!
//! Painting applies `translate(pan)` and then `scale(s)` to content
//! coordinates. Pointer positions arrive in client (CSS) pixels of the
//! canvas element, which may be displayed at a different size than its
//! backing store. The inverse therefore runs three steps in this exact
//! order:
//!
//! 1. client pixels to canvas pixels, via the display-to-backing ratio
//! 2. subtract the pan offset
//! 3. divide by the scale

use kurbo::{Affine, Point, Size, Vec2};

/// Pan and zoom state of the image canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPort {
    /// Translation applied before scaling, in canvas pixels
    pub pan: Vec2,
    /// Zoom factor (1.0 = natural size)
    pub scale: f64,
}

impl Default for ViewPort {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewPort {
    pub fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }

    /// Back to identity (no pan, natural size)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Set the zoom factor, clamped to `[min, max]`.
    ///
    /// A non-finite factor leaves the zoom unchanged.
    pub fn set_scale(&mut self, scale: f64, min: f64, max: f64) {
        if !scale.is_finite() {
            return;
        }
        self.scale = scale.max(min).min(max);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Paint-time transform from content to canvas pixels.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Client pixels to content coordinates.
    pub fn screen_to_content(&self, geometry: &CanvasGeometry, screen: Point) -> Point {
        let canvas = geometry.client_to_canvas(screen);
        Point::new(
            (canvas.x - self.pan.x) / self.scale,
            (canvas.y - self.pan.y) / self.scale,
        )
    }

    /// Content coordinates to client pixels.
    pub fn content_to_screen(&self, geometry: &CanvasGeometry, content: Point) -> Point {
        geometry.canvas_to_client(self.transform() * content)
    }

    /// Content-space extent of the canvas at the current zoom.
    ///
    /// Dragged boxes are kept inside `[0, width] x [0, height]`. `None`
    /// while the canvas has no area, before any image is shown.
    pub fn content_limits(&self, canvas_size: Size) -> Option<Size> {
        if canvas_size.width <= 0.0 || canvas_size.height <= 0.0 {
            return None;
        }
        Some(Size::new(
            canvas_size.width / self.scale,
            canvas_size.height / self.scale,
        ))
    }
}

// ============================================================================
// CANVAS GEOMETRY
// ============================================================================

/// Where the canvas element sits on screen and how big its backing store is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Top-left corner of the element in client pixels
    pub client_origin: Point,
    /// Displayed size of the element in client pixels
    pub client_size: Size,
    /// Backing store size in canvas pixels (the image's natural size)
    pub canvas_size: Size,
}

impl CanvasGeometry {
    /// A canvas displayed 1:1 at the client origin.
    pub fn unscaled(canvas_size: Size) -> Self {
        Self {
            client_origin: Point::ORIGIN,
            client_size: canvas_size,
            canvas_size,
        }
    }

    /// A canvas displayed at `client_size`, which may differ from the backing store.
    pub fn displayed(canvas_size: Size, client_origin: Point, client_size: Size) -> Self {
        Self {
            client_origin,
            client_size,
            canvas_size,
        }
    }

    /// Canvas pixels per client pixel on each axis.
    ///
    /// A zero-sized element maps 1:1 rather than dividing by zero.
    pub fn pixel_ratio(&self) -> Vec2 {
        let ratio = |canvas: f64, client: f64| {
            if client > 0.0 { canvas / client } else { 1.0 }
        };
        Vec2::new(
            ratio(self.canvas_size.width, self.client_size.width),
            ratio(self.canvas_size.height, self.client_size.height),
        )
    }

    pub fn client_to_canvas(&self, client: Point) -> Point {
        let ratio = self.pixel_ratio();
        Point::new(
            (client.x - self.client_origin.x) * ratio.x,
            (client.y - self.client_origin.y) * ratio.y,
        )
    }

    pub fn canvas_to_client(&self, canvas: Point) -> Point {
        let ratio = self.pixel_ratio();
        Point::new(
            canvas.x / ratio.x + self.client_origin.x,
            canvas.y / ratio.y + self.client_origin.y,
        )
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self::unscaled(Size::ZERO)
    }
}
