// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Resize handles for the active box.
//!
//! Each box has eight square handles of a fixed content-space size, centred
//! on its corners and edge midpoints. A handle edits only the edges it
//! touches.

use kurbo::{Point, Rect, Size, Vec2};

// ============================================================================
// RESIZE HANDLE
// ============================================================================

/// Which handle the user is dragging for resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    // Corners move two edges
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    // Sides move one edge
    Top,
    Bottom,
    Left,
    Right,
}

impl ResizeHandle {
    /// All handles in hit-test order.
    pub const ALL: [ResizeHandle; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
    ];

    /// Compass name of the handle (`nw`, `n`, ...)
    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "nw",
            Self::TopRight => "ne",
            Self::BottomLeft => "sw",
            Self::BottomRight => "se",
            Self::Top => "n",
            Self::Bottom => "s",
            Self::Left => "w",
            Self::Right => "e",
        }
    }

    /// CSS cursor shown while hovering the handle
    pub fn cursor(self) -> &'static str {
        match self {
            Self::TopLeft => "nw-resize",
            Self::TopRight => "ne-resize",
            Self::BottomLeft => "sw-resize",
            Self::BottomRight => "se-resize",
            Self::Top => "n-resize",
            Self::Bottom => "s-resize",
            Self::Left => "w-resize",
            Self::Right => "e-resize",
        }
    }

    /// Centre of this handle on `bounds`.
    pub fn center(self, bounds: Rect) -> Point {
        let cx = bounds.x0 + bounds.width() / 2.0;
        let cy = bounds.y0 + bounds.height() / 2.0;
        match self {
            Self::TopLeft => Point::new(bounds.x0, bounds.y0),
            Self::TopRight => Point::new(bounds.x1, bounds.y0),
            Self::BottomLeft => Point::new(bounds.x0, bounds.y1),
            Self::BottomRight => Point::new(bounds.x1, bounds.y1),
            Self::Top => Point::new(cx, bounds.y0),
            Self::Bottom => Point::new(cx, bounds.y1),
            Self::Left => Point::new(bounds.x0, cy),
            Self::Right => Point::new(bounds.x1, cy),
        }
    }

    /// Square hit region of this handle on `bounds`.
    pub fn rect(self, bounds: Rect, handle_size: f64) -> Rect {
        Rect::from_center_size(self.center(bounds), Size::new(handle_size, handle_size))
    }

    /// Apply a pointer delta (measured from the start of the gesture) to
    /// the box as it was when the gesture began.
    ///
    /// The result is not normalized: moving an edge past its opposite
    /// yields a negative extent, which [`resize_box`] rejects.
    pub fn apply(self, original: Rect, delta: Vec2) -> Rect {
        let (mut x0, mut y0, mut x1, mut y1) = (original.x0, original.y0, original.x1, original.y1);
        match self {
            Self::TopLeft => {
                x0 += delta.x;
                y0 += delta.y;
            }
            Self::TopRight => {
                x1 += delta.x;
                y0 += delta.y;
            }
            Self::BottomLeft => {
                x0 += delta.x;
                y1 += delta.y;
            }
            Self::BottomRight => {
                x1 += delta.x;
                y1 += delta.y;
            }
            Self::Top => y0 += delta.y,
            Self::Bottom => y1 += delta.y,
            Self::Left => x0 += delta.x,
            Self::Right => x1 += delta.x,
        }
        Rect::new(x0, y0, x1, y1)
    }
}

// ============================================================================
// HIT TESTING
// ============================================================================

/// Handle of `bounds` under `point`, if any.
///
/// Regions are inclusive on every edge. Where two regions overlap (small
/// boxes) the first handle in [`ResizeHandle::ALL`] wins.
pub fn hit_test_handle(bounds: Rect, point: Point, handle_size: f64) -> Option<ResizeHandle> {
    ResizeHandle::ALL.into_iter().find(|handle| {
        let r = handle.rect(bounds, handle_size);
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    })
}

/// Resize candidate for one pointer-move frame.
///
/// `None` means the candidate is at or below `min_size` on some axis and
/// must be discarded; the box keeps its last accepted geometry.
pub fn resize_box(original: Rect, handle: ResizeHandle, delta: Vec2, min_size: f64) -> Option<Rect> {
    let candidate = handle.apply(original, delta);
    if candidate.width() > min_size && candidate.height() > min_size {
        Some(candidate)
    } else {
        None
    }
}
