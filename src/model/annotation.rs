// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Boxes over the image and highlights over the text buffer.
//!
//! Both entity kinds carry an optional reference to at most one partner of
//! the other kind. The reference fields are only ever written by the
//! linking code in `editing::store`, which keeps them symmetric.

use super::EntityId;
use kurbo::{Point, Rect};
use serde::Serialize;

// ============================================================================
// BOUNDING BOX
// ============================================================================

/// A rectangular region over the image, in content-space coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Display color, shared with the linked highlight
    pub color: String,
    /// Linked highlight, if any
    pub text_ref: Option<EntityId>,
}

impl BoundingBox {
    /// Create an unlinked box with a fresh id.
    pub fn new(rect: Rect, color: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            color: color.into(),
            text_ref: None,
        }
    }

    /// Bounds as a kurbo rectangle (x0,y0 is the top-left corner).
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Inclusive containment: points on every edge count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Copy of this box with new geometry; id, color and link are kept.
    pub fn with_bounds(&self, rect: Rect) -> Self {
        Self {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            ..self.clone()
        }
    }
}

// ============================================================================
// TEXT HIGHLIGHT
// ============================================================================

/// A character-offset span `[start, end)` over the text buffer.
///
/// Offsets count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextHighlight {
    pub id: EntityId,
    pub start: usize,
    pub end: usize,
    /// Cached `text[start..end]`
    pub text: String,
    pub color: String,
    /// Linked box, if any
    pub box_ref: Option<EntityId>,
}

impl TextHighlight {
    /// Create an unlinked highlight over `text[start..end]` with a fresh id.
    pub fn new(text: &str, start: usize, end: usize, color: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            start,
            end,
            text: char_slice(text, start, end),
            color: color.into(),
            box_ref: None,
        }
    }

    /// Copy of this highlight over a new span, with the cache refreshed.
    pub fn with_span(&self, text: &str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: char_slice(text, start, end),
            ..self.clone()
        }
    }
}

// ============================================================================
// CHAR-INDEXED TEXT HELPERS
// ============================================================================

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// `text[start..end]` in char offsets. Out-of-range bounds are clipped.
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    if end <= start {
        return String::new();
    }
    text.chars().skip(start).take(end - start).collect()
}
