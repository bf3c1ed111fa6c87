// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Annotation store - owns both entity collections and the selection
//!
//! Every mutation that changes a collection swaps in a new `Arc`, so a
//! consumer holding the previous `Arc` can detect the change with
//! `Arc::ptr_eq`. Operations that end up changing nothing keep the old
//! identity.

mod linking;
mod text_editing;

pub use linking::{ColorSource, LINK_COLOR_SOURCE};
pub use text_editing::HighlightMode;

use super::selection::Selection;
use crate::model::{BoundingBox, EntityId, ExportDocument, TextHighlight};
use crate::settings;
use chrono::{DateTime, Utc};
use kurbo::Rect;
use std::sync::Arc;

/// Text the annotator starts with before the user loads or types anything.
pub const SAMPLE_TEXT: &str = "One human is playing ball, while another is watching. \
The ball is bright red and bouncing high in the air. In the background, there's a tree \
providing shade on this sunny day. A small dog is sitting nearby, observing the game \
with curiosity.";

/// Boxes, highlights, the text they annotate, and the active selection
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    /// Boxes in creation order (later boxes paint on top)
    boxes: Arc<Vec<BoundingBox>>,

    /// Highlights in creation order
    highlights: Arc<Vec<TextHighlight>>,

    /// Active box and active highlight
    selection: Selection,

    /// Link an unlinked selection to the active unlinked partner
    auto_link: bool,

    /// When true the text is being edited and selections do not create
    /// highlights
    edit_mode: bool,

    /// What a text selection does to the highlights
    highlight_mode: HighlightMode,

    /// The annotated text
    text: String,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new(SAMPLE_TEXT)
    }
}

impl AnnotationStore {
    /// Create an empty store over `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            boxes: Arc::new(Vec::new()),
            highlights: Arc::new(Vec::new()),
            selection: Selection::new(),
            auto_link: settings::linking::AUTO_LINK_DEFAULT,
            edit_mode: false,
            highlight_mode: HighlightMode::Create,
            text: text.into(),
        }
    }

    // ===== ACCESSORS =====

    pub fn boxes(&self) -> &Arc<Vec<BoundingBox>> {
        &self.boxes
    }

    pub fn highlights(&self) -> &Arc<Vec<TextHighlight>> {
        &self.highlights
    }

    pub fn find_box(&self, id: EntityId) -> Option<&BoundingBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn find_highlight(&self, id: EntityId) -> Option<&TextHighlight> {
        self.highlights.iter().find(|h| h.id == id)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn active_box(&self) -> Option<EntityId> {
        self.selection.active_box()
    }

    pub fn active_highlight(&self) -> Option<EntityId> {
        self.selection.active_highlight()
    }

    pub fn auto_link(&self) -> bool {
        self.auto_link
    }

    pub fn set_auto_link(&mut self, auto_link: bool) {
        self.auto_link = auto_link;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
        tracing::debug!("Edit mode: {}", self.edit_mode);
    }

    // ===== SELECTION =====

    /// Select a box (or clear the box selection with `None`).
    ///
    /// A linked box pulls its highlight into the selection. An unlinked box
    /// links to the active highlight when auto-link is on and that
    /// highlight is free; otherwise the highlight selection is cleared so
    /// the two panels never show an unrelated pair.
    pub fn handle_box_select(&mut self, box_id: Option<EntityId>) {
        let Some(box_id) = box_id else {
            self.selection.set_active_box(None);
            return;
        };
        let Some(text_ref) = self.find_box(box_id).map(|b| b.text_ref) else {
            tracing::debug!("Ignoring selection of unknown box {}", box_id);
            return;
        };

        self.selection.set_active_box(Some(box_id));

        if let Some(highlight_id) = text_ref {
            self.set_active_highlight(Some(highlight_id));
            return;
        }

        if self.auto_link
            && let Some(highlight_id) = self.active_highlight()
            && self
                .find_highlight(highlight_id)
                .is_some_and(|h| h.box_ref.is_none())
        {
            self.link(box_id, highlight_id);
            return;
        }

        self.set_active_highlight(None);
    }

    /// Select a highlight (or clear the highlight selection with `None`).
    ///
    /// Mirror of [`handle_box_select`](Self::handle_box_select).
    pub fn handle_highlight_select(&mut self, highlight_id: Option<EntityId>) {
        let Some(highlight_id) = highlight_id else {
            self.set_active_highlight(None);
            return;
        };
        let Some(box_ref) = self.find_highlight(highlight_id).map(|h| h.box_ref) else {
            tracing::debug!("Ignoring selection of unknown highlight {}", highlight_id);
            return;
        };

        self.set_active_highlight(Some(highlight_id));

        if let Some(box_id) = box_ref {
            self.selection.set_active_box(Some(box_id));
            return;
        }

        if self.auto_link
            && let Some(box_id) = self.active_box()
            && self.find_box(box_id).is_some_and(|b| b.text_ref.is_none())
        {
            self.link(box_id, highlight_id);
            return;
        }

        self.selection.set_active_box(None);
    }

    /// Every highlight change of the selection leaves extend/reduce mode.
    fn set_active_highlight(&mut self, id: Option<EntityId>) {
        if self.selection.active_highlight() != id {
            self.highlight_mode = HighlightMode::Create;
        }
        self.selection.set_active_highlight(id);
    }

    /// Drop the highlight pointer if it names `id`.
    pub(super) fn forget_highlight(&mut self, id: EntityId) {
        if self.selection.active_highlight() == Some(id) {
            self.highlight_mode = HighlightMode::Create;
        }
        self.selection.forget_highlight(id);
    }

    // ===== BOXES =====

    /// Append a box; it becomes the topmost one.
    pub fn add_box(&mut self, bounding_box: BoundingBox) -> EntityId {
        let id = bounding_box.id;
        let mut boxes = (*self.boxes).clone();
        boxes.push(bounding_box);
        self.boxes = Arc::new(boxes);
        tracing::debug!("Added box {}", id);
        id
    }

    /// Replace a box's geometry. Returns false for an unknown id or when the
    /// geometry is unchanged.
    pub fn set_box_bounds(&mut self, id: EntityId, bounds: Rect) -> bool {
        let Some(index) = self.boxes.iter().position(|b| b.id == id) else {
            return false;
        };
        if self.boxes[index].bounds() == bounds {
            return false;
        }
        let mut boxes = (*self.boxes).clone();
        boxes[index] = boxes[index].with_bounds(bounds);
        self.boxes = Arc::new(boxes);
        true
    }

    /// Delete the active box, if any.
    pub fn delete_active_box(&mut self) {
        if let Some(id) = self.active_box() {
            self.delete_box(id);
        }
    }

    /// Remove every box, e.g. when a new image replaces the old one.
    ///
    /// Highlights survive but lose their box reference.
    pub fn clear_boxes(&mut self) {
        if !self.boxes.is_empty() {
            self.boxes = Arc::new(Vec::new());
        }
        if self.highlights.iter().any(|h| h.box_ref.is_some()) {
            let highlights = self
                .highlights
                .iter()
                .map(|h| TextHighlight {
                    box_ref: None,
                    ..h.clone()
                })
                .collect();
            self.highlights = Arc::new(highlights);
        }
        self.selection.set_active_box(None);
    }

    // ===== WHOLE STORE =====

    /// Remove all boxes and highlights and clear the selection.
    pub fn clear_annotations(&mut self) {
        self.boxes = Arc::new(Vec::new());
        self.highlights = Arc::new(Vec::new());
        self.selection.clear();
        self.highlight_mode = HighlightMode::Create;
    }

    /// Snapshot for export, stamped with `now`.
    pub fn export_document(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument {
            boxes: (*self.boxes).clone(),
            highlights: (*self.highlights).clone(),
            text: self.text.clone(),
            exported_at: None,
        }
        .stamped(now)
    }

    /// Check the link symmetry, one-to-one and selection invariants.
    pub fn is_consistent(&self) -> bool {
        let boxes_ok = self.boxes.iter().all(|b| match b.text_ref {
            Some(h) => self
                .find_highlight(h)
                .is_some_and(|h| h.box_ref == Some(b.id) && h.color == b.color),
            None => true,
        });
        let highlights_ok = self.highlights.iter().all(|h| match h.box_ref {
            Some(b) => self.find_box(b).is_some_and(|b| b.text_ref == Some(h.id)),
            None => true,
        });
        let selection_ok = self.active_box().is_none_or(|id| self.find_box(id).is_some())
            && self
                .active_highlight()
                .is_none_or(|id| self.find_highlight(id).is_some());
        boxes_ok && highlights_ok && selection_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn store_with(boxes: usize, highlights: usize) -> (AnnotationStore, Vec<EntityId>, Vec<EntityId>) {
        let mut store = AnnotationStore::new("The ball is bright red and bouncing high.");
        let colors = ["#FF5733", "#33FF57", "#3357FF", "#FF33F5"];
        let box_ids = (0..boxes)
            .map(|i| {
                let x = i as f64 * 30.0;
                store.add_box(BoundingBox::new(
                    Rect::new(x, 0.0, x + 20.0, 20.0),
                    colors[i % colors.len()],
                ))
            })
            .collect();
        let text = store.text().to_string();
        let highlight_ids = (0..highlights)
            .map(|i| {
                let start = i * 5;
                store.add_highlight(TextHighlight::new(
                    &text,
                    start,
                    start + 4,
                    colors[(i + 2) % colors.len()],
                ))
            })
            .collect();
        (store, box_ids, highlight_ids)
    }

    #[test]
    fn linked_box_selection_pulls_in_highlight() {
        let (mut store, b, h) = store_with(1, 2);
        store.link(b[0], h[1]);
        store.handle_highlight_select(Some(h[0]));
        store.handle_box_select(Some(b[0]));
        assert_eq!(store.active_box(), Some(b[0]));
        assert_eq!(store.active_highlight(), Some(h[1]));
    }

    #[test]
    fn auto_link_on_box_select() {
        let (mut store, b, h) = store_with(1, 1);
        store.handle_highlight_select(Some(h[0]));
        store.handle_box_select(Some(b[0]));

        let linked_box = store.find_box(b[0]).unwrap();
        assert_eq!(linked_box.text_ref, Some(h[0]));
        assert_eq!(store.find_highlight(h[0]).unwrap().box_ref, Some(b[0]));
        assert_eq!(store.active_highlight(), Some(h[0]));
        assert!(store.is_consistent());
    }

    #[test]
    fn auto_link_on_highlight_select() {
        let (mut store, b, h) = store_with(1, 1);
        store.handle_box_select(Some(b[0]));
        store.handle_highlight_select(Some(h[0]));
        assert_eq!(store.find_box(b[0]).unwrap().text_ref, Some(h[0]));
        assert_eq!(store.active_box(), Some(b[0]));
    }

    #[test]
    fn unmatched_selection_clears_other_side_without_auto_link() {
        let (mut store, b, h) = store_with(1, 1);
        store.set_auto_link(false);
        store.handle_highlight_select(Some(h[0]));
        store.handle_box_select(Some(b[0]));
        assert_eq!(store.active_box(), Some(b[0]));
        assert_eq!(store.active_highlight(), None);
        assert_eq!(store.find_box(b[0]).unwrap().text_ref, None);
    }

    #[test]
    fn auto_link_skips_already_linked_partner() {
        let (mut store, b, h) = store_with(2, 1);
        store.link(b[0], h[0]);
        store.handle_highlight_select(Some(h[0]));
        // h[0] is taken, selecting the free box must not steal it
        store.handle_box_select(Some(b[1]));
        assert_eq!(store.find_box(b[1]).unwrap().text_ref, None);
        assert_eq!(store.find_highlight(h[0]).unwrap().box_ref, Some(b[0]));
        assert_eq!(store.active_highlight(), None);
    }

    #[test]
    fn deselect_leaves_other_pointer() {
        let (mut store, b, h) = store_with(1, 1);
        store.set_auto_link(false);
        store.handle_box_select(Some(b[0]));
        store.handle_highlight_select(Some(h[0]));
        assert_eq!(store.active_box(), None);

        store.handle_box_select(Some(b[0]));
        store.handle_box_select(None);
        assert_eq!(store.active_box(), None);
        assert_eq!(store.active_highlight(), None);

        store.handle_highlight_select(Some(h[0]));
        store.handle_box_select(None);
        assert_eq!(store.active_highlight(), Some(h[0]));
    }

    #[test]
    fn selecting_unknown_id_is_noop() {
        let (mut store, b, _) = store_with(1, 0);
        store.handle_box_select(Some(b[0]));
        store.handle_box_select(Some(EntityId::next()));
        assert_eq!(store.active_box(), Some(b[0]));
        store.handle_highlight_select(Some(EntityId::next()));
        assert_eq!(store.active_highlight(), None);
        assert!(store.is_consistent());
    }

    #[test]
    fn mutation_swaps_collection_identity() {
        let (mut store, b, _) = store_with(1, 0);
        let before = Arc::clone(store.boxes());
        assert!(store.set_box_bounds(b[0], Rect::new(1.0, 1.0, 40.0, 40.0)));
        assert!(!Arc::ptr_eq(&before, store.boxes()));
        assert_eq!(before[0].x, 0.0);

        let unchanged = Arc::clone(store.boxes());
        assert!(!store.set_box_bounds(b[0], Rect::new(1.0, 1.0, 40.0, 40.0)));
        assert!(!store.set_box_bounds(EntityId::next(), Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(Arc::ptr_eq(&unchanged, store.boxes()));
    }

    #[test]
    fn clear_boxes_releases_highlights() {
        let (mut store, b, h) = store_with(1, 1);
        store.link(b[0], h[0]);
        store.handle_box_select(Some(b[0]));
        store.clear_boxes();
        assert!(store.boxes().is_empty());
        assert_eq!(store.find_highlight(h[0]).unwrap().box_ref, None);
        assert_eq!(store.active_box(), None);
        assert_eq!(store.active_highlight(), Some(h[0]));
        assert!(store.is_consistent());
    }

    #[test]
    fn clear_annotations_empties_everything() {
        let (mut store, b, h) = store_with(2, 2);
        store.link(b[0], h[0]);
        store.handle_box_select(Some(b[0]));
        store.clear_annotations();
        assert!(store.boxes().is_empty());
        assert!(store.highlights().is_empty());
        assert_eq!(store.selection(), Selection::new());
    }

    #[test]
    fn export_contains_links_and_timestamp() {
        use chrono::TimeZone;

        let (mut store, b, h) = store_with(1, 1);
        store.link(b[0], h[0]);
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let json = serde_json::to_value(store.export_document(now)).unwrap();
        assert_eq!(json["boxes"][0]["textRef"], h[0].to_string());
        assert_eq!(json["highlights"][0]["boxRef"], b[0].to_string());
        assert_eq!(json["text"], store.text());
        assert_eq!(json["exportedAt"], "2025-01-02T03:04:05.000Z");
    }
}
