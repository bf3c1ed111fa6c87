// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Link, unlink and delete for AnnotationStore
//!
//! A link is a pair of mutual references: `box.text_ref == Some(h)` exactly
//! when `highlight[h].box_ref == Some(box)`. Each operation computes both new
//! collections first and commits them together, so the two sides are never
//! observed out of step.

use super::AnnotationStore;
use crate::error::LinkError;
use crate::model::{BoundingBox, EntityId, TextHighlight};
use std::sync::Arc;

// ============================================================================
// COLOR RULE
// ============================================================================

/// Which side's color both partners take when they are linked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSource {
    Box,
    Highlight,
}

/// The highlight's color wins: linking repaints the box, never the text.
pub const LINK_COLOR_SOURCE: ColorSource = ColorSource::Highlight;

fn shared_color(bounding_box: &BoundingBox, highlight: &TextHighlight) -> String {
    match LINK_COLOR_SOURCE {
        ColorSource::Box => bounding_box.color.clone(),
        ColorSource::Highlight => highlight.color.clone(),
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

impl AnnotationStore {
    /// Link a box and a highlight, breaking any link either one had.
    pub fn try_link(&mut self, box_id: EntityId, highlight_id: EntityId) -> Result<(), LinkError> {
        let bounding_box = self.find_box(box_id).ok_or(LinkError::UnknownBox(box_id))?;
        let highlight = self
            .find_highlight(highlight_id)
            .ok_or(LinkError::UnknownHighlight(highlight_id))?;
        let color = shared_color(bounding_box, highlight);

        let boxes = self
            .boxes
            .iter()
            .map(|b| {
                if b.id == box_id {
                    BoundingBox {
                        text_ref: Some(highlight_id),
                        color: color.clone(),
                        ..b.clone()
                    }
                } else if b.text_ref == Some(highlight_id) {
                    BoundingBox {
                        text_ref: None,
                        ..b.clone()
                    }
                } else {
                    b.clone()
                }
            })
            .collect();

        let highlights = self
            .highlights
            .iter()
            .map(|h| {
                if h.id == highlight_id {
                    TextHighlight {
                        box_ref: Some(box_id),
                        color: color.clone(),
                        ..h.clone()
                    }
                } else if h.box_ref == Some(box_id) {
                    TextHighlight {
                        box_ref: None,
                        ..h.clone()
                    }
                } else {
                    h.clone()
                }
            })
            .collect();

        self.boxes = Arc::new(boxes);
        self.highlights = Arc::new(highlights);
        tracing::debug!("Linked box {} <-> highlight {}", box_id, highlight_id);
        Ok(())
    }

    /// Link a box and a highlight; unknown ids are ignored.
    pub fn link(&mut self, box_id: EntityId, highlight_id: EntityId) {
        if let Err(e) = self.try_link(box_id, highlight_id) {
            tracing::debug!("link ignored: {}", e);
        }
    }

    /// Link the active box to the active highlight.
    pub fn try_link_active(&mut self) -> Result<(), LinkError> {
        let box_id = self.active_box().ok_or(LinkError::MissingId)?;
        let highlight_id = self.active_highlight().ok_or(LinkError::MissingId)?;
        self.try_link(box_id, highlight_id)
    }

    /// Link the active pair; does nothing unless both sides are selected.
    pub fn link_active(&mut self) {
        if let Err(e) = self.try_link_active() {
            tracing::debug!("link_active ignored: {}", e);
        }
    }

    /// Remove the link between a box and a highlight.
    ///
    /// Fails unless the two currently point at each other. Colors are left
    /// as they are.
    pub fn try_unlink(&mut self, box_id: EntityId, highlight_id: EntityId) -> Result<(), LinkError> {
        let bounding_box = self.find_box(box_id).ok_or(LinkError::UnknownBox(box_id))?;
        let highlight = self
            .find_highlight(highlight_id)
            .ok_or(LinkError::UnknownHighlight(highlight_id))?;
        if bounding_box.text_ref != Some(highlight_id) || highlight.box_ref != Some(box_id) {
            return Err(LinkError::NotLinked {
                box_id,
                highlight_id,
            });
        }

        let boxes = self
            .boxes
            .iter()
            .map(|b| {
                if b.id == box_id {
                    BoundingBox {
                        text_ref: None,
                        ..b.clone()
                    }
                } else {
                    b.clone()
                }
            })
            .collect();
        let highlights = self
            .highlights
            .iter()
            .map(|h| {
                if h.id == highlight_id {
                    TextHighlight {
                        box_ref: None,
                        ..h.clone()
                    }
                } else {
                    h.clone()
                }
            })
            .collect();

        self.boxes = Arc::new(boxes);
        self.highlights = Arc::new(highlights);
        tracing::debug!("Unlinked box {} from highlight {}", box_id, highlight_id);
        Ok(())
    }

    /// Unlink a box and a highlight; anything but an exact pair is ignored.
    pub fn unlink(&mut self, box_id: EntityId, highlight_id: EntityId) {
        if let Err(e) = self.try_unlink(box_id, highlight_id) {
            tracing::debug!("unlink ignored: {}", e);
        }
    }

    /// Unlink a box from whatever highlight it holds and drop the highlight
    /// from the selection (the box list's link button).
    pub fn unlink_box(&mut self, box_id: EntityId) {
        let Some(highlight_id) = self.find_box(box_id).and_then(|b| b.text_ref) else {
            tracing::debug!("unlink_box ignored: box {} has no link", box_id);
            return;
        };
        self.unlink(box_id, highlight_id);
        self.handle_highlight_select(None);
    }

    /// Delete a box. Its highlight, if any, survives unlinked.
    pub fn try_delete_box(&mut self, box_id: EntityId) -> Result<(), LinkError> {
        let text_ref = self
            .find_box(box_id)
            .ok_or(LinkError::UnknownBox(box_id))?
            .text_ref;

        let boxes = self.boxes.iter().filter(|b| b.id != box_id).cloned().collect();
        self.boxes = Arc::new(boxes);

        if text_ref.is_some() || self.highlights.iter().any(|h| h.box_ref == Some(box_id)) {
            let highlights = self
                .highlights
                .iter()
                .map(|h| {
                    if h.box_ref == Some(box_id) {
                        TextHighlight {
                            box_ref: None,
                            ..h.clone()
                        }
                    } else {
                        h.clone()
                    }
                })
                .collect();
            self.highlights = Arc::new(highlights);
        }

        self.selection.forget_box(box_id);
        tracing::debug!("Deleted box {}", box_id);
        Ok(())
    }

    pub fn delete_box(&mut self, box_id: EntityId) {
        if let Err(e) = self.try_delete_box(box_id) {
            tracing::debug!("delete ignored: {}", e);
        }
    }

    /// Delete a highlight. Its box, if any, survives unlinked.
    pub fn try_delete_highlight(&mut self, highlight_id: EntityId) -> Result<(), LinkError> {
        if self.find_highlight(highlight_id).is_none() {
            return Err(LinkError::UnknownHighlight(highlight_id));
        }

        let highlights = self
            .highlights
            .iter()
            .filter(|h| h.id != highlight_id)
            .cloned()
            .collect();
        self.highlights = Arc::new(highlights);
        self.release_boxes(&[highlight_id]);
        self.forget_highlight(highlight_id);
        tracing::debug!("Deleted highlight {}", highlight_id);
        Ok(())
    }

    pub fn delete_highlight(&mut self, highlight_id: EntityId) {
        if let Err(e) = self.try_delete_highlight(highlight_id) {
            tracing::debug!("delete ignored: {}", e);
        }
    }

    /// Clear `text_ref` on every box pointing at one of `highlight_ids`.
    pub(super) fn release_boxes(&mut self, highlight_ids: &[EntityId]) {
        let points_at_removed =
            |b: &BoundingBox| b.text_ref.is_some_and(|h| highlight_ids.contains(&h));
        if !self.boxes.iter().any(points_at_removed) {
            return;
        }
        let boxes = self
            .boxes
            .iter()
            .map(|b| {
                if points_at_removed(b) {
                    BoundingBox {
                        text_ref: None,
                        ..b.clone()
                    }
                } else {
                    b.clone()
                }
            })
            .collect();
        self.boxes = Arc::new(boxes);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::store_with;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn link_sets_both_sides_and_takes_highlight_color() {
        let (mut store, b, h) = store_with(1, 1);
        let highlight_color = store.find_highlight(h[0]).unwrap().color.clone();
        assert_ne!(store.find_box(b[0]).unwrap().color, highlight_color);

        store.try_link(b[0], h[0]).unwrap();
        let linked = store.find_box(b[0]).unwrap();
        assert_eq!(linked.text_ref, Some(h[0]));
        assert_eq!(linked.color, highlight_color);
        assert_eq!(store.find_highlight(h[0]).unwrap().box_ref, Some(b[0]));
        assert_eq!(store.find_highlight(h[0]).unwrap().color, highlight_color);
    }

    #[test]
    fn link_steals_from_previous_partners() {
        let (mut store, b, h) = store_with(2, 2);
        store.link(b[0], h[0]);
        store.link(b[1], h[1]);

        // b0 takes h1: h0 loses b0, b1 loses h1
        store.link(b[0], h[1]);
        assert_eq!(store.find_box(b[0]).unwrap().text_ref, Some(h[1]));
        assert_eq!(store.find_box(b[1]).unwrap().text_ref, None);
        assert_eq!(store.find_highlight(h[0]).unwrap().box_ref, None);
        assert_eq!(store.find_highlight(h[1]).unwrap().box_ref, Some(b[0]));
        assert!(store.is_consistent());
    }

    #[test]
    fn link_with_unknown_id_changes_nothing() {
        let (mut store, b, h) = store_with(1, 1);
        let boxes = Arc::clone(store.boxes());
        let stray = EntityId::next();
        assert_eq!(store.try_link(stray, h[0]), Err(LinkError::UnknownBox(stray)));
        assert_eq!(
            store.try_link(b[0], stray),
            Err(LinkError::UnknownHighlight(stray))
        );
        store.link(b[0], stray);
        assert!(Arc::ptr_eq(&boxes, store.boxes()));
    }

    #[test]
    fn link_active_needs_both_sides() {
        let (mut store, b, h) = store_with(1, 1);
        store.set_auto_link(false);
        assert_eq!(store.try_link_active(), Err(LinkError::MissingId));

        store.handle_box_select(Some(b[0]));
        assert_eq!(store.try_link_active(), Err(LinkError::MissingId));

        store.handle_highlight_select(Some(h[0]));
        // Without auto-link the unmatched highlight cleared the box side
        assert_eq!(store.active_box(), None);
        store.handle_box_select(Some(b[0]));
        store.selection.set_active_highlight(Some(h[0]));
        store.link_active();
        assert_eq!(store.find_box(b[0]).unwrap().text_ref, Some(h[0]));
    }

    #[test]
    fn unlink_requires_exact_pair() {
        let (mut store, b, h) = store_with(2, 2);
        store.link(b[0], h[0]);
        assert_eq!(
            store.try_unlink(b[0], h[1]),
            Err(LinkError::NotLinked {
                box_id: b[0],
                highlight_id: h[1]
            })
        );
        assert!(store.try_unlink(b[1], h[0]).is_err());

        let color = store.find_box(b[0]).unwrap().color.clone();
        store.try_unlink(b[0], h[0]).unwrap();
        let unlinked = store.find_box(b[0]).unwrap();
        assert_eq!(unlinked.text_ref, None);
        assert_eq!(unlinked.color, color);
        assert_eq!(store.find_highlight(h[0]).unwrap().box_ref, None);
    }

    #[test]
    fn unlink_box_clears_active_highlight() {
        let (mut store, b, h) = store_with(1, 1);
        store.handle_highlight_select(Some(h[0]));
        store.handle_box_select(Some(b[0]));
        assert_eq!(store.find_box(b[0]).unwrap().text_ref, Some(h[0]));

        store.unlink_box(b[0]);
        assert_eq!(store.find_box(b[0]).unwrap().text_ref, None);
        assert_eq!(store.active_highlight(), None);
        assert_eq!(store.active_box(), Some(b[0]));
    }

    #[test]
    fn delete_box_cascades_to_partner_only() {
        let (mut store, b, h) = store_with(1, 1);
        store.link(b[0], h[0]);
        store.handle_box_select(Some(b[0]));

        store.try_delete_box(b[0]).unwrap();
        assert!(store.find_box(b[0]).is_none());
        let survivor = store.find_highlight(h[0]).unwrap();
        assert_eq!(survivor.box_ref, None);
        assert_eq!(store.active_box(), None);
        assert_eq!(store.active_highlight(), Some(h[0]));
        assert!(store.is_consistent());
    }

    #[test]
    fn delete_highlight_cascades_to_partner_only() {
        let (mut store, b, h) = store_with(1, 1);
        store.link(b[0], h[0]);
        store.handle_highlight_select(Some(h[0]));

        store.try_delete_highlight(h[0]).unwrap();
        assert!(store.find_highlight(h[0]).is_none());
        assert_eq!(store.find_box(b[0]).unwrap().text_ref, None);
        assert_eq!(store.active_highlight(), None);
        assert!(store.is_consistent());
    }

    #[test]
    fn deleting_active_highlight_leaves_extend_mode() {
        let (mut store, _, h) = store_with(0, 2);
        store.handle_highlight_select(Some(h[0]));
        store.toggle_extend_mode();

        store.delete_highlight(h[1]);
        assert_eq!(store.highlight_mode(), super::super::HighlightMode::Extend);
        assert_eq!(store.active_highlight(), Some(h[0]));

        store.delete_highlight(h[0]);
        assert_eq!(store.highlight_mode(), super::super::HighlightMode::Create);
        assert_eq!(store.active_highlight(), None);
    }

    #[test]
    fn deleting_twice_reports_unknown() {
        let (mut store, b, h) = store_with(1, 1);
        store.delete_box(b[0]);
        assert_eq!(store.try_delete_box(b[0]), Err(LinkError::UnknownBox(b[0])));
        store.delete_highlight(h[0]);
        assert_eq!(
            store.try_delete_highlight(h[0]),
            Err(LinkError::UnknownHighlight(h[0]))
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Link(usize, usize),
        Unlink(usize, usize),
        DeleteBox(usize),
        DeleteHighlight(usize),
        SelectBox(Option<usize>),
        SelectHighlight(Option<usize>),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..5usize, 0..5usize).prop_map(|(b, h)| Op::Link(b, h)),
            (0..5usize, 0..5usize).prop_map(|(b, h)| Op::Unlink(b, h)),
            (0..5usize).prop_map(Op::DeleteBox),
            (0..5usize).prop_map(Op::DeleteHighlight),
            proptest::option::of(0..5usize).prop_map(Op::SelectBox),
            proptest::option::of(0..5usize).prop_map(Op::SelectHighlight),
        ]
    }

    proptest! {
        #[test]
        fn links_stay_symmetric(ops in proptest::collection::vec(op(), 0..60), auto_link in any::<bool>()) {
            let (mut store, b, h) = store_with(5, 5);
            store.set_auto_link(auto_link);
            for op in ops {
                match op {
                    Op::Link(i, j) => store.link(b[i], h[j]),
                    Op::Unlink(i, j) => store.unlink(b[i], h[j]),
                    Op::DeleteBox(i) => store.delete_box(b[i]),
                    Op::DeleteHighlight(j) => store.delete_highlight(h[j]),
                    Op::SelectBox(i) => store.handle_box_select(i.map(|i| b[i])),
                    Op::SelectHighlight(j) => store.handle_highlight_select(j.map(|j| h[j])),
                }
                prop_assert!(store.is_consistent());
            }
        }

        #[test]
        fn link_propagates_highlight_color(i in 0..3usize, j in 0..3usize) {
            let (mut store, b, h) = store_with(3, 3);
            store.link(b[i], h[j]);
            let highlight_color = store.find_highlight(h[j]).unwrap().color.clone();
            prop_assert_eq!(&store.find_box(b[i]).unwrap().color, &highlight_color);
        }
    }
}
