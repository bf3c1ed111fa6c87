// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Highlight creation, extend/reduce, and text edits for AnnotationStore

use super::AnnotationStore;
use crate::editing::rebase::rebase_highlights;
use crate::model::annotation::{char_len, char_slice};
use crate::model::{EntityId, TextHighlight};
use crate::theme::ColorPalette;
use std::sync::Arc;

/// What a text selection does in read mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HighlightMode {
    /// Create a new highlight from the selection
    #[default]
    Create,
    /// Grow the active highlight to cover the selection
    Extend,
    /// Trim the selection off either end of the active highlight
    Reduce,
}

impl AnnotationStore {
    pub fn highlight_mode(&self) -> HighlightMode {
        self.highlight_mode
    }

    /// Toggle extend mode. Only meaningful while a highlight is active.
    pub fn toggle_extend_mode(&mut self) {
        if self.active_highlight().is_none() {
            return;
        }
        self.highlight_mode = match self.highlight_mode {
            HighlightMode::Extend => HighlightMode::Create,
            _ => HighlightMode::Extend,
        };
    }

    /// Toggle reduce mode. Only meaningful while a highlight is active.
    pub fn toggle_reduce_mode(&mut self) {
        if self.active_highlight().is_none() {
            return;
        }
        self.highlight_mode = match self.highlight_mode {
            HighlightMode::Reduce => HighlightMode::Create,
            _ => HighlightMode::Reduce,
        };
    }

    /// Append a highlight.
    pub fn add_highlight(&mut self, highlight: TextHighlight) -> EntityId {
        let id = highlight.id;
        let mut highlights = (*self.highlights).clone();
        highlights.push(highlight);
        self.highlights = Arc::new(highlights);
        tracing::debug!("Added highlight {}", id);
        id
    }

    /// Move a highlight to `[start, end)`, refreshing its cached text.
    ///
    /// Returns false for an unknown id, an empty or out-of-bounds span, or
    /// when the span is unchanged.
    pub fn set_highlight_span(&mut self, id: EntityId, start: usize, end: usize) -> bool {
        if start >= end || end > char_len(&self.text) {
            return false;
        }
        let Some(index) = self.highlights.iter().position(|h| h.id == id) else {
            return false;
        };
        let current = &self.highlights[index];
        if current.start == start && current.end == end {
            return false;
        }
        let updated = current.with_span(&self.text, start, end);
        let mut highlights = (*self.highlights).clone();
        highlights[index] = updated;
        self.highlights = Arc::new(highlights);
        true
    }

    /// Handle a text selection made in read mode.
    ///
    /// `selected` is the substring the text surface reports for
    /// `[start, end)`. Whitespace-only selections are ignored. What happens
    /// otherwise depends on [`HighlightMode`].
    pub fn handle_text_selection(
        &mut self,
        start: usize,
        end: usize,
        selected: &str,
        palette: &mut dyn ColorPalette,
    ) {
        if self.edit_mode {
            tracing::debug!("Ignoring text selection in edit mode");
            return;
        }
        if start >= end || end > char_len(&self.text) || selected.trim().is_empty() {
            tracing::debug!("Ignoring empty or out-of-range selection {}..{}", start, end);
            return;
        }
        let selected_text = char_slice(&self.text, start, end);
        if selected_text != selected {
            tracing::warn!(
                "Selection text {:?} does not match buffer {:?} at {}..{}",
                selected,
                selected_text,
                start,
                end
            );
        }

        match (self.highlight_mode, self.active_highlight()) {
            (HighlightMode::Extend, Some(active)) => self.extend_highlight(active, start, end),
            (HighlightMode::Reduce, Some(active)) => self.reduce_highlight(active, start, end),
            (HighlightMode::Create, _) => {
                let highlight = TextHighlight::new(&self.text, start, end, palette.next_color());
                let id = self.add_highlight(highlight);
                self.handle_highlight_select(Some(id));
            }
            (mode, None) => {
                tracing::debug!("{:?} selection without an active highlight", mode);
            }
        }
    }

    fn extend_highlight(&mut self, id: EntityId, start: usize, end: usize) {
        let Some(current) = self.find_highlight(id) else {
            return;
        };
        let (new_start, new_end) = (current.start.min(start), current.end.max(end));
        self.set_highlight_span(id, new_start, new_end);
    }

    fn reduce_highlight(&mut self, id: EntityId, start: usize, end: usize) {
        let Some(current) = self.find_highlight(id) else {
            return;
        };
        if start < current.start || end > current.end {
            tracing::debug!("Reduce selection {}..{} is outside highlight {}", start, end, id);
            return;
        }
        let (current_start, current_end) = (current.start, current.end);
        if start == current_start {
            self.set_highlight_span(id, end, current_end);
        } else if end == current_end {
            self.set_highlight_span(id, current_start, start);
        }
    }

    /// Replace the text while in edit mode, rebasing every highlight.
    ///
    /// Highlights whose span collapses are removed, and any box linked to
    /// one of them is released.
    pub fn apply_text_change(&mut self, new_text: &str) {
        if !self.edit_mode {
            tracing::debug!("Ignoring text change outside edit mode");
            return;
        }
        if new_text == self.text {
            return;
        }

        let rebased = rebase_highlights(&self.text, new_text, &self.highlights);
        self.highlights = Arc::new(rebased.highlights);

        if !rebased.dropped.is_empty() {
            tracing::debug!("Text edit removed {} highlights", rebased.dropped.len());
            self.release_boxes(&rebased.dropped);
            for &id in &rebased.dropped {
                self.forget_highlight(id);
            }
        }

        self.text = new_text.to_string();
    }
}
