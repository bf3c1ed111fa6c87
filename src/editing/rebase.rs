// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Repositioning highlight spans after an edit of the text buffer.
//!
//! The edit is recovered from the old and new text by trimming the longest
//! common prefix and then the longest common suffix of what remains. This
//! assumes one contiguous edit, which is what a single change event from a
//! text field delivers. It is not a general diff.
//!
//! Each span is then moved according to where the edit falls:
//!
//! ```text
//!   edit at/before start   [s, e) -> [s+d, e+d)
//!   edit inside (s, e]     [s, e) -> [s, e+d)
//!   edit after e           [s, e) unchanged
//! ```
//!
//! When the removed text runs from before `start` into the span, the span
//! starts where the edit starts, so replaced text stays highlighted and a
//! deleted head is trimmed off. Spans that end up empty or out of bounds
//! are dropped; this is the only way an edit removes a highlight.

use crate::model::{EntityId, TextHighlight};

/// A single contiguous replacement, in char offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    /// Where the replacement starts
    pub index: usize,
    /// Chars removed from the old text
    pub removed_len: usize,
    /// Chars inserted in their place
    pub added_len: usize,
}

impl TextEdit {
    /// Recover the edit that turns `old` into `new`.
    pub fn between(old: &str, new: &str) -> Self {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();

        let prefix = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();

        // Suffix only looks at the tails past the prefix so the two
        // regions never overlap.
        let suffix = old[prefix..]
            .iter()
            .rev()
            .zip(new[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();

        Self {
            index: prefix,
            removed_len: old.len() - suffix - prefix,
            added_len: new.len() - suffix - prefix,
        }
    }

    pub fn delta(&self) -> isize {
        self.added_len as isize - self.removed_len as isize
    }

    pub fn is_noop(&self) -> bool {
        self.removed_len == 0 && self.added_len == 0
    }

    /// New `(start, end)` for a span, before bounds checking.
    fn apply(&self, start: usize, end: usize) -> (isize, isize) {
        let index = self.index as isize;
        let (start, end) = (start as isize, end as isize);
        let delta = self.delta();

        if index <= start {
            if index + self.removed_len as isize <= start {
                (start + delta, end + delta)
            } else {
                // Removal eats into the head of the span.
                (index, end + delta)
            }
        } else if index <= end {
            (start, end + delta)
        } else {
            (start, end)
        }
    }
}

/// Result of rebasing a highlight set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rebased {
    /// Surviving highlights, in their original order, text re-cached
    pub highlights: Vec<TextHighlight>,
    /// Ids of highlights whose span collapsed or left the buffer
    pub dropped: Vec<EntityId>,
}

/// Recompute every highlight span for the change `old_text -> new_text`.
pub fn rebase_highlights(old_text: &str, new_text: &str, highlights: &[TextHighlight]) -> Rebased {
    let edit = TextEdit::between(old_text, new_text);
    let new_len = new_text.chars().count() as isize;

    tracing::debug!(
        "[rebase] edit at {} removed={} added={} over {} highlights",
        edit.index,
        edit.removed_len,
        edit.added_len,
        highlights.len()
    );

    let mut rebased = Rebased::default();
    for highlight in highlights {
        let (start, end) = edit.apply(highlight.start, highlight.end);
        if end <= start || start < 0 || end > new_len {
            tracing::debug!("[rebase] dropping collapsed highlight {}", highlight.id);
            rebased.dropped.push(highlight.id);
            continue;
        }
        rebased
            .highlights
            .push(highlight.with_span(new_text, start as usize, end as usize));
    }
    rebased
}
