// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Active-selection pointers for the two annotation panels.
//!
//! At most one box and one highlight are active at a time. The pointers are
//! plain ids; the store clears them when the entity they name is removed, so
//! they never outlive their target.

use crate::model::EntityId;

/// The currently active box and highlight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    active_box: Option<EntityId>,
    active_highlight: Option<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_box(&self) -> Option<EntityId> {
        self.active_box
    }

    pub fn active_highlight(&self) -> Option<EntityId> {
        self.active_highlight
    }

    pub fn set_active_box(&mut self, id: Option<EntityId>) {
        self.active_box = id;
    }

    pub fn set_active_highlight(&mut self, id: Option<EntityId>) {
        self.active_highlight = id;
    }

    /// Clear the box pointer if it names `id`
    pub fn forget_box(&mut self, id: EntityId) {
        if self.active_box == Some(id) {
            self.active_box = None;
        }
    }

    /// Clear the highlight pointer if it names `id`
    pub fn forget_highlight(&mut self, id: EntityId) {
        if self.active_highlight == Some(id) {
            self.active_highlight = None;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_selection_is_empty() {
        let sel = Selection::new();
        assert_eq!(sel.active_box(), None);
        assert_eq!(sel.active_highlight(), None);
    }

    #[test]
    fn forget_only_clears_matching_pointer() {
        let mut sel = Selection::new();
        let b = EntityId::next();
        let other = EntityId::next();
        sel.set_active_box(Some(b));

        sel.forget_box(other);
        assert_eq!(sel.active_box(), Some(b));

        sel.forget_box(b);
        assert_eq!(sel.active_box(), None);

        let h = EntityId::next();
        sel.set_active_highlight(Some(h));
        sel.forget_highlight(other);
        assert_eq!(sel.active_highlight(), Some(h));
        sel.forget_highlight(h);
        assert_eq!(sel.active_highlight(), None);
    }

    #[test]
    fn clear_resets_both() {
        let mut sel = Selection::new();
        sel.set_active_box(Some(EntityId::next()));
        sel.set_active_highlight(Some(EntityId::next()));
        sel.clear();
        assert_eq!(sel, Selection::new());
    }
}
