// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod gesture;
pub mod handles;
pub mod mouse;
pub mod rebase;
pub mod selection;
pub mod store;
pub mod viewport;

pub use gesture::{CanvasController, GestureState};
pub use handles::ResizeHandle;
pub use mouse::{Modifiers, MouseDelegate, MouseEvent};
pub use rebase::{Rebased, TextEdit, rebase_highlights};
pub use selection::Selection;
pub use store::{AnnotationStore, HighlightMode};
pub use viewport::{CanvasGeometry, ViewPort};
