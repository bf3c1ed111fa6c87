// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Central application state (`AnnotatorState`).
//!
//! `AnnotatorState` owns the annotation store, the image canvas controller
//! and the highlight palette. It is built once at startup and every input
//! event is routed through it. Sub-modules split the methods by domain:
//! file I/O and scripted session replay.

mod file_io;
pub mod script;

pub use file_io::{ImageInfo, load_image, load_text, write_export};

use crate::editing::{AnnotationStore, CanvasController, MouseDelegate, MouseEvent};
use crate::settings::EditorConfig;
use crate::theme::CyclingPalette;
use kurbo::Size;

/// Main application state
#[derive(Debug, Clone)]
pub struct AnnotatorState {
    /// Boxes, highlights, text and selection
    pub store: AnnotationStore,

    /// Pointer gestures and pan/zoom over the image
    pub canvas: CanvasController,

    /// Colors for new highlights
    pub palette: CyclingPalette,

    /// The image currently under annotation, if any
    pub image: Option<ImageInfo>,

    /// Last load or save failure, for display
    pub error_message: Option<String>,
}

impl Default for AnnotatorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl AnnotatorState {
    /// Create a state over the built-in sample text
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(config, AnnotationStore::default())
    }

    /// Create a state annotating `text`
    pub fn with_text(config: EditorConfig, text: impl Into<String>) -> Self {
        Self::with_store(config, AnnotationStore::new(text))
    }

    fn with_store(config: EditorConfig, mut store: AnnotationStore) -> Self {
        store.set_auto_link(config.auto_link);
        Self {
            store,
            canvas: CanvasController::new(config),
            palette: CyclingPalette::new(),
            image: None,
            error_message: None,
        }
    }

    /// Install a newly decoded image.
    ///
    /// The canvas takes the image's natural size, pan and zoom go back to
    /// identity, and every box is removed (boxes describe the old image).
    pub fn set_image(&mut self, image: ImageInfo) {
        let size = Size::new(f64::from(image.width), f64::from(image.height));
        self.canvas.reset_for_new_image(size);
        self.store.clear_boxes();
        tracing::info!(
            "Image set: {} ({}x{})",
            image.path.display(),
            image.width,
            image.height
        );
        self.image = Some(image);
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    // ===== INPUT ROUTING =====

    pub fn pointer_down(&mut self, event: MouseEvent) {
        self.canvas.pointer_down(event, &mut self.store);
    }

    pub fn pointer_move(&mut self, event: MouseEvent) {
        self.canvas.pointer_move(event, &mut self.store);
    }

    pub fn pointer_up(&mut self, event: MouseEvent) {
        self.canvas.pointer_up(event, &mut self.store);
    }

    pub fn pointer_leave(&mut self) {
        self.canvas.pointer_leave(&mut self.store);
    }

    /// A read-mode selection from the text panel
    pub fn select_text(&mut self, start: usize, end: usize, selected: &str) {
        self.store
            .handle_text_selection(start, end, selected, &mut self.palette);
    }

    /// An edit-mode change from the text panel
    pub fn change_text(&mut self, new_text: &str) {
        self.store.apply_text_change(new_text);
    }
}
