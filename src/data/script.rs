// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Scripted annotation sessions.
//!
//! A session file is TOML: where the image and text come from, optional
//! editor config overrides, and an ordered list of input events. Replaying
//! the events through `AnnotatorState` produces the same store a user
//! would get by performing them interactively.
//!
//! ```toml
//! text = "One human is playing ball"
//! canvas_size = [800, 600]
//!
//! [config]
//! auto_link = true
//!
//! [[events]]
//! kind = "select_text"
//! start = 4
//! end = 9
//!
//! [[events]]
//! kind = "pointer_down"
//! x = 10.0
//! y = 10.0
//! ```
//!
//! Boxes and highlights are addressed by their position in the current
//! collection, so an index can name a different entity after a delete.

use super::{AnnotatorState, ImageInfo, load_image, load_text};
use crate::editing::{Modifiers, MouseEvent};
use crate::model::EntityId;
use crate::model::annotation::char_slice;
use crate::settings::EditorConfig;
use anyhow::{Context, Result, bail};
use kurbo::{Point, Size};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Pointer position in client pixels plus held modifiers
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl PointerInput {
    fn event(&self) -> MouseEvent {
        MouseEvent::with_modifiers(
            Point::new(self.x, self.y),
            Modifiers {
                shift: self.shift,
                ctrl: self.ctrl,
                alt: self.alt,
                meta: self.meta,
            },
        )
    }
}

/// One recorded input event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    PointerLeave,
    /// Select a box by index; no index clears the box selection
    SelectBox {
        index: Option<usize>,
    },
    SelectHighlight {
        index: Option<usize>,
    },
    /// Text panel selection; `text` defaults to the buffer's own slice
    SelectText {
        start: usize,
        end: usize,
        text: Option<String>,
    },
    /// Whole new buffer contents from the edit-mode text field
    EditText {
        text: String,
    },
    ToggleEditMode,
    ToggleExtend,
    ToggleReduce,
    SetAutoLink {
        enabled: bool,
    },
    Zoom {
        scale: f64,
    },
    /// Where the canvas element now sits on the page, in client pixels
    CanvasLayout {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    Link {
        box_index: usize,
        highlight_index: usize,
    },
    LinkActive,
    Unlink {
        box_index: usize,
    },
    DeleteBox {
        index: usize,
    },
    DeleteActiveBox,
    DeleteHighlight {
        index: usize,
    },
    ClearAnnotations,
}

/// A parsed session file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Session {
    /// Image to annotate (PNG or JPEG)
    pub image: Option<PathBuf>,
    /// Canvas size to use when there is no image file
    pub canvas_size: Option<(u32, u32)>,
    /// Inline text to annotate
    pub text: Option<String>,
    /// File holding the text to annotate
    pub text_file: Option<PathBuf>,
    /// Where to write the export; stdout when absent
    pub output: Option<PathBuf>,
    pub config: EditorConfig,
    pub events: Vec<SessionEvent>,
}

impl Session {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let session: Self = toml::from_str(source).context("Failed to parse session")?;
        if session.text.is_some() && session.text_file.is_some() {
            bail!("session sets both `text` and `text_file`");
        }
        session.config.validate()?;
        Ok(session)
    }

    /// Load a session file. Relative paths inside it are taken relative to
    /// the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session: {}", path.display()))?;
        let mut session = Self::from_toml_str(&source)
            .with_context(|| format!("Invalid session: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for entry in [&mut session.image, &mut session.text_file, &mut session.output] {
            if let Some(p) = entry.as_mut()
                && p.is_relative()
            {
                *p = base.join(&*p);
            }
        }
        Ok(session)
    }

    /// Build the starting state: text, config and image, no annotations.
    pub fn build_state(&self) -> Result<AnnotatorState> {
        let config = self.config.clone();
        let mut state = match (&self.text, &self.text_file) {
            (Some(text), _) => AnnotatorState::with_text(config, text.clone()),
            (None, Some(path)) => AnnotatorState::with_text(config, load_text(path)?),
            (None, None) => AnnotatorState::new(config),
        };

        if let Some(path) = &self.image {
            state.set_image(load_image(path)?);
        } else if let Some((width, height)) = self.canvas_size {
            state.set_image(ImageInfo {
                path: PathBuf::new(),
                width,
                height,
            });
        }
        Ok(state)
    }

    /// Replay every event in order.
    pub fn replay(&self, state: &mut AnnotatorState) {
        for (n, event) in self.events.iter().enumerate() {
            tracing::debug!("event {}: {:?}", n, event);
            apply_event(state, event, n);
        }
        tracing::info!(
            "Replayed {} events: {} boxes, {} highlights",
            self.events.len(),
            state.store.boxes().len(),
            state.store.highlights().len()
        );
    }
}

fn box_at_index(state: &AnnotatorState, index: usize, n: usize) -> Option<EntityId> {
    let id = state.store.boxes().get(index).map(|b| b.id);
    if id.is_none() {
        tracing::warn!("event {}: no box at index {}", n, index);
    }
    id
}

fn highlight_at_index(state: &AnnotatorState, index: usize, n: usize) -> Option<EntityId> {
    let id = state.store.highlights().get(index).map(|h| h.id);
    if id.is_none() {
        tracing::warn!("event {}: no highlight at index {}", n, index);
    }
    id
}

fn apply_event(state: &mut AnnotatorState, event: &SessionEvent, n: usize) {
    match event {
        SessionEvent::PointerDown(input) => state.pointer_down(input.event()),
        SessionEvent::PointerMove(input) => state.pointer_move(input.event()),
        SessionEvent::PointerUp(input) => state.pointer_up(input.event()),
        SessionEvent::PointerLeave => state.pointer_leave(),
        SessionEvent::SelectBox { index } => match index {
            Some(index) => {
                if let Some(id) = box_at_index(state, *index, n) {
                    state.store.handle_box_select(Some(id));
                }
            }
            None => state.store.handle_box_select(None),
        },
        SessionEvent::SelectHighlight { index } => match index {
            Some(index) => {
                if let Some(id) = highlight_at_index(state, *index, n) {
                    state.store.handle_highlight_select(Some(id));
                }
            }
            None => state.store.handle_highlight_select(None),
        },
        SessionEvent::SelectText { start, end, text } => {
            let selected = text
                .clone()
                .unwrap_or_else(|| char_slice(state.store.text(), *start, *end));
            state.select_text(*start, *end, &selected);
        }
        SessionEvent::EditText { text } => state.change_text(text),
        SessionEvent::ToggleEditMode => state.store.toggle_edit_mode(),
        SessionEvent::ToggleExtend => state.store.toggle_extend_mode(),
        SessionEvent::ToggleReduce => state.store.toggle_reduce_mode(),
        SessionEvent::SetAutoLink { enabled } => state.store.set_auto_link(*enabled),
        SessionEvent::Zoom { scale } => state.canvas.set_zoom(*scale),
        SessionEvent::CanvasLayout {
            left,
            top,
            width,
            height,
        } => {
            if [left, top, width, height].iter().all(|v| v.is_finite()) {
                state
                    .canvas
                    .set_client_rect(Point::new(*left, *top), Size::new(*width, *height));
            } else {
                tracing::warn!("event {}: canvas layout must be finite, skipped", n);
            }
        }
        SessionEvent::Link {
            box_index,
            highlight_index,
        } => {
            if let (Some(box_id), Some(highlight_id)) = (
                box_at_index(state, *box_index, n),
                highlight_at_index(state, *highlight_index, n),
            ) {
                state.store.link(box_id, highlight_id);
            }
        }
        SessionEvent::LinkActive => state.store.link_active(),
        SessionEvent::Unlink { box_index } => {
            if let Some(id) = box_at_index(state, *box_index, n) {
                state.store.unlink_box(id);
            }
        }
        SessionEvent::DeleteBox { index } => {
            if let Some(id) = box_at_index(state, *index, n) {
                state.store.delete_box(id);
            }
        }
        SessionEvent::DeleteActiveBox => state.store.delete_active_box(),
        SessionEvent::DeleteHighlight { index } => {
            if let Some(id) = highlight_at_index(state, *index, n) {
                state.store.delete_highlight(id);
            }
        }
        SessionEvent::ClearAnnotations => state.store.clear_annotations(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAW_AND_LINK: &str = r#"
text = "One human is playing ball"
canvas_size = [800, 600]

[[events]]
kind = "select_text"
start = 4
end = 9

[[events]]
kind = "pointer_down"
x = 10
y = 10

[[events]]
kind = "pointer_move"
x = 110.0
y = 60.0

[[events]]
kind = "pointer_up"
x = 110.0
y = 60.0
"#;

    fn replayed(source: &str) -> AnnotatorState {
        let session = Session::from_toml_str(source).unwrap();
        let mut state = session.build_state().unwrap();
        session.replay(&mut state);
        state
    }

    #[test]
    fn replay_draws_and_auto_links() {
        let state = replayed(DRAW_AND_LINK);
        let highlight = &state.store.highlights()[0];
        let drawn = &state.store.boxes()[0];
        assert_eq!(highlight.text, "human");
        assert_eq!(drawn.bounds(), kurbo::Rect::new(10.0, 10.0, 110.0, 60.0));
        assert_eq!(drawn.text_ref, Some(highlight.id));
        assert_eq!(highlight.box_ref, Some(drawn.id));
    }

    #[test]
    fn edit_events_cascade_through_replay() {
        let source = format!(
            "{DRAW_AND_LINK}
[[events]]
kind = \"toggle_edit_mode\"

[[events]]
kind = \"edit_text\"
text = \"One  is playing ball\"
"
        );
        let state = replayed(&source);
        assert!(state.store.highlights().is_empty());
        assert_eq!(state.store.boxes()[0].text_ref, None);
        assert!(state.store.is_consistent());
    }

    #[test]
    fn modifiers_and_config_parse() {
        let session = Session::from_toml_str(
            r#"
[config]
auto_link = false
pan_speed = 2.0

[[events]]
kind = "pointer_down"
x = 5.0
y = 5.0
meta = true

[[events]]
kind = "select_box"

[[events]]
kind = "pointer_leave"
"#,
        )
        .unwrap();
        assert!(!session.config.auto_link);
        assert_eq!(session.config.pan_speed, 2.0);
        let SessionEvent::PointerDown(input) = &session.events[0] else {
            panic!("expected pointer_down, got {:?}", session.events[0]);
        };
        assert!(input.meta && !input.ctrl);
        assert_eq!(session.events[1], SessionEvent::SelectBox { index: None });
        assert_eq!(session.events[2], SessionEvent::PointerLeave);
    }

    #[test]
    fn canvas_layout_rescales_pointer_events() {
        let state = replayed(
            r#"
canvas_size = [800, 600]

[[events]]
kind = "canvas_layout"
left = 20.0
top = 10.0
width = 400.0
height = 300.0

[[events]]
kind = "pointer_down"
x = 30.0
y = 20.0

[[events]]
kind = "pointer_up"
x = 70.0
y = 45.0
"#,
        );
        assert_eq!(
            state.store.boxes()[0].bounds(),
            kurbo::Rect::new(20.0, 20.0, 100.0, 70.0)
        );
    }

    #[test]
    fn out_of_range_index_is_skipped() {
        let state = replayed(
            r#"
text = "abc"

[[events]]
kind = "delete_box"
index = 3

[[events]]
kind = "link"
box_index = 0
highlight_index = 0
"#,
        );
        assert!(state.store.boxes().is_empty());
    }

    #[test]
    fn rejects_conflicting_text_sources() {
        assert!(Session::from_toml_str("text = \"a\"\ntext_file = \"b.txt\"\n").is_err());
        assert!(Session::from_toml_str("colour = \"red\"\n").is_err());
    }

    #[test]
    fn load_resolves_paths_next_to_session() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("caption.txt"), "A small dog").unwrap();
        image::RgbaImage::new(64, 48)
            .save(dir.path().join("scene.png"))
            .unwrap();
        let session_path = dir.path().join("session.toml");
        std::fs::write(
            &session_path,
            "image = \"scene.png\"\ntext_file = \"caption.txt\"\noutput = \"out.json\"\n",
        )
        .unwrap();

        let session = Session::load(&session_path).unwrap();
        assert_eq!(session.output, Some(dir.path().join("out.json")));
        let state = session.build_state().unwrap();
        assert_eq!(state.store.text(), "A small dog");
        assert_eq!(
            state.canvas.geometry().canvas_size,
            kurbo::Size::new(64.0, 48.0)
        );
    }
}
