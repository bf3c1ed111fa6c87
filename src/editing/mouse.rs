// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer input events and the delegate trait that consumes them

use kurbo::Point;

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Cmd on macOS, Ctrl elsewhere: either one turns a press on empty
    /// canvas into a pan.
    pub fn pan(&self) -> bool {
        self.meta || self.ctrl
    }
}

/// A pointer event in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub pos: Point,
    pub mods: Modifiers,
}

impl MouseEvent {
    pub fn new(pos: Point) -> Self {
        Self {
            pos,
            mods: Modifiers::default(),
        }
    }

    pub fn with_modifiers(pos: Point, mods: Modifiers) -> Self {
        Self { pos, mods }
    }
}

/// Receives one pointer session at a time: a press, any number of moves,
/// then a release or the pointer leaving the surface.
pub trait MouseDelegate {
    type Data;

    fn pointer_down(&mut self, event: MouseEvent, data: &mut Self::Data);

    fn pointer_move(&mut self, event: MouseEvent, data: &mut Self::Data);

    fn pointer_up(&mut self, event: MouseEvent, data: &mut Self::Data);

    /// The pointer left the surface mid-gesture. Defaults to doing nothing.
    fn pointer_leave(&mut self, _data: &mut Self::Data) {}
}
