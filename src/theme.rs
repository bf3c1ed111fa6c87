// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Annotation colors.
//!
//! The engine treats colors as opaque strings: it only compares and copies
//! them. New boxes and highlights draw their color from a `ColorPalette`.

// ============================================================================
// ANNOTATION PALETTE
// ============================================================================
const BOX_COLORS: [&str; 8] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33F5", "#33FFF5", "#F5FF33", "#FF3333", "#33FF33",
];

// ============================================================================
// PUBLIC API
// ============================================================================

/// Colors handed out to newly created annotations
pub mod palette {
    pub const COLORS: [&str; 8] = super::BOX_COLORS;
}

/// Supplies a color for each newly created box or highlight.
pub trait ColorPalette {
    fn next_color(&mut self) -> String;
}

/// Round-robin over the built-in palette.
#[derive(Debug, Clone, Default)]
pub struct CyclingPalette {
    cursor: usize,
}

impl CyclingPalette {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ColorPalette for CyclingPalette {
    fn next_color(&mut self) -> String {
        let color = palette::COLORS[self.cursor % palette::COLORS.len()];
        self.cursor = self.cursor.wrapping_add(1);
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_palette_wraps_around() {
        let mut cycling = CyclingPalette::new();
        let first: Vec<String> = (0..palette::COLORS.len())
            .map(|_| cycling.next_color())
            .collect();
        assert_eq!(first[0], "#FF5733");
        assert_eq!(cycling.next_color(), first[0]);
    }
}
