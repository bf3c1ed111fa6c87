// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor settings and configuration constants.
//!
//! The constants are the built-in defaults. `EditorConfig` carries the
//! values actually in use and can override any of them from a TOML file.
//! Colors belong in `theme.rs`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// CANVAS SETTINGS
// ============================================================================
/// Side length of the square resize handles (content units)
const HANDLE_SIZE: f64 = 50.0;

/// A resized box must stay strictly larger than this on both axes
const MIN_BOX_SIZE: f64 = 10.0;

// ============================================================================
// GESTURE SETTINGS
// ============================================================================
/// A draw gesture must exceed this on both axes to create a box
const MIN_DRAW_SIZE: f64 = 5.0;

/// Multiplier applied to raw screen deltas while panning
///
/// Deliberately fast: one screen pixel of pointer travel moves the view by
/// ten canvas pixels.
const PAN_SPEED: f64 = 10.0;

// ============================================================================
// ZOOM SETTINGS
// ============================================================================
/// Minimum zoom level (20% of natural size)
const MIN_ZOOM: f64 = 0.2;

/// Maximum zoom level (3x natural size)
const MAX_ZOOM: f64 = 3.0;

// ============================================================================
// LINKING SETTINGS
// ============================================================================
/// Whether selecting an unlinked entity links it to the active partner
const AUTO_LINK_DEFAULT: bool = true;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Canvas geometry settings
pub mod canvas {
    pub const HANDLE_SIZE: f64 = super::HANDLE_SIZE;
    pub const MIN_BOX_SIZE: f64 = super::MIN_BOX_SIZE;
}

/// Pointer gesture settings
pub mod gesture {
    pub const MIN_DRAW_SIZE: f64 = super::MIN_DRAW_SIZE;
    pub const PAN_SPEED: f64 = super::PAN_SPEED;
}

/// Zoom limits
pub mod zoom {
    pub const MIN: f64 = super::MIN_ZOOM;
    pub const MAX: f64 = super::MAX_ZOOM;
}

/// Linking behavior defaults
pub mod linking {
    pub const AUTO_LINK_DEFAULT: bool = super::AUTO_LINK_DEFAULT;
}

/// Runtime editor configuration.
///
/// Every field is optional in the TOML source; missing keys keep the
/// built-in default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub handle_size: f64,
    pub min_box_size: f64,
    pub min_draw_size: f64,
    pub pan_speed: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub auto_link: bool,
    /// On-screen size of the canvas element, when it differs from the
    /// backing store (CSS scaling). `None` means 1:1.
    pub display_size: Option<(f64, f64)>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_size: canvas::HANDLE_SIZE,
            min_box_size: canvas::MIN_BOX_SIZE,
            min_draw_size: gesture::MIN_DRAW_SIZE,
            pan_speed: gesture::PAN_SPEED,
            min_zoom: zoom::MIN,
            max_zoom: zoom::MAX,
            auto_link: linking::AUTO_LINK_DEFAULT,
            display_size: None,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("Failed to parse editor config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&source)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let fields = [
            ("handle_size", self.handle_size),
            ("min_box_size", self.min_box_size),
            ("min_draw_size", self.min_draw_size),
            ("pan_speed", self.pan_speed),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                anyhow::bail!("{name} must be a finite number, got {value}");
            }
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            anyhow::bail!(
                "invalid zoom range {}..{}",
                self.min_zoom,
                self.max_zoom
            );
        }
        if self.handle_size <= 0.0 || self.min_box_size < 0.0 || self.min_draw_size < 0.0 {
            anyhow::bail!("sizes must be positive");
        }
        if let Some((w, h)) = self.display_size
            && (!w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0)
        {
            anyhow::bail!("display size must be positive, got {w}x{h}");
        }
        Ok(())
    }
}
