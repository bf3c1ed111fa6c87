// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! File I/O for AnnotatorState (image, text, export)

use super::AnnotatorState;
use crate::model::ExportDocument;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// A decoded image's natural size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Decode an image file (PNG or JPEG) and report its pixel size.
pub fn load_image(path: &Path) -> Result<ImageInfo> {
    let img = image::open(path)
        .with_context(|| format!("Failed to load image: {}", path.display()))?;
    let rgba = img.to_rgba8();
    Ok(ImageInfo {
        path: path.to_path_buf(),
        width: rgba.width(),
        height: rgba.height(),
    })
}

/// Read a UTF-8 text file to annotate.
pub fn load_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read text: {}", path.display()))
}

/// Write an export document as pretty-printed JSON.
pub fn write_export(path: &Path, document: &ExportDocument) -> Result<()> {
    let json = document
        .to_json_pretty()
        .context("Failed to serialize annotations")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export: {}", path.display()))
}

impl AnnotatorState {
    /// Load an image from disk and make it the annotated image
    pub fn open_image(&mut self, path: &Path) {
        match load_image(path) {
            Ok(info) => {
                self.set_image(info);
                self.error_message = None;
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!("{}", error);
                self.error_message = Some(error);
            }
        }
    }

    /// Export the annotations into `dir` under the dated default name.
    ///
    /// Returns the written path, or `None` after recording the error.
    pub fn export_annotations(&mut self, dir: &Path) -> Option<PathBuf> {
        let now = Utc::now();
        let path = dir.join(ExportDocument::default_file_name(now));
        match write_export(&path, &self.store.export_document(now)) {
            Ok(()) => {
                tracing::info!("Exported annotations: {}", path.display());
                self.error_message = None;
                Some(path)
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!("{}", error);
                self.error_message = Some(error);
                None
            }
        }
    }
}
