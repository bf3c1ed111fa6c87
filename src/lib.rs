// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Annolink: linked image-region and text-span annotation engine
//!
//! Boxes drawn over an image and highlights made over a text buffer are kept
//! in one store, optionally linked one-to-one. The store keeps the links
//! symmetric through selection, deletion and text edits.

pub mod data;
pub mod editing;
pub mod error;
pub mod model;
pub mod settings;
pub mod theme;

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;

pub use data::AnnotatorState;
pub use editing::AnnotationStore;
pub use error::LinkError;
pub use model::{BoundingBox, EntityId, ExportDocument, TextHighlight};

/// Entry point for the `annolink` binary: replay a session file and write
/// the resulting export document.
pub fn run() -> Result<()> {
    // Initialize tracing subscriber (can be controlled via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("annolink=info".parse()?),
        )
        .init();

    let session_path = session_path_from_args()?;
    tracing::info!("Replaying session: {}", session_path.display());

    let session = data::script::Session::load(&session_path)?;
    let mut state = session.build_state()?;
    session.replay(&mut state);

    let document = state.store.export_document(Utc::now());
    match &session.output {
        Some(path) => {
            data::write_export(path, &document)?;
            tracing::info!("Exported annotations: {}", path.display());
        }
        None => {
            let json = document
                .to_json_pretty()
                .context("Failed to serialize annotations")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// First command-line argument, the session file
fn session_path_from_args() -> Result<PathBuf> {
    let Some(arg) = std::env::args_os().nth(1) else {
        anyhow::bail!("Usage: annolink <session.toml>");
    };
    let path = PathBuf::from(arg);
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    Ok(path)
}
