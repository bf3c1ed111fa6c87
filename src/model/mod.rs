// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Annotation data model

pub mod annotation;
pub mod document;
pub mod entity_id;

pub use annotation::{BoundingBox, TextHighlight};
pub use document::ExportDocument;
pub use entity_id::EntityId;
