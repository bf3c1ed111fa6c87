// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Export document (write-only JSON snapshot of the annotations)

use super::{BoundingBox, TextHighlight};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Snapshot of both collections plus the text they refer to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub boxes: Vec<BoundingBox>,
    pub highlights: Vec<TextHighlight>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
}

impl ExportDocument {
    /// Stamp the document with an ISO-8601 export time.
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        self.exported_at = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        self
    }

    /// Default download name, `annotations-YYYY-MM-DD.json`.
    pub fn default_file_name(now: DateTime<Utc>) -> String {
        format!("annotations-{}.json", now.format("%Y-%m-%d"))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
