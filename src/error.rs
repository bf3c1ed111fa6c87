// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Failure reasons for store operations.
//!
//! Store operations report these from their `try_*` forms. The UI-facing
//! forms log them at debug level and carry on, since selection and pointer
//! events can arrive after the entity they name is gone.

use crate::model::EntityId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("no id given")]
    MissingId,

    #[error("unknown box {0}")]
    UnknownBox(EntityId),

    #[error("unknown highlight {0}")]
    UnknownHighlight(EntityId),

    #[error("box {box_id} and highlight {highlight_id} are not linked to each other")]
    NotLinked {
        box_id: EntityId,
        highlight_id: EntityId,
    },
}
