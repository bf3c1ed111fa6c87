// Copyright 2025 the Annolink Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for boxes and highlights.
//!
//! Each `EntityId` is a monotonically increasing `u64` generated from a global
//! atomic counter. Ids are never reused within a session, so a stale id held
//! by a selection or a link simply stops resolving after its entity is
//! deleted. In the export document an id is written as an opaque string.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a box or a highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Create a new unique entity ID
    pub fn next() -> Self {
        Self(ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
