// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared type styles, one per element type and export kind

use crate::kind::ExportKind;
use crate::model::{ElementTypeId, EntityHandle};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub type_id: ElementTypeId,
    pub kind: ExportKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCacheEntry {
    pub style: EntityHandle,
}

/// Type style cache. Entries are written once and never replaced.
#[derive(Debug, Default)]
pub struct TypeCache {
    entries: FxHashMap<TypeKey, TypeCacheEntry>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, type_id: ElementTypeId, kind: &ExportKind) -> Option<TypeCacheEntry> {
        self.entries
            .get(&TypeKey {
                type_id,
                kind: kind.clone(),
            })
            .copied()
    }

    /// Store `entry` unless the key is already cached.
    /// Returns the entry now held for the key.
    pub fn register(&mut self, type_id: ElementTypeId, kind: &ExportKind, entry: TypeCacheEntry) -> TypeCacheEntry {
        *self
            .entries
            .entry(TypeKey {
                type_id,
                kind: kind.clone(),
            })
            .or_insert(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
