// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run-wide export state shared by every element export

use crate::model::{ElementId, EntityHandle, LevelTable, SpaceId};
use crate::type_cache::TypeCache;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// An exported instance waiting to be assigned to its distribution system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemMember {
    pub element: ElementId,
    pub instance: EntityHandle,
}

/// Counters for one export run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub elements_exported: usize,
    pub elements_failed: usize,
    pub instances_created: usize,
    /// Ranges skipped because their export kind maps to no product entity
    pub ranges_skipped: usize,
    pub type_styles_created: usize,
}

impl ExportStats {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Mutable state of one export run, passed explicitly to every element export
#[derive(Debug, Default)]
pub struct ExportContext {
    owner_history: Option<EntityHandle>,
    levels: LevelTable,
    pub(crate) type_cache: TypeCache,
    type_relations: FxHashMap<EntityHandle, Vec<EntityHandle>>,
    space_relations: FxHashMap<SpaceId, Vec<EntityHandle>>,
    element_instances: FxHashMap<ElementId, Vec<EntityHandle>>,
    pending_system_members: Vec<SystemMember>,
    pub(crate) stats: ExportStats,
}

impl ExportContext {
    pub fn new(levels: LevelTable) -> Self {
        Self {
            levels,
            ..Default::default()
        }
    }

    pub fn with_owner_history(mut self, owner_history: EntityHandle) -> Self {
        self.owner_history = Some(owner_history);
        self
    }

    pub fn owner_history(&self) -> Option<EntityHandle> {
        self.owner_history
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn type_cache(&self) -> &TypeCache {
        &self.type_cache
    }

    /// Instances related to a type style
    pub fn type_instances(&self, style: EntityHandle) -> &[EntityHandle] {
        self.type_relations.get(&style).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instances contained in a space
    pub fn space_contents(&self, space: SpaceId) -> &[EntityHandle] {
        self.space_relations.get(&space).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instances exported for an element, in creation order
    pub fn element_instances(&self, element: ElementId) -> &[EntityHandle] {
        self.element_instances.get(&element).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pending_system_members(&self) -> &[SystemMember] {
        &self.pending_system_members
    }

    /// Hand pending system members to the system assignment stage
    pub fn take_pending_system_members(&mut self) -> Vec<SystemMember> {
        std::mem::take(&mut self.pending_system_members)
    }

    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    pub(crate) fn relate_type(&mut self, style: EntityHandle, instance: EntityHandle) {
        self.type_relations.entry(style).or_default().push(instance);
    }

    pub(crate) fn relate_space(&mut self, space: SpaceId, instance: EntityHandle) {
        self.space_relations.entry(space).or_default().push(instance);
    }

    pub(crate) fn register_instance(&mut self, element: ElementId, instance: EntityHandle) {
        self.element_instances.entry(element).or_default().push(instance);
        self.pending_system_members.push(SystemMember { element, instance });
    }
}
