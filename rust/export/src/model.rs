// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Source model: elements, element types, levels and spaces as seen by the exporter

use nalgebra::Matrix4;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a modeled element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an element type (shared definition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementTypeId(pub u64);

impl fmt::Display for ElementTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a building level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(pub u64);

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a room/space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceId(pub u64);

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle of a record created in the output file (entity instance id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Named scalar parameters in source units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(FxHashMap<String, f64>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A modeled element being exported. Immutable for the duration of export.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    /// Assembly group the element belongs to, if any
    pub assembly: Option<ElementId>,
    pub type_id: Option<ElementTypeId>,
    /// Category id, passed through to representation building
    pub category: i64,
    /// Level the element is hosted on
    pub level: Option<LevelId>,
    /// Element placement in world coordinates
    pub transform: Matrix4<f64>,
    pub parameters: Parameters,
}

impl Element {
    pub fn new(id: u64) -> Self {
        Self {
            id: ElementId(id),
            assembly: None,
            type_id: None,
            category: 0,
            level: None,
            transform: Matrix4::identity(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_type(mut self, type_id: u64) -> Self {
        self.type_id = Some(ElementTypeId(type_id));
        self
    }

    pub fn with_assembly(mut self, assembly: u64) -> Self {
        self.assembly = Some(ElementId(assembly));
        self
    }

    pub fn with_category(mut self, category: i64) -> Self {
        self.category = category;
        self
    }

    pub fn with_level(mut self, level: u64) -> Self {
        self.level = Some(LevelId(level));
        self
    }

    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.set(name, value);
        self
    }

    #[inline]
    pub fn is_in_assembly(&self) -> bool {
        self.assembly.is_some()
    }
}

/// Shared definition referenced by elements
#[derive(Debug, Clone)]
pub struct ElementType {
    pub id: ElementTypeId,
    pub name: String,
    pub parameters: Parameters,
}

impl ElementType {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ElementTypeId(id),
            name: name.into(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.set(name, value);
        self
    }
}

/// Look up a parameter on the element, falling back to its type
pub fn lookup_parameter(element: &Element, element_type: Option<&ElementType>, name: &str) -> Option<f64> {
    element
        .parameters
        .get(name)
        .or_else(|| element_type.and_then(|t| t.parameters.get(name)))
}

/// A building level (storey)
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    /// Elevation of the level datum (world z)
    pub elevation: f64,
}

impl Level {
    pub fn new(id: u64, name: impl Into<String>, elevation: f64) -> Self {
        Self {
            id: LevelId(id),
            name: name.into(),
            elevation,
        }
    }
}

/// Levels of a run, kept sorted by elevation
#[derive(Debug, Clone, Default)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl LevelTable {
    pub fn new(mut levels: Vec<Level>) -> Self {
        levels.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));
        Self { levels }
    }

    pub fn get(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Elevation band of the level at `index`: `[elevation, next elevation)`,
    /// open downward for the lowest level and upward for the highest
    pub(crate) fn band(&self, index: usize) -> (f64, f64) {
        let start = if index == 0 {
            f64::NEG_INFINITY
        } else {
            self.levels[index].elevation
        };
        let end = self
            .levels
            .get(index + 1)
            .map_or(f64::INFINITY, |next| next.elevation);
        (start, end)
    }
}

/// A room/space an element can be related to
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    pub id: SpaceId,
    /// Local coordinate frame of the space in world coordinates
    pub frame: Matrix4<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_falls_back_to_type() {
        let element = Element::new(1).with_parameter("Length", 2.0);
        let element_type = ElementType::new(10, "Duct").with_parameter("Width", 0.4);

        assert_eq!(lookup_parameter(&element, Some(&element_type), "Length"), Some(2.0));
        assert_eq!(lookup_parameter(&element, Some(&element_type), "Width"), Some(0.4));
        assert_eq!(lookup_parameter(&element, None, "Width"), None);
    }

    #[test]
    fn test_element_value_shadows_type_value() {
        let element = Element::new(1).with_parameter("Length", 2.0);
        let element_type = ElementType::new(10, "Duct").with_parameter("Length", 9.0);
        assert_eq!(lookup_parameter(&element, Some(&element_type), "Length"), Some(2.0));
    }

    #[test]
    fn test_level_table_sorts_and_bands() {
        let table = LevelTable::new(vec![
            Level::new(2, "Level 2", 3.0),
            Level::new(1, "Level 1", 0.0),
            Level::new(3, "Roof", 6.0),
        ]);

        let ids: Vec<u64> = table.iter().map(|l| l.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(table.band(0), (f64::NEG_INFINITY, 3.0));
        assert_eq!(table.band(1), (3.0, 6.0));
        assert_eq!(table.band(2), (6.0, f64::INFINITY));
    }
}
