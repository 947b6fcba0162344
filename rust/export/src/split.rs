// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level splitting - deciding how many products an element yields

use crate::kind::ExportKind;
use crate::model::{Element, LevelId, LevelTable};

/// Minimum overlap (world units) for a level band to receive a segment
const OVERLAP_TOLERANCE: f64 = 1e-6;

/// Half-open vertical interval `[start, end)` belonging to one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelRange {
    pub level: LevelId,
    pub start: f64,
    pub end: f64,
}

impl LevelRange {
    pub fn new(level: LevelId, start: f64, end: f64) -> Self {
        Self { level, start, end }
    }

    #[inline]
    pub fn contains(&self, z: f64) -> bool {
        z >= self.start && z < self.end
    }

    /// Length of the overlap with `[min, max]`
    #[inline]
    pub fn overlap(&self, min: f64, max: f64) -> f64 {
        self.end.min(max) - self.start.max(min)
    }
}

/// Compute the level ranges an element must be split into.
///
/// An empty result means the element is exported as a single unit. Splitting
/// only applies to level-segment kinds, with the run policy enabled, for
/// elements outside assemblies (assembly members stay with their assembly's
/// level). When fewer than two levels overlap the element nothing is split.
pub fn split_ranges(
    element: &Element,
    kind: &ExportKind,
    split_by_level: bool,
    levels: &LevelTable,
    vertical_extent: Option<(f64, f64)>,
) -> Vec<LevelRange> {
    if !split_by_level || !kind.is_level_segment() || element.is_in_assembly() {
        return Vec::new();
    }

    let Some((min_z, max_z)) = vertical_extent else {
        return Vec::new();
    };

    let ranges: Vec<LevelRange> = levels
        .iter()
        .enumerate()
        .map(|(index, level)| {
            let (start, end) = levels.band(index);
            LevelRange::new(level.id, start, end)
        })
        .filter(|range| range.overlap(min_z, max_z) > OVERLAP_TOLERANCE)
        .collect();

    if ranges.len() < 2 {
        return Vec::new();
    }
    ranges
}
