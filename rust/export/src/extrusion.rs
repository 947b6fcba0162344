// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-body extrusion metadata accumulated while building representations

use ifc_export_geometry::{Axis, AxisSet, ExtrusionProfile, Point3};

/// Bounds of a void to carve from the finished product
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningData {
    /// Geometry item the void came from
    pub source_id: u32,
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

/// Extrusion metadata for one body.
///
/// Created empty for each body with the candidate axes set, filled by the
/// representation builder and read by opening carving and quantity derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionData {
    /// Axes the representation builder may recognize extrusions along
    pub possible_axes: AxisSet,
    /// Recognized extrusion direction
    pub axis: Option<Axis>,
    /// Extrusion length in export units
    pub scaled_length: f64,
    /// Cross-section area in export units
    pub scaled_area: f64,
    pub openings: Vec<OpeningData>,
}

impl ExtrusionData {
    pub fn new(possible_axes: AxisSet) -> Self {
        Self {
            possible_axes,
            axis: None,
            scaled_length: 0.0,
            scaled_area: 0.0,
            openings: Vec::new(),
        }
    }

    /// Record a measured extrusion, scaling from source to export units
    pub fn record_profile(&mut self, profile: &ExtrusionProfile, length_scale: f64) {
        self.axis = Some(profile.axis);
        self.scaled_length = profile.length * length_scale;
        self.scaled_area = profile.area * length_scale * length_scale;
    }

    pub fn add_opening(&mut self, opening: OpeningData) {
        self.openings.push(opening);
    }

    pub fn clear_openings(&mut self) {
        self.openings.clear();
    }

    #[inline]
    pub fn has_extrusion(&self) -> bool {
        self.axis.is_some()
    }
}

impl Default for ExtrusionData {
    fn default() -> Self {
        Self::new(AxisSet::all())
    }
}
