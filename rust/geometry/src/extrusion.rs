// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion analysis - recognizing prismatic meshes
//!
//! A mesh is treated as an extrusion along an axis when every face is either
//! parallel to the axis (side) or perpendicular to it (cap). Its length is the
//! extent along the axis and its cross-section area is measured on the plane
//! halfway along that extent, so open (clipped) prisms are measured as well.

use crate::mesh::Mesh;
use nalgebra::Vector3;
use smallvec::SmallVec;
use std::fmt;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along the axis
    #[inline]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Ordered set of candidate extrusion axes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSet(SmallVec<[Axis; 3]>);

impl AxisSet {
    /// All three axes, vertical first
    pub fn all() -> Self {
        Self(SmallVec::from_buf([Axis::Z, Axis::X, Axis::Y]))
    }

    /// Vertical axis only
    pub fn vertical() -> Self {
        Self::only(Axis::Z)
    }

    /// A single axis
    pub fn only(axis: Axis) -> Self {
        let mut axes = SmallVec::new();
        axes.push(axis);
        Self(axes)
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.0.contains(&axis)
    }

    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AxisSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Measured extrusion of a mesh along one axis (in mesh units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionProfile {
    /// Extrusion direction
    pub axis: Axis,
    /// Coordinate along the axis where the extrusion starts
    pub start: f64,
    /// Extent along the axis
    pub length: f64,
    /// Cross-section area perpendicular to the axis
    pub area: f64,
}

impl ExtrusionProfile {
    #[inline]
    pub fn volume(&self) -> f64 {
        self.length * self.area
    }
}

/// Find the extrusion of `mesh` along one of `axes`.
///
/// Among the axes the mesh is prismatic along, the one with the greatest
/// extent wins; ties keep the earlier axis in `axes`.
pub fn analyze_extrusion(mesh: &Mesh, axes: &AxisSet, epsilon: f64) -> Option<ExtrusionProfile> {
    let (min, max) = mesh.bounds()?;

    let mut best: Option<ExtrusionProfile> = None;
    for axis in axes.iter() {
        let direction = axis.unit();
        let start = min.coords.dot(&direction);
        let length = max.coords.dot(&direction) - start;
        if length <= epsilon || !is_prism_along(mesh, &direction, epsilon) {
            continue;
        }

        let area = section_area(mesh, &direction, start + length * 0.5);
        if area <= epsilon {
            continue;
        }

        if best.map_or(true, |b| length > b.length + epsilon) {
            best = Some(ExtrusionProfile {
                axis,
                start,
                length,
                area,
            });
        }
    }
    best
}

/// Every non-degenerate face is a side (normal perpendicular to the axis)
/// or a cap (normal parallel to it).
fn is_prism_along(mesh: &Mesh, direction: &Vector3<f64>, epsilon: f64) -> bool {
    let mut has_side = false;
    for triangle in mesh.triangles() {
        let Some(normal) = triangle.normal() else {
            continue;
        };
        let alignment = normal.dot(direction).abs();
        if alignment < epsilon {
            has_side = true;
        } else if 1.0 - alignment > epsilon {
            return false;
        }
    }
    has_side
}

/// Cross-section area on the plane `p · direction = at`.
///
/// Uses the 2D divergence theorem over the section boundary:
/// `2A = Σ (m · n) * L` for each cut segment with midpoint `m`, outward
/// normal `n` and length `L`.
fn section_area(mesh: &Mesh, direction: &Vector3<f64>, at: f64) -> f64 {
    let mut twice_area = 0.0;
    for triangle in mesh.triangles() {
        let Some(normal) = triangle.normal() else {
            continue;
        };
        let vertices = [triangle.v0, triangle.v1, triangle.v2];
        let heights = vertices.map(|v| v.coords.dot(direction) - at);

        let mut crossings: SmallVec<[Vector3<f64>; 2]> = SmallVec::new();
        for i in 0..3 {
            let j = (i + 1) % 3;
            if (heights[i] < 0.0) != (heights[j] < 0.0) {
                let t = heights[i] / (heights[i] - heights[j]);
                crossings.push(vertices[i].coords + (vertices[j] - vertices[i]) * t);
            }
        }
        if crossings.len() != 2 {
            continue;
        }

        let in_plane = normal - direction * normal.dot(direction);
        let Some(outward) = in_plane.try_normalize(f64::EPSILON) else {
            continue;
        };
        let midpoint = (crossings[0] + crossings[1]) * 0.5;
        let segment_length = (crossings[1] - crossings[0]).norm();
        twice_area += midpoint.dot(&outward) * segment_length;
    }
    (twice_area * 0.5).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::{box_mesh, ClippingProcessor, Triangle};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_box_extrudes_along_longest_axis() {
        let mesh = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 3.0, 6.0));
        let profile = analyze_extrusion(&mesh, &AxisSet::all(), EPS).unwrap();

        assert_eq!(profile.axis, Axis::Z);
        assert_relative_eq!(profile.length, 6.0);
        assert_relative_eq!(profile.area, 6.0, epsilon = 1e-9);
        assert_relative_eq!(profile.volume(), mesh.volume(), epsilon = 1e-9);
    }

    #[test]
    fn test_horizontal_duct_picks_x() {
        let mesh = box_mesh(Point3::new(0.0, 0.0, 3.0), Point3::new(10.0, 0.4, 3.3));
        let profile = analyze_extrusion(&mesh, &AxisSet::all(), EPS).unwrap();

        assert_eq!(profile.axis, Axis::X);
        assert_relative_eq!(profile.length, 10.0);
        assert_relative_eq!(profile.area, 0.4 * 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_policy_restricts_axis() {
        let mesh = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.4, 0.3));
        let profile = analyze_extrusion(&mesh, &AxisSet::vertical(), EPS).unwrap();

        assert_eq!(profile.axis, Axis::Z);
        assert_relative_eq!(profile.length, 0.3, epsilon = 1e-12);
        assert_relative_eq!(profile.area, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clipped_open_prism_is_measured() {
        let mesh = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(0.5, 0.5, 8.0));
        let clipped = ClippingProcessor::new()
            .clip_to_slab(&mesh, 3.0, 5.0)
            .unwrap();
        let profile = analyze_extrusion(&clipped, &AxisSet::vertical(), EPS).unwrap();

        assert_relative_eq!(profile.start, 3.0, epsilon = 1e-9);
        assert_relative_eq!(profile.length, 2.0, epsilon = 1e-9);
        assert_relative_eq!(profile.area, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_non_prism_is_rejected() {
        let mut mesh = Mesh::new();
        mesh.push_triangle(&Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 0.5),
        ));
        assert!(analyze_extrusion(&mesh, &AxisSet::all(), EPS).is_none());
    }

    #[test]
    fn test_empty_mesh_has_no_extrusion() {
        assert!(analyze_extrusion(&Mesh::new(), &AxisSet::all(), EPS).is_none());
    }
}
