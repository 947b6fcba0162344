// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane clipping of triangle meshes.
//!
//! Level splitting needs the part of a mesh between two horizontal planes.
//! Triangles are clipped one plane at a time; cut faces are left open.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// Plane definition for clipping
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Horizontal plane keeping everything at or above `z`
    pub fn floor(z: f64) -> Self {
        Self::new(Point3::new(0.0, 0.0, z), Vector3::z())
    }

    /// Horizontal plane keeping everything at or below `z`
    pub fn ceiling(z: f64) -> Self {
        Self::new(Point3::new(0.0, 0.0, z), -Vector3::z())
    }

    /// Signed distance from point to plane.
    /// Positive = in front, Negative = behind
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }
}

/// Triangle clipping result
#[derive(Debug, Clone)]
pub enum ClipResult {
    /// Triangle is completely in front (keep it)
    AllFront(Triangle),
    /// Triangle is completely behind (discard it)
    AllBehind,
    /// Triangle intersects plane - returns new triangles
    Split(Vec<Triangle>),
}

/// Triangle definition
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized normal; its length is twice the area
    #[inline]
    pub fn cross(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal, `None` for degenerate triangles
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.cross().try_normalize(f64::EPSILON)
    }

    /// Triangle area
    pub fn area(&self) -> f64 {
        self.cross().norm() * 0.5
    }

    #[inline]
    fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// Clips meshes against planes and horizontal slabs
#[derive(Debug, Clone, Copy)]
pub struct ClippingProcessor {
    /// Epsilon for floating point comparisons
    pub epsilon: f64,
}

impl ClippingProcessor {
    /// Create a new clipping processor
    pub fn new() -> Self {
        Self { epsilon: 1e-6 }
    }

    /// Clip a triangle against a plane.
    /// Returns the part in front of the plane, preserving winding.
    pub fn clip_triangle(&self, triangle: &Triangle, plane: &Plane) -> ClipResult {
        let vertices = triangle.vertices();
        let distances = vertices.map(|v| plane.signed_distance(&v));
        let front = distances.map(|d| d >= -self.epsilon);
        let front_count = front.iter().filter(|&&f| f).count();

        match front_count {
            0 => ClipResult::AllBehind,
            3 => ClipResult::AllFront(triangle.clone()),

            // One vertex in front - create 1 smaller triangle
            1 => {
                let k = front.iter().position(|&f| f).unwrap_or(0);
                let (a, b, c) = (k, (k + 1) % 3, (k + 2) % 3);
                let p1 = interpolate(vertices[a], vertices[b], distances[a], distances[b]);
                let p2 = interpolate(vertices[a], vertices[c], distances[a], distances[c]);
                ClipResult::Split(vec![Triangle::new(vertices[a], p1, p2)])
            }

            // Two vertices in front - create 2 triangles
            2 => {
                let k = front.iter().position(|&f| !f).unwrap_or(0);
                let (back, f1, f2) = (k, (k + 1) % 3, (k + 2) % 3);
                let p1 = interpolate(vertices[f1], vertices[back], distances[f1], distances[back]);
                let p2 = interpolate(vertices[f2], vertices[back], distances[f2], distances[back]);
                ClipResult::Split(vec![
                    Triangle::new(vertices[f1], vertices[f2], p1),
                    Triangle::new(vertices[f2], p2, p1),
                ])
            }

            _ => unreachable!(),
        }
    }

    /// Keep the part of a mesh in front of a plane
    pub fn clip_mesh(&self, mesh: &Mesh, plane: &Plane) -> Mesh {
        let mut result = Mesh::with_capacity(mesh.vertex_count(), mesh.indices.len());
        for triangle in mesh.triangles() {
            match self.clip_triangle(&triangle, plane) {
                ClipResult::AllFront(t) => result.push_triangle(&t),
                ClipResult::Split(parts) => {
                    for t in parts.iter().filter(|t| t.area() > self.epsilon * self.epsilon) {
                        result.push_triangle(t);
                    }
                }
                ClipResult::AllBehind => {}
            }
        }
        result
    }

    /// Keep the part of a mesh with `min_z <= z <= max_z`.
    ///
    /// Infinite bounds skip the corresponding plane.
    pub fn clip_to_slab(&self, mesh: &Mesh, min_z: f64, max_z: f64) -> Result<Mesh> {
        if min_z.is_nan() || max_z.is_nan() || min_z >= max_z {
            return Err(Error::InvalidRange { min_z, max_z });
        }

        let mut clipped = if min_z.is_finite() {
            self.clip_mesh(mesh, &Plane::floor(min_z))
        } else {
            mesh.clone()
        };
        if max_z.is_finite() {
            clipped = self.clip_mesh(&clipped, &Plane::ceiling(max_z));
        }
        Ok(clipped)
    }
}

impl Default for ClippingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn interpolate(from: Point3<f64>, to: Point3<f64>, d_from: f64, d_to: f64) -> Point3<f64> {
    let t = d_from / (d_from - d_to);
    from + (to - from) * t
}

/// Create a closed box mesh from AABB min/max bounds.
/// Returns 12 outward-wound triangles (2 per face).
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 36);

    let corners = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];
    for corner in corners {
        mesh.add_vertex(corner);
    }

    const FACES: [[u32; 3]; 12] = [
        [0, 2, 1], [0, 3, 2], // -Z
        [4, 5, 6], [4, 6, 7], // +Z
        [0, 4, 7], [0, 7, 3], // -X
        [1, 2, 6], [1, 6, 5], // +X
        [0, 1, 5], [0, 5, 4], // -Y
        [3, 7, 6], [3, 6, 2], // +Y
    ];
    for [a, b, c] in FACES {
        mesh.add_triangle(a, b, c);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle_at(z0: f64, z1: f64, z2: f64) -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, z0),
            Point3::new(1.0, 0.0, z1),
            Point3::new(0.0, 1.0, z2),
        )
    }

    #[test]
    fn test_clip_triangle_all_front_and_behind() {
        let clipper = ClippingProcessor::new();
        let plane = Plane::floor(0.0);

        assert!(matches!(
            clipper.clip_triangle(&unit_triangle_at(1.0, 1.0, 1.0), &plane),
            ClipResult::AllFront(_)
        ));
        assert!(matches!(
            clipper.clip_triangle(&unit_triangle_at(-1.0, -1.0, -1.0), &plane),
            ClipResult::AllBehind
        ));
    }

    #[test]
    fn test_clip_triangle_split_keeps_front_part() {
        let clipper = ClippingProcessor::new();
        let plane = Plane::floor(0.0);

        match clipper.clip_triangle(&unit_triangle_at(1.0, -1.0, -1.0), &plane) {
            ClipResult::Split(parts) => {
                assert_eq!(parts.len(), 1);
                for v in parts[0].vertices() {
                    assert!(v.z >= -1e-9);
                }
            }
            other => panic!("expected split, got {:?}", other),
        }

        match clipper.clip_triangle(&unit_triangle_at(1.0, 1.0, -1.0), &plane) {
            ClipResult::Split(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn test_split_preserves_winding() {
        let clipper = ClippingProcessor::new();
        let triangle = unit_triangle_at(1.0, 1.0, -1.0);
        let original = triangle.normal().unwrap();

        if let ClipResult::Split(parts) = clipper.clip_triangle(&triangle, &Plane::floor(0.0)) {
            for part in parts {
                assert!(part.normal().unwrap().dot(&original) > 0.99);
            }
        } else {
            panic!("expected split");
        }
    }

    #[test]
    fn test_clip_box_to_slab() {
        let clipper = ClippingProcessor::new();
        let mesh = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 6.0));

        let lower = clipper.clip_to_slab(&mesh, f64::NEG_INFINITY, 3.0).unwrap();
        let (min, max) = lower.bounds().unwrap();
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 3.0, epsilon = 1e-9);

        let upper = clipper.clip_to_slab(&mesh, 3.0, f64::INFINITY).unwrap();
        let (min, max) = upper.bounds().unwrap();
        assert_relative_eq!(min.z, 3.0, epsilon = 1e-9);
        assert_relative_eq!(max.z, 6.0);
    }

    #[test]
    fn test_clip_outside_slab_is_empty() {
        let clipper = ClippingProcessor::new();
        let mesh = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));

        let clipped = clipper.clip_to_slab(&mesh, 5.0, 8.0).unwrap();
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_invalid_slab_is_rejected() {
        let clipper = ClippingProcessor::new();
        let mesh = box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));

        assert!(clipper.clip_to_slab(&mesh, 2.0, 2.0).is_err());
        assert!(clipper.clip_to_slab(&mesh, f64::NAN, 2.0).is_err());
    }
}
