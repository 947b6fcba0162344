// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Export Geometry
//!
//! Mesh-level geometry used by the export pipeline: horizontal slab clipping
//! for level splitting and extrusion recognition for quantity derivation.

pub mod csg;
pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod set;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use csg::{box_mesh, ClipResult, ClippingProcessor, Plane, Triangle};
pub use error::{Error, Result};
pub use extrusion::{analyze_extrusion, Axis, AxisSet, ExtrusionProfile};
pub use mesh::Mesh;
pub use set::{GeometryItem, GeometrySet, ItemRole};
