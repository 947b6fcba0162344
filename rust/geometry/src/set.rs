// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry sets - the solids and surface meshes of one element

use crate::csg::ClippingProcessor;
use crate::error::Result;
use crate::mesh::Mesh;
use rayon::prelude::*;

/// How an item contributes to the element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Part of the element body
    Body,
    /// A void to be carved from the body (opening)
    Void,
}

/// A single solid or surface of an element
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryItem {
    /// Source geometry id, stable across clipping
    pub id: u32,
    /// Category (or subcategory) the item is drawn with
    pub category: Option<i64>,
    pub role: ItemRole,
    pub mesh: Mesh,
}

impl GeometryItem {
    pub fn body(id: u32, mesh: Mesh) -> Self {
        Self {
            id,
            category: None,
            role: ItemRole::Body,
            mesh,
        }
    }

    pub fn void(id: u32, mesh: Mesh) -> Self {
        Self {
            id,
            category: None,
            role: ItemRole::Void,
            mesh,
        }
    }

    pub fn with_category(mut self, category: i64) -> Self {
        self.category = Some(category);
        self
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.role == ItemRole::Void
    }
}

/// Solids and surface meshes of an element, or of one clipped range of it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometrySet {
    /// Closed volumes
    pub solids: Vec<GeometryItem>,
    /// Open surfaces
    pub meshes: Vec<GeometryItem>,
}

impl GeometrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solid(mut self, item: GeometryItem) -> Self {
        self.solids.push(item);
        self
    }

    pub fn with_mesh(mut self, item: GeometryItem) -> Self {
        self.meshes.push(item);
        self
    }

    /// True when the set holds no triangles at all
    pub fn is_empty(&self) -> bool {
        self.items().all(|item| item.mesh.is_empty())
    }

    /// Number of items (solids + meshes)
    pub fn len(&self) -> usize {
        self.solids.len() + self.meshes.len()
    }

    /// Iterate over solids, then meshes
    pub fn items(&self) -> impl Iterator<Item = &GeometryItem> {
        self.solids.iter().chain(self.meshes.iter())
    }

    pub fn into_items(self) -> Vec<GeometryItem> {
        let mut items = self.solids;
        items.extend(self.meshes);
        items
    }

    /// Lowest and highest z over all body items
    pub fn vertical_extent(&self) -> Option<(f64, f64)> {
        self.items()
            .filter(|item| !item.is_void())
            .filter_map(|item| item.mesh.bounds())
            .fold(None, |acc, (min, max)| match acc {
                None => Some((min.z, max.z)),
                Some((lo, hi)) => Some((lo.min(min.z), hi.max(max.z))),
            })
    }

    /// Clip every item to `min_z <= z <= max_z`, dropping items that vanish
    pub fn clip_to_slab(
        &self,
        clipper: &ClippingProcessor,
        min_z: f64,
        max_z: f64,
    ) -> Result<GeometrySet> {
        Ok(GeometrySet {
            solids: clip_items(&self.solids, clipper, min_z, max_z)?,
            meshes: clip_items(&self.meshes, clipper, min_z, max_z)?,
        })
    }
}

fn clip_items(
    items: &[GeometryItem],
    clipper: &ClippingProcessor,
    min_z: f64,
    max_z: f64,
) -> Result<Vec<GeometryItem>> {
    let clipped = items
        .par_iter()
        .map(|item| {
            let mesh = clipper.clip_to_slab(&item.mesh, min_z, max_z)?;
            Ok(GeometryItem {
                id: item.id,
                category: item.category,
                role: item.role,
                mesh,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(clipped
        .into_iter()
        .filter(|item| !item.mesh.is_empty())
        .collect())
}
