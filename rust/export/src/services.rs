// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collaborator interfaces consumed by the export pipeline
//!
//! The geometry kernel, the record writer, naming and spatial containment are
//! owned by the host application. The pipeline only talks to them through the
//! traits in this module, bundled per call in [`Services`].

use crate::assembler::CollectedProduct;
use crate::config::TessellationLevel;
use crate::extrusion::ExtrusionData;
use crate::kind::{EntityKind, ExportKind};
use crate::model::{Element, ElementId, ElementType, ElementTypeId, EntityHandle, Space};
use crate::placement::Placement;
use crate::split::LevelRange;
use ifc_export_geometry::{GeometryItem, GeometrySet};

/// Geometry kernel: cut an element's geometry to a vertical range
pub trait GeometryClipper {
    fn clip(&self, geometry: &GeometrySet, range: &LevelRange) -> ifc_export_geometry::Result<GeometrySet>;
}

/// Drops items hidden in the current view/category context
pub trait VisibilityFilter {
    fn filter_visible(&self, geometry: GeometrySet) -> Vec<GeometryItem>;
}

/// Per-call options for body representation building
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyOptions {
    pub tessellation: TessellationLevel,
    /// Scale applied to lengths written into extrusion metadata
    pub length_scale: f64,
}

/// Geometry a body is built from
#[derive(Debug, Clone, Copy)]
pub enum BodySource<'a> {
    /// Visible items selected for one range
    Selected(&'a [GeometryItem]),
    /// The element's full, unclipped geometry
    Full(&'a GeometrySet),
}

impl<'a> BodySource<'a> {
    pub fn items(&self) -> Vec<&'a GeometryItem> {
        match *self {
            BodySource::Selected(items) => items.iter().collect(),
            BodySource::Full(set) => set.items().collect(),
        }
    }
}

/// Body construction request
#[derive(Debug, Clone, Copy)]
pub struct BodyRequest<'a> {
    pub element: ElementId,
    pub category: i64,
    pub source: BodySource<'a>,
    pub options: &'a BodyOptions,
}

/// Builds body representations.
///
/// Implementations may fill `extrusion` with the recognized extrusion and
/// with opening data for voids found in the source geometry. Candidate
/// extrusion axes are given by `extrusion.possible_axes`.
pub trait RepresentationBuilder {
    /// Extrusion-aware representation wrapped as a product definition shape
    fn build_product_shape(
        &mut self,
        request: &BodyRequest<'_>,
        extrusion: &mut ExtrusionData,
    ) -> Option<EntityHandle>;

    /// Generic (tessellated where needed) body representation
    fn build_body(&mut self, request: &BodyRequest<'_>, extrusion: &mut ExtrusionData) -> Option<EntityHandle>;

    /// Wrap a body representation into a product definition shape
    fn wrap_product_shape(&mut self, body: EntityHandle) -> Option<EntityHandle>;
}

/// GUIDs and display strings. Pure functions of their arguments.
pub trait NamingService {
    /// GUID of an instance; `segment` is the range index for split elements
    fn instance_guid(&self, element: &Element, segment: Option<usize>) -> String;

    fn instance_name(&self, element: &Element) -> String;

    fn object_type(&self, _element: &Element, element_type: Option<&ElementType>) -> Option<String> {
        element_type.map(|t| t.name.clone())
    }

    /// Description override
    fn description(&self, _element: &Element) -> Option<String> {
        None
    }

    /// Tag override
    fn tag(&self, element: &Element) -> Option<String> {
        Some(element.id.to_string())
    }

    fn type_guid(&self, element_type: &ElementType, kind: &ExportKind) -> String;

    fn type_name(&self, element_type: &ElementType) -> String {
        element_type.name.clone()
    }
}

/// Spatial containment: which space, if any, encloses an element
pub trait SpaceResolver {
    fn find_enclosing_space(&self, element: &Element, placement: &Placement) -> Option<Space>;
}

/// Attributes of a shared type style record
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStyleRequest<'a> {
    pub kind: &'a ExportKind,
    pub predefined_type: Option<&'a str>,
    pub type_id: ElementTypeId,
    pub guid: String,
    pub name: String,
    pub owner_history: Option<EntityHandle>,
}

pub trait StyleBuilder {
    fn build_type_style(&mut self, request: &TypeStyleRequest<'_>) -> Option<EntityHandle>;
}

/// Attributes of one product occurrence record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub entity: EntityKind,
    pub guid: String,
    pub name: String,
    pub description: Option<String>,
    pub object_type: Option<String>,
    pub tag: Option<String>,
    pub predefined_type: Option<String>,
    pub owner_history: Option<EntityHandle>,
    pub placement: Placement,
    pub shape: EntityHandle,
}

pub trait ProductWriter {
    fn create_instance(&mut self, record: &ProductRecord) -> Option<EntityHandle>;
}

/// Carves openings recorded in extrusion metadata out of a finished instance
pub trait OpeningCarver {
    fn carve(&mut self, instance: EntityHandle, element: &Element, extrusion: &ExtrusionData);
}

/// Position in the output that records written afterwards can be rolled back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WriterMark(pub u64);

/// Checkpointing of written records
pub trait WriterCheckpoint {
    fn mark(&self) -> WriterMark;

    /// Remove every record written after `mark` except type styles, which
    /// are shared across elements and stay cached.
    fn rollback(&mut self, mark: WriterMark);
}

/// Everything that creates records in the output file
pub trait RecordWriter:
    RepresentationBuilder + StyleBuilder + ProductWriter + OpeningCarver + WriterCheckpoint
{
}

impl<T> RecordWriter for T where
    T: RepresentationBuilder + StyleBuilder + ProductWriter + OpeningCarver + WriterCheckpoint
{
}

/// Receives products once their element has been exported completely
pub trait ProductCollector {
    fn add(&mut self, product: CollectedProduct);
}

/// Collaborators for one export call
pub struct Services<'a> {
    pub clipper: &'a dyn GeometryClipper,
    pub visibility: &'a dyn VisibilityFilter,
    pub naming: &'a dyn NamingService,
    pub spaces: &'a dyn SpaceResolver,
    pub writer: &'a mut dyn RecordWriter,
}
