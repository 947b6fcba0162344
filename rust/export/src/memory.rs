// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory collaborators
//!
//! A record writer that keeps everything it creates in memory, plus simple
//! naming, space lookup and product collection. Useful for embedding the
//! exporter without a file writer and for testing. The writer can be told to
//! reject individual record kinds to exercise failure paths.

use crate::assembler::CollectedProduct;
use crate::extrusion::{ExtrusionData, OpeningData};
use crate::kind::ExportKind;
use crate::model::{Element, ElementType, ElementTypeId, EntityHandle, Space};
use crate::placement::Placement;
use crate::services::{
    BodyRequest, NamingService, OpeningCarver, ProductCollector, ProductRecord, ProductWriter,
    RepresentationBuilder, SpaceResolver, StyleBuilder, TypeStyleRequest, WriterCheckpoint, WriterMark,
};
use ifc_export_geometry::{analyze_extrusion, Mesh, Point3};

/// Tolerance used when recognizing extrusions in written bodies
const EXTRUSION_TOLERANCE: f64 = 1e-6;

/// Kind of a record created by [`InMemoryWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    ProductShape,
    Body,
    ShapeWrapper,
    TypeStyle,
    Product,
    Opening,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRecord {
    pub handle: EntityHandle,
    pub type_id: ElementTypeId,
    pub kind: ExportKind,
    pub predefined_type: Option<String>,
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpeningRecord {
    pub handle: EntityHandle,
    pub instance: EntityHandle,
    pub opening: OpeningData,
}

/// Record writer backed by vectors
#[derive(Debug, Default)]
pub struct InMemoryWriter {
    next_handle: u32,
    records: Vec<(EntityHandle, RecordKind)>,
    styles: Vec<StyleRecord>,
    products: Vec<(EntityHandle, ProductRecord)>,
    openings: Vec<OpeningRecord>,
    /// Make `build_product_shape` fail
    pub reject_product_shapes: bool,
    /// Make `build_body` fail
    pub reject_bodies: bool,
    /// Make `wrap_product_shape` fail
    pub reject_wrappers: bool,
    /// Make `build_type_style` fail
    pub reject_styles: bool,
    /// Make `create_instance` fail
    pub reject_instances: bool,
}

impl InMemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[(EntityHandle, RecordKind)] {
        &self.records
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.records.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn styles(&self) -> &[StyleRecord] {
        &self.styles
    }

    pub fn products(&self) -> &[(EntityHandle, ProductRecord)] {
        &self.products
    }

    pub fn product(&self, handle: EntityHandle) -> Option<&ProductRecord> {
        self.products.iter().find(|(h, _)| *h == handle).map(|(_, r)| r)
    }

    pub fn openings(&self) -> &[OpeningRecord] {
        &self.openings
    }

    fn allocate(&mut self, kind: RecordKind) -> EntityHandle {
        self.next_handle += 1;
        let handle = EntityHandle(self.next_handle);
        self.records.push((handle, kind));
        handle
    }

    /// Merge the body items of a request, recording extrusion and void data.
    /// Returns `None` when there is no body geometry.
    fn analyze(request: &BodyRequest<'_>, extrusion: &mut ExtrusionData) -> Option<()> {
        let mut body = Mesh::new();
        for item in request.source.items() {
            if item.is_void() {
                if let Some((min, max)) = item.mesh.bounds() {
                    extrusion.add_opening(OpeningData {
                        source_id: item.id,
                        min: scale_point(min, request.options.length_scale),
                        max: scale_point(max, request.options.length_scale),
                    });
                }
            } else {
                body.merge(&item.mesh);
            }
        }

        if body.is_empty() {
            return None;
        }
        if let Some(profile) = analyze_extrusion(&body, &extrusion.possible_axes, EXTRUSION_TOLERANCE) {
            extrusion.record_profile(&profile, request.options.length_scale);
        }
        Some(())
    }
}

fn scale_point(point: Point3<f64>, scale: f64) -> Point3<f64> {
    Point3::from(point.coords * scale)
}

impl RepresentationBuilder for InMemoryWriter {
    fn build_product_shape(&mut self, request: &BodyRequest<'_>, extrusion: &mut ExtrusionData) -> Option<EntityHandle> {
        if self.reject_product_shapes {
            return None;
        }
        Self::analyze(request, extrusion)?;
        Some(self.allocate(RecordKind::ProductShape))
    }

    fn build_body(&mut self, request: &BodyRequest<'_>, extrusion: &mut ExtrusionData) -> Option<EntityHandle> {
        if self.reject_bodies {
            return None;
        }
        Self::analyze(request, extrusion)?;
        Some(self.allocate(RecordKind::Body))
    }

    fn wrap_product_shape(&mut self, _body: EntityHandle) -> Option<EntityHandle> {
        if self.reject_wrappers {
            return None;
        }
        Some(self.allocate(RecordKind::ShapeWrapper))
    }
}

impl StyleBuilder for InMemoryWriter {
    fn build_type_style(&mut self, request: &TypeStyleRequest<'_>) -> Option<EntityHandle> {
        if self.reject_styles {
            return None;
        }
        let handle = self.allocate(RecordKind::TypeStyle);
        self.styles.push(StyleRecord {
            handle,
            type_id: request.type_id,
            kind: request.kind.clone(),
            predefined_type: request.predefined_type.map(str::to_owned),
            guid: request.guid.clone(),
            name: request.name.clone(),
        });
        Some(handle)
    }
}

impl ProductWriter for InMemoryWriter {
    fn create_instance(&mut self, record: &ProductRecord) -> Option<EntityHandle> {
        if self.reject_instances {
            return None;
        }
        let handle = self.allocate(RecordKind::Product);
        self.products.push((handle, record.clone()));
        Some(handle)
    }
}

impl OpeningCarver for InMemoryWriter {
    fn carve(&mut self, instance: EntityHandle, _element: &Element, extrusion: &ExtrusionData) {
        for opening in &extrusion.openings {
            let handle = self.allocate(RecordKind::Opening);
            self.openings.push(OpeningRecord {
                handle,
                instance,
                opening: opening.clone(),
            });
        }
    }
}

impl WriterCheckpoint for InMemoryWriter {
    fn mark(&self) -> WriterMark {
        WriterMark(u64::from(self.next_handle))
    }

    fn rollback(&mut self, mark: WriterMark) {
        let kept = |handle: EntityHandle| u64::from(handle.0) <= mark.0;
        self.records
            .retain(|(handle, kind)| kept(*handle) || *kind == RecordKind::TypeStyle);
        self.products.retain(|(handle, _)| kept(*handle));
        self.openings.retain(|opening| kept(opening.handle));
    }
}

/// Collects products in arrival order
#[derive(Debug, Default)]
pub struct InMemoryCollector {
    pub products: Vec<CollectedProduct>,
}

impl InMemoryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCollector for InMemoryCollector {
    fn add(&mut self, product: CollectedProduct) {
        self.products.push(product);
    }
}

/// Deterministic GUIDs derived from element and type ids
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicNaming;

impl NamingService for DeterministicNaming {
    fn instance_guid(&self, element: &Element, segment: Option<usize>) -> String {
        match segment {
            Some(index) => format!("E{:016X}S{:03}", element.id.0, index),
            None => format!("E{:016X}", element.id.0),
        }
    }

    fn instance_name(&self, element: &Element) -> String {
        format!("Element {}", element.id)
    }

    fn type_guid(&self, element_type: &ElementType, kind: &ExportKind) -> String {
        format!("T{:016X}{}", element_type.id.0, kind.type_name())
    }
}

/// Resolves spaces by axis-aligned boxes around the element origin
#[derive(Debug, Clone, Default)]
pub struct BoxSpaceResolver {
    spaces: Vec<(Space, Point3<f64>, Point3<f64>)>,
}

impl BoxSpaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_space(mut self, space: Space, min: Point3<f64>, max: Point3<f64>) -> Self {
        self.spaces.push((space, min, max));
        self
    }
}

impl SpaceResolver for BoxSpaceResolver {
    fn find_enclosing_space(&self, _element: &Element, placement: &Placement) -> Option<Space> {
        let origin = Point3::from(placement.world.fixed_view::<3, 1>(0, 3).into_owned());
        self.spaces
            .iter()
            .find(|(_, min, max)| {
                (0..3).all(|i| origin[i] >= min[i] && origin[i] <= max[i])
            })
            .map(|(space, _, _)| space.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TessellationLevel;
    use crate::model::{ElementId, SpaceId};
    use crate::services::{BodyOptions, BodySource};
    use approx::assert_relative_eq;
    use ifc_export_geometry::{box_mesh, Axis, AxisSet, GeometryItem, GeometrySet, Matrix4, Vector3};

    fn options(length_scale: f64) -> BodyOptions {
        BodyOptions {
            tessellation: TessellationLevel::Medium,
            length_scale,
        }
    }

    #[test]
    fn test_body_records_scaled_extrusion_and_voids() {
        let geometry = GeometrySet::new()
            .with_solid(GeometryItem::body(
                1,
                box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 1.0, 2.0)),
            ))
            .with_solid(GeometryItem::void(
                2,
                box_mesh(Point3::new(4.0, 0.0, 0.0), Point3::new(5.0, 1.0, 1.0)),
            ));
        let opts = options(0.5);
        let request = BodyRequest {
            element: ElementId(1),
            category: 0,
            source: BodySource::Full(&geometry),
            options: &opts,
        };
        let mut writer = InMemoryWriter::new();
        let mut extrusion = ExtrusionData::new(AxisSet::all());

        assert!(writer.build_body(&request, &mut extrusion).is_some());
        assert_eq!(extrusion.axis, Some(Axis::X));
        assert_relative_eq!(extrusion.scaled_length, 5.0, epsilon = 1e-9);
        assert_relative_eq!(extrusion.scaled_area, 0.5, epsilon = 1e-9);
        assert_eq!(extrusion.openings.len(), 1);
        assert_relative_eq!(extrusion.openings[0].max.x, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_voids_only_is_not_a_body() {
        let geometry = GeometrySet::new().with_solid(GeometryItem::void(
            1,
            box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0)),
        ));
        let opts = options(1.0);
        let request = BodyRequest {
            element: ElementId(1),
            category: 0,
            source: BodySource::Full(&geometry),
            options: &opts,
        };
        let mut writer = InMemoryWriter::new();

        assert!(writer
            .build_product_shape(&request, &mut ExtrusionData::default())
            .is_none());
        assert!(writer.records().is_empty());
    }

    #[test]
    fn test_box_space_resolver_uses_world_origin() {
        let resolver = BoxSpaceResolver::new().with_space(
            Space {
                id: SpaceId(3),
                frame: Matrix4::identity(),
            },
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 5.0, 3.0),
        );
        let element = Element::new(1);

        let inside = Placement::in_world(Matrix4::new_translation(&Vector3::new(1.0, 1.0, 1.0)));
        let outside = Placement::in_world(Matrix4::new_translation(&Vector3::new(9.0, 1.0, 1.0)));
        assert_eq!(
            resolver.find_enclosing_space(&element, &inside).map(|s| s.id),
            Some(SpaceId(3))
        );
        assert!(resolver.find_enclosing_space(&element, &outside).is_none());
    }

    #[test]
    fn test_rollback_keeps_styles_and_earlier_records() {
        let mut writer = InMemoryWriter::new();
        let kind = ExportKind::DuctSegmentType;
        let style_request = |type_id: u64| TypeStyleRequest {
            kind: &kind,
            predefined_type: None,
            type_id: ElementTypeId(type_id),
            guid: format!("T{}", type_id),
            name: "Duct".to_string(),
            owner_history: None,
        };

        let earlier = writer.wrap_product_shape(EntityHandle(0)).unwrap();
        let mark = writer.mark();
        writer.build_type_style(&style_request(1)).unwrap();
        writer.wrap_product_shape(EntityHandle(0)).unwrap();
        writer.rollback(mark);

        assert_eq!(writer.records().len(), 2);
        assert_eq!(writer.records()[0], (earlier, RecordKind::ShapeWrapper));
        assert_eq!(writer.count(RecordKind::TypeStyle), 1);
        assert_eq!(writer.count(RecordKind::ShapeWrapper), 1);

        // Handles are never reused after a rollback
        let next = writer.wrap_product_shape(EntityHandle(0)).unwrap();
        assert!(next.0 > mark.0 as u32 + 2);
    }

    #[test]
    fn test_segment_guids_are_distinct() {
        let naming = DeterministicNaming;
        let element = Element::new(42);
        assert_ne!(
            naming.instance_guid(&element, Some(0)),
            naming.instance_guid(&element, Some(1))
        );
        assert_ne!(naming.instance_guid(&element, None), naming.instance_guid(&element, Some(0)));
    }
}
