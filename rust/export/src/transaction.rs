// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-element staging of instance-related results
//!
//! Products and relations produced while exporting one element are held here
//! and only reach the [`ExportContext`] and the collector on commit. Records
//! already written for the element are removed from the writer on abort.
//! Dropping an unfinished transaction discards the staged work.

use crate::assembler::CollectedProduct;
use crate::context::ExportContext;
use crate::model::{ElementId, EntityHandle, SpaceId};
use crate::services::{ProductCollector, WriterCheckpoint, WriterMark};

#[derive(Debug)]
pub struct ElementTransaction {
    element: ElementId,
    /// Writer position when the element started
    mark: WriterMark,
    products: Vec<CollectedProduct>,
    type_relations: Vec<(EntityHandle, EntityHandle)>,
    space_relations: Vec<(SpaceId, EntityHandle)>,
    finished: bool,
}

impl ElementTransaction {
    /// Start staging work for `element`, remembering the writer position
    pub fn begin<W: WriterCheckpoint + ?Sized>(element: ElementId, writer: &W) -> Self {
        Self {
            element,
            mark: writer.mark(),
            products: Vec::new(),
            type_relations: Vec::new(),
            space_relations: Vec::new(),
            finished: false,
        }
    }

    pub fn stage_product(&mut self, product: CollectedProduct) {
        self.products.push(product);
    }

    pub fn stage_type_relation(&mut self, style: EntityHandle, instance: EntityHandle) {
        self.type_relations.push((style, instance));
    }

    pub fn stage_space_relation(&mut self, space: SpaceId, instance: EntityHandle) {
        self.space_relations.push((space, instance));
    }

    pub fn products(&self) -> &[CollectedProduct] {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut [CollectedProduct] {
        &mut self.products
    }

    /// Publish everything staged. Returns the committed instances in order.
    pub fn commit(mut self, ctx: &mut ExportContext, collector: &mut dyn ProductCollector) -> Vec<EntityHandle> {
        self.finished = true;

        for (style, instance) in self.type_relations.drain(..) {
            ctx.relate_type(style, instance);
        }
        for (space, instance) in self.space_relations.drain(..) {
            ctx.relate_space(space, instance);
        }

        let products = std::mem::take(&mut self.products);
        let mut instances = Vec::with_capacity(products.len());
        for product in products {
            ctx.register_instance(self.element, product.instance);
            instances.push(product.instance);
            collector.add(product);
        }
        ctx.stats.instances_created += instances.len();

        tracing::debug!(element = %self.element, instances = instances.len(), "Committed element");
        instances
    }

    /// Discard staged work and roll the writer back to where the element started
    pub fn abort<W: WriterCheckpoint + ?Sized>(mut self, writer: &mut W) {
        self.finished = true;
        writer.rollback(self.mark);
        tracing::debug!(
            element = %self.element,
            discarded = self.products.len(),
            "Rolled back element"
        );
    }
}

impl Drop for ElementTransaction {
    fn drop(&mut self) {
        if !self.finished && !self.products.is_empty() {
            tracing::debug!(
                element = %self.element,
                discarded = self.products.len(),
                "Discarding staged products"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extrusion::ExtrusionData;
    use crate::kind::EntityKind;
    use crate::memory::{InMemoryCollector, InMemoryWriter, RecordKind};
    use crate::placement::Placement;
    use crate::services::{ProductRecord, ProductWriter};
    use nalgebra::Matrix4;

    fn write_product(writer: &mut InMemoryWriter) -> CollectedProduct {
        let placement = Placement::in_world(Matrix4::identity());
        let instance = writer
            .create_instance(&ProductRecord {
                entity: EntityKind::DuctSegment,
                guid: "g".to_string(),
                name: "n".to_string(),
                description: None,
                object_type: None,
                tag: None,
                predefined_type: None,
                owner_history: None,
                placement: placement.clone(),
                shape: EntityHandle(0),
            })
            .unwrap();
        CollectedProduct {
            element: ElementId(1),
            instance,
            entity: EntityKind::DuctSegment,
            level: None,
            placement,
            extrusion: ExtrusionData::default(),
            space: None,
            type_style: None,
            quantities: Vec::new(),
        }
    }

    #[test]
    fn test_abort_removes_written_records() {
        let mut writer = InMemoryWriter::new();
        let mut ctx = ExportContext::default();
        let mut collector = InMemoryCollector::new();

        let mut committed = ElementTransaction::begin(ElementId(1), &writer);
        let product = write_product(&mut writer);
        committed.stage_product(product);
        committed.commit(&mut ctx, &mut collector);

        let mut aborted = ElementTransaction::begin(ElementId(2), &writer);
        let product = write_product(&mut writer);
        aborted.stage_product(product);
        aborted.abort(&mut writer);

        assert_eq!(writer.count(RecordKind::Product), 1);
        assert_eq!(collector.len(), 1);
        assert!(ctx.element_instances(ElementId(2)).is_empty());
    }
}
