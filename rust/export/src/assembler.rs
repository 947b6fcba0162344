// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Product instance assembly
//!
//! Turns a built product shape into a product occurrence: resolves the shared
//! type style, names the instance, relates it to an enclosing space, creates
//! the record, carves openings and derives quantities. Instance-related
//! results are staged in the element's [`ElementTransaction`].

use crate::calculators::{CalculatorInput, CalculatorRegistry, DerivedQuantity};
use crate::context::ExportContext;
use crate::error::{Error, Result};
use crate::extrusion::ExtrusionData;
use crate::kind::{EntityKind, ExportKind};
use crate::model::{Element, ElementId, ElementType, EntityHandle, LevelId, SpaceId};
use crate::placement::Placement;
use crate::services::{ProductRecord, Services, TypeStyleRequest};
use crate::transaction::ElementTransaction;
use crate::type_cache::TypeCacheEntry;

/// A finished product handed to the product collector
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedProduct {
    pub element: ElementId,
    pub instance: EntityHandle,
    pub entity: EntityKind,
    /// Level the product was split onto, if any
    pub level: Option<LevelId>,
    pub placement: Placement,
    /// Extrusion metadata of the product's body
    pub extrusion: ExtrusionData,
    /// Space the product is contained in; `None` means level containment
    pub space: Option<SpaceId>,
    pub type_style: Option<EntityHandle>,
    pub quantities: Vec<DerivedQuantity>,
}

impl CollectedProduct {
    pub fn is_room_related(&self) -> bool {
        self.space.is_some()
    }
}

/// One body ready to become a product instance
#[derive(Debug)]
pub struct SegmentBody<'a> {
    pub element: &'a Element,
    pub element_type: Option<&'a ElementType>,
    pub kind: &'a ExportKind,
    pub predefined_type: Option<&'a str>,
    pub shape: EntityHandle,
    pub placement: Placement,
    pub extrusion: ExtrusionData,
    pub level: Option<LevelId>,
    /// Range index for split elements
    pub segment: Option<usize>,
}

/// Assemble one product instance.
///
/// Returns `Ok(None)` when the export kind has no product entity; nothing is
/// created for such a body, though its type style may already be cached.
pub fn assemble_instance(
    ctx: &mut ExportContext,
    services: &mut Services<'_>,
    txn: &mut ElementTransaction,
    calculators: &CalculatorRegistry,
    length_scale: f64,
    body: SegmentBody<'_>,
) -> Result<Option<EntityHandle>> {
    let SegmentBody {
        element,
        element_type,
        kind,
        predefined_type,
        shape,
        mut placement,
        extrusion,
        level,
        segment,
    } = body;

    let type_style = element_type.and_then(|t| resolve_type_style(ctx, services, t, kind, predefined_type));

    let naming = services.naming;
    let guid = naming.instance_guid(element, segment);
    let name = naming.instance_name(element);
    let object_type = naming.object_type(element, element_type);
    let description = naming.description(element);
    let tag = naming.tag(element);

    let mut space = None;
    if !kind.is_distribution_flow() {
        if let Some(found) = services.spaces.find_enclosing_space(element, &placement) {
            match placement.relative_to_space(&found) {
                Some(relative) => {
                    placement = relative;
                    space = Some(found.id);
                }
                None => {
                    tracing::warn!(
                        element = %element.id,
                        space = %found.id,
                        "Space frame is singular, keeping level containment"
                    );
                }
            }
        }
    }

    let Some(entity) = kind.entity_kind() else {
        tracing::debug!(element = %element.id, kind = %kind, "No product entity for export kind");
        ctx.stats.ranges_skipped += 1;
        return Ok(None);
    };

    let record = ProductRecord {
        entity,
        guid,
        name,
        description,
        object_type,
        tag,
        predefined_type: predefined_type.map(str::to_owned),
        owner_history: ctx.owner_history(),
        placement: placement.clone(),
        shape,
    };
    let instance = services
        .writer
        .create_instance(&record)
        .ok_or(Error::InstanceCreationFailed(element.id))?;

    if let Some(space) = space {
        txn.stage_space_relation(space, instance);
    }

    services.writer.carve(instance, element, &extrusion);

    if let Some(style) = type_style {
        txn.stage_type_relation(style, instance);
    }

    txn.stage_product(CollectedProduct {
        element: element.id,
        instance,
        entity,
        level,
        placement,
        extrusion,
        space,
        type_style,
        quantities: Vec::new(),
    });

    for product in txn.products_mut() {
        let input = CalculatorInput {
            extrusion: Some(&product.extrusion),
            element,
            element_type,
            length_scale,
        };
        product.quantities = calculators.derive_all(&input);
    }

    tracing::debug!(
        element = %element.id,
        instance = %instance,
        entity = %entity,
        segment = ?segment,
        "Assembled product instance"
    );
    Ok(Some(instance))
}

/// Find the shared type style for `(element_type, kind)`, creating and
/// caching it on first use. A failed build is not cached, so later elements
/// retry.
fn resolve_type_style(
    ctx: &mut ExportContext,
    services: &mut Services<'_>,
    element_type: &ElementType,
    kind: &ExportKind,
    predefined_type: Option<&str>,
) -> Option<EntityHandle> {
    if let Some(entry) = ctx.type_cache.find(element_type.id, kind) {
        return Some(entry.style);
    }

    let request = TypeStyleRequest {
        kind,
        predefined_type,
        type_id: element_type.id,
        guid: services.naming.type_guid(element_type, kind),
        name: services.naming.type_name(element_type),
        owner_history: ctx.owner_history(),
    };

    let Some(style) = services.writer.build_type_style(&request) else {
        tracing::warn!(element_type = %element_type.id, kind = %kind, "Type style could not be built");
        return None;
    };

    ctx.stats.type_styles_created += 1;
    let entry = ctx
        .type_cache
        .register(element_type.id, kind, TypeCacheEntry { style });
    Some(entry.style)
}
