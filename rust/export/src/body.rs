// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Body representation building for whole elements and level segments

use crate::error::{Error, Result};
use crate::extrusion::ExtrusionData;
use crate::kind::ExportKind;
use crate::model::{Element, EntityHandle};
use crate::services::{BodyOptions, BodyRequest, BodySource, RepresentationBuilder};
use ifc_export_geometry::{AxisSet, GeometryItem, GeometrySet};

/// Candidate extrusion axes for a segment of `kind`
pub fn axes_for_kind(kind: &ExportKind) -> AxisSet {
    if kind.is_vertical_extrusion() {
        AxisSet::vertical()
    } else {
        AxisSet::all()
    }
}

/// Build the product shape of an unsplit element from its full geometry
pub fn build_single_body<B: RepresentationBuilder + ?Sized>(
    builder: &mut B,
    element: &Element,
    geometry: &GeometrySet,
    options: &BodyOptions,
    extrusion: &mut ExtrusionData,
) -> Result<EntityHandle> {
    extrusion.possible_axes = AxisSet::all();
    let request = BodyRequest {
        element: element.id,
        category: element.category,
        source: BodySource::Full(geometry),
        options,
    };

    builder.build_product_shape(&request, extrusion).ok_or_else(|| {
        tracing::warn!(element = %element.id, "Body representation failed");
        Error::RepresentationFailed(element.id)
    })
}

/// Build the product shape of one level segment.
///
/// Uses the selected items when there are any, the full source geometry
/// otherwise. Openings gathered during a failed build are discarded.
pub fn build_segment_body<B: RepresentationBuilder + ?Sized>(
    builder: &mut B,
    element: &Element,
    kind: &ExportKind,
    geometry: &GeometrySet,
    selection: &[GeometryItem],
    options: &BodyOptions,
    extrusion: &mut ExtrusionData,
) -> Result<EntityHandle> {
    extrusion.possible_axes = axes_for_kind(kind);
    let source = if selection.is_empty() {
        BodySource::Full(geometry)
    } else {
        BodySource::Selected(selection)
    };
    let request = BodyRequest {
        element: element.id,
        category: element.category,
        source,
        options,
    };

    let Some(body) = builder.build_body(&request, extrusion) else {
        extrusion.clear_openings();
        tracing::warn!(element = %element.id, kind = %kind, "Segment body failed");
        return Err(Error::RepresentationFailed(element.id));
    };

    match builder.wrap_product_shape(body) {
        Some(shape) => Ok(shape),
        None => {
            extrusion.clear_openings();
            tracing::warn!(element = %element.id, kind = %kind, "Segment product shape failed");
            Err(Error::ProductShapeFailed(element.id))
        }
    }
}
