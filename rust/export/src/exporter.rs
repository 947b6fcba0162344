// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element export entry point

use crate::assembler::{assemble_instance, SegmentBody};
use crate::body::{axes_for_kind, build_segment_body, build_single_body};
use crate::calculators::CalculatorRegistry;
use crate::config::ExportOptions;
use crate::context::ExportContext;
use crate::error::{Error, Result};
use crate::extrusion::ExtrusionData;
use crate::kind::ExportKind;
use crate::model::{Element, ElementType, EntityHandle};
use crate::placement::Placement;
use crate::selector::select_range_geometry;
use crate::services::{BodyOptions, ProductCollector, Services};
use crate::split::split_ranges;
use crate::transaction::ElementTransaction;
use ifc_export_geometry::{AxisSet, GeometrySet};

/// One element to export, with its resolved type classification
#[derive(Debug, Clone, Copy)]
pub struct ElementExport<'a> {
    pub element: &'a Element,
    pub element_type: Option<&'a ElementType>,
    pub geometry: &'a GeometrySet,
    pub kind: &'a ExportKind,
    /// Predefined type passed to type and instance records
    pub predefined_type: Option<&'a str>,
}

/// Result of a successful element export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementOutcome {
    /// Instances created, in range order
    pub instances: Vec<EntityHandle>,
    /// Bodies skipped because the kind maps to no product entity
    pub skipped: usize,
}

/// Exports elements as one or more product instances
#[derive(Debug, Clone)]
pub struct Exporter {
    options: ExportOptions,
    calculators: CalculatorRegistry,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            calculators: CalculatorRegistry::standard(),
        }
    }

    pub fn with_calculators(mut self, calculators: CalculatorRegistry) -> Self {
        self.calculators = calculators;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn calculators(&self) -> &CalculatorRegistry {
        &self.calculators
    }

    /// Export one element. Returns `false` if the element was abandoned;
    /// in that case nothing reaches the collector or the context relations.
    pub fn export_element(
        &self,
        ctx: &mut ExportContext,
        services: &mut Services<'_>,
        request: &ElementExport<'_>,
        collector: &mut dyn ProductCollector,
    ) -> bool {
        match self.try_export_element(ctx, services, request, collector) {
            Ok(outcome) => {
                ctx.stats.elements_exported += 1;
                tracing::debug!(
                    element = %request.element.id,
                    instances = outcome.instances.len(),
                    skipped = outcome.skipped,
                    "Exported element"
                );
                true
            }
            Err(e) => {
                ctx.stats.elements_failed += 1;
                tracing::warn!(element = %request.element.id, error = %e, "Element export failed");
                false
            }
        }
    }

    /// Export one element, reporting why it was abandoned on failure.
    ///
    /// Records written for an abandoned element are rolled back; type styles
    /// stay cached.
    pub fn try_export_element(
        &self,
        ctx: &mut ExportContext,
        services: &mut Services<'_>,
        request: &ElementExport<'_>,
        collector: &mut dyn ProductCollector,
    ) -> Result<ElementOutcome> {
        let element = request.element;
        if let (Some(expected), Some(element_type)) = (element.type_id, request.element_type) {
            if element_type.id != expected {
                return Err(Error::TypeMismatch {
                    element: element.id,
                    expected,
                    found: element_type.id,
                });
            }
        }

        let mut txn = ElementTransaction::begin(element.id, &*services.writer);
        match self.export_bodies(ctx, services, request, &mut txn) {
            Ok(skipped) => {
                let instances = txn.commit(ctx, collector);
                Ok(ElementOutcome { instances, skipped })
            }
            Err(e) => {
                txn.abort(&mut *services.writer);
                Err(e)
            }
        }
    }

    /// Build and assemble every body of the element. Returns the number of
    /// bodies skipped.
    fn export_bodies(
        &self,
        ctx: &mut ExportContext,
        services: &mut Services<'_>,
        request: &ElementExport<'_>,
        txn: &mut ElementTransaction,
    ) -> Result<usize> {
        let ElementExport {
            element,
            element_type,
            geometry,
            kind,
            predefined_type,
        } = *request;

        let body_options = BodyOptions {
            tessellation: self.options.tessellation,
            length_scale: self.options.length_scale,
        };
        let ranges = split_ranges(
            element,
            kind,
            self.options.split_by_level,
            ctx.levels(),
            geometry.vertical_extent(),
        );

        let mut skipped = 0;

        if ranges.is_empty() {
            let mut extrusion = ExtrusionData::new(AxisSet::all());
            let shape = build_single_body(&mut *services.writer, element, geometry, &body_options, &mut extrusion)?;
            let placement = match element.level.and_then(|id| ctx.levels().get(id)) {
                Some(level) => Placement::on_level(element.transform, level),
                None => Placement::in_world(element.transform),
            };

            let body = SegmentBody {
                element,
                element_type,
                kind,
                predefined_type,
                shape,
                placement,
                extrusion,
                level: element.level,
                segment: None,
            };
            if assemble_instance(ctx, services, txn, &self.calculators, self.options.length_scale, body)?.is_none() {
                skipped += 1;
            }
            return Ok(skipped);
        }

        tracing::debug!(element = %element.id, ranges = ranges.len(), "Splitting element by level");

        for (index, range) in ranges.iter().enumerate() {
            let selection = select_range_geometry(element, geometry, range, services.clipper, services.visibility)?;

            let mut extrusion = ExtrusionData::new(axes_for_kind(kind));
            let shape = build_segment_body(
                &mut *services.writer,
                element,
                kind,
                geometry,
                &selection,
                &body_options,
                &mut extrusion,
            )?;
            let placement = match ctx.levels().get(range.level) {
                Some(level) => Placement::on_level(element.transform, level),
                None => Placement::in_world(element.transform),
            };

            let body = SegmentBody {
                element,
                element_type,
                kind,
                predefined_type,
                shape,
                placement,
                extrusion,
                level: Some(range.level),
                segment: Some(index),
            };
            if assemble_instance(ctx, services, txn, &self.calculators, self.options.length_scale, body)?.is_none() {
                skipped += 1;
            }
        }

        Ok(skipped)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}
