// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Element Export
//!
//! Exports modeled building elements as IFC product occurrences. An element
//! may be split at level boundaries into several segment products, each with
//! its own body, placement and quantities; all products of an element share
//! one cached type style.
//!
//! ```ignore
//! let exporter = Exporter::new(ExportOptions::from_env());
//! let mut ctx = ExportContext::new(levels);
//! let ok = exporter.export_element(&mut ctx, &mut services, &request, &mut collector);
//! ```

pub mod assembler;
pub mod body;
pub mod calculators;
pub mod config;
pub mod context;
pub mod error;
pub mod exporter;
pub mod extrusion;
pub mod kind;
pub mod memory;
pub mod model;
pub mod placement;
pub mod selector;
pub mod services;
pub mod split;
pub mod transaction;
pub mod type_cache;

pub use assembler::CollectedProduct;
pub use calculators::{CalculatorFn, CalculatorInput, CalculatorRegistry, DerivedQuantity, QuantityKind, QUANTITY_EPSILON};
pub use config::{ExportOptions, TessellationLevel};
pub use context::{ExportContext, ExportStats, SystemMember};
pub use error::{Error, Result};
pub use exporter::{ElementExport, ElementOutcome, Exporter};
pub use extrusion::{ExtrusionData, OpeningData};
pub use kind::{EntityKind, ExportKind};
pub use model::{
    Element, ElementId, ElementType, ElementTypeId, EntityHandle, Level, LevelId, LevelTable, Parameters, Space,
    SpaceId,
};
pub use placement::{Placement, PlacementParent};
pub use selector::{select_range_geometry, CategoryVisibilityFilter, SlabClipper};
pub use services::{
    BodyOptions, BodyRequest, BodySource, GeometryClipper, NamingService, OpeningCarver, ProductCollector,
    ProductRecord, ProductWriter, RecordWriter, RepresentationBuilder, Services, SpaceResolver, StyleBuilder,
    TypeStyleRequest, VisibilityFilter, WriterCheckpoint, WriterMark,
};
pub use split::{split_ranges, LevelRange};
pub use type_cache::{TypeCache, TypeCacheEntry, TypeKey};
