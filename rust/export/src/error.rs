// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::{ElementId, ElementTypeId, LevelId};
use thiserror::Error;

/// Result type for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an element export is aborted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Element {element} references type {expected}, but type {found} was supplied")]
    TypeMismatch {
        element: ElementId,
        expected: ElementTypeId,
        found: ElementTypeId,
    },

    #[error("Element {element}: all geometry clipped to level {level} is hidden")]
    GeometrySuppressed { element: ElementId, level: LevelId },

    #[error("Element {0}: body representation could not be built")]
    RepresentationFailed(ElementId),

    #[error("Element {0}: product definition shape could not be built")]
    ProductShapeFailed(ElementId),

    #[error("Element {0}: product instance could not be created")]
    InstanceCreationFailed(ElementId),

    #[error("Geometry error: {0}")]
    Geometry(#[from] ifc_export_geometry::Error),
}
