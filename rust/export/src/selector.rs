// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-range geometry selection: clip to the range, then drop hidden items

use crate::error::{Error, Result};
use crate::model::Element;
use crate::services::{GeometryClipper, VisibilityFilter};
use crate::split::LevelRange;
use ifc_export_geometry::{ClippingProcessor, GeometryItem, GeometrySet};
use rustc_hash::FxHashSet;

/// Select the visible geometry of `element` inside `range`.
///
/// An empty result means the range cut nothing out of the element; callers
/// fall back to the full source geometry. Geometry that exists in the range
/// but is entirely hidden is an error.
pub fn select_range_geometry(
    element: &Element,
    geometry: &GeometrySet,
    range: &LevelRange,
    clipper: &dyn GeometryClipper,
    visibility: &dyn VisibilityFilter,
) -> Result<Vec<GeometryItem>> {
    let clipped = clipper.clip(geometry, range)?;
    if clipped.is_empty() {
        tracing::debug!(
            element = %element.id,
            level = %range.level,
            "Range clip produced no geometry"
        );
        return Ok(Vec::new());
    }

    let clipped_items = clipped.len();
    let visible = visibility.filter_visible(clipped);
    if visible.is_empty() {
        tracing::warn!(
            element = %element.id,
            level = %range.level,
            clipped_items,
            "All clipped geometry is hidden"
        );
        return Err(Error::GeometrySuppressed {
            element: element.id,
            level: range.level,
        });
    }

    Ok(visible)
}

/// Clips geometry to the vertical slab of a level range
#[derive(Debug, Clone, Copy, Default)]
pub struct SlabClipper {
    processor: ClippingProcessor,
}

impl SlabClipper {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeometryClipper for SlabClipper {
    fn clip(&self, geometry: &GeometrySet, range: &LevelRange) -> ifc_export_geometry::Result<GeometrySet> {
        geometry.clip_to_slab(&self.processor, range.start, range.end)
    }
}

/// Hides items whose category is switched off
#[derive(Debug, Clone, Default)]
pub struct CategoryVisibilityFilter {
    hidden: FxHashSet<i64>,
}

impl CategoryVisibilityFilter {
    /// Filter that shows everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide(mut self, category: i64) -> Self {
        self.hidden.insert(category);
        self
    }

    pub fn is_hidden(&self, category: Option<i64>) -> bool {
        category.is_some_and(|c| self.hidden.contains(&c))
    }
}

impl VisibilityFilter for CategoryVisibilityFilter {
    fn filter_visible(&self, geometry: GeometrySet) -> Vec<GeometryItem> {
        geometry
            .into_items()
            .into_iter()
            .filter(|item| !self.is_hidden(item.category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LevelId;
    use ifc_export_geometry::{box_mesh, Point3};

    fn column(category: i64) -> GeometrySet {
        GeometrySet::new().with_solid(
            GeometryItem::body(1, box_mesh(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 6.0)))
                .with_category(category),
        )
    }

    #[test]
    fn test_selects_clipped_visible_items() {
        let range = LevelRange::new(LevelId(1), 0.0, 3.0);
        let selected = select_range_geometry(
            &Element::new(1),
            &column(5),
            &range,
            &SlabClipper::new(),
            &CategoryVisibilityFilter::new(),
        )
        .unwrap();

        assert_eq!(selected.len(), 1);
        let (min, max) = selected[0].mesh.bounds().unwrap();
        assert!(min.z >= -1e-9);
        assert!(max.z <= 3.0 + 1e-9);
    }

    #[test]
    fn test_range_outside_geometry_selects_nothing() {
        let range = LevelRange::new(LevelId(3), 10.0, 20.0);
        let selected = select_range_geometry(
            &Element::new(1),
            &column(5),
            &range,
            &SlabClipper::new(),
            &CategoryVisibilityFilter::new().hide(5),
        )
        .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_hidden_geometry_is_suppressed() {
        let range = LevelRange::new(LevelId(2), 3.0, 6.0);
        let result = select_range_geometry(
            &Element::new(4),
            &column(5),
            &range,
            &SlabClipper::new(),
            &CategoryVisibilityFilter::new().hide(5),
        );
        assert!(matches!(
            result,
            Err(Error::GeometrySuppressed { level: LevelId(2), .. })
        ));
    }

    #[test]
    fn test_items_without_category_stay_visible() {
        let filter = CategoryVisibilityFilter::new().hide(5);
        assert!(!filter.is_hidden(None));
        assert!(filter.is_hidden(Some(5)));
    }
}
