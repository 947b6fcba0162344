// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quantity calculators
//!
//! A calculator derives one quantity for an exported product from its
//! extrusion metadata, falling back to element or type parameters. Values at
//! or below [`QUANTITY_EPSILON`] count as "no value". Calculators are plain
//! function pointers registered with a priority; for each quantity the first
//! calculator (lowest priority number) that yields a value wins.

mod area;
mod length;
mod volume;

pub use area::{cross_section_area, CROSS_SECTION_AREA_PARAMETER};
pub use length::{length, EXTRUSION_LENGTH_PARAMETER, LENGTH_PARAMETER};
pub use volume::{gross_volume, VOLUME_PARAMETER};

use crate::extrusion::ExtrusionData;
use crate::model::{lookup_parameter, Element, ElementType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Values must be strictly greater than this to count as computed
pub const QUANTITY_EPSILON: f64 = 1e-6;

/// Everything a calculator may read
#[derive(Debug, Clone, Copy)]
pub struct CalculatorInput<'a> {
    pub extrusion: Option<&'a ExtrusionData>,
    pub element: &'a Element,
    pub element_type: Option<&'a ElementType>,
    /// Scale from source length units to export units
    pub length_scale: f64,
}

impl CalculatorInput<'_> {
    pub fn parameter(&self, name: &str) -> Option<f64> {
        lookup_parameter(self.element, self.element_type, name)
    }
}

/// A calculator returns `Some(value)` only for values above [`QUANTITY_EPSILON`]
pub type CalculatorFn = fn(&CalculatorInput<'_>) -> Option<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Length,
    CrossSectionArea,
    GrossVolume,
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityKind::Length => write!(f, "Length"),
            QuantityKind::CrossSectionArea => write!(f, "CrossSectionArea"),
            QuantityKind::GrossVolume => write!(f, "GrossVolume"),
        }
    }
}

#[derive(Clone, Copy)]
struct Calculator {
    quantity: QuantityKind,
    priority: u32,
    compute: CalculatorFn,
}

impl fmt::Debug for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculator")
            .field("quantity", &self.quantity)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuantity {
    pub quantity: QuantityKind,
    pub value: f64,
}

/// Calculators ordered by priority
#[derive(Debug, Clone, Default)]
pub struct CalculatorRegistry {
    calculators: Vec<Calculator>,
}

impl CalculatorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in length, area and volume calculators
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(QuantityKind::Length, 100, length);
        registry.register(QuantityKind::CrossSectionArea, 100, cross_section_area);
        registry.register(QuantityKind::GrossVolume, 100, gross_volume);
        registry
    }

    /// Add a calculator. Equal priorities keep registration order.
    pub fn register(&mut self, quantity: QuantityKind, priority: u32, compute: CalculatorFn) {
        self.calculators.push(Calculator {
            quantity,
            priority,
            compute,
        });
        self.calculators.sort_by_key(|c| c.priority);
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// First value above epsilon for `quantity`, in priority order
    pub fn compute(&self, quantity: QuantityKind, input: &CalculatorInput<'_>) -> Option<f64> {
        self.calculators
            .iter()
            .filter(|c| c.quantity == quantity)
            .find_map(|c| (c.compute)(input).filter(|v| exceeds_epsilon(*v)))
    }

    /// Every quantity at least one calculator can produce for `input`
    pub fn derive_all(&self, input: &CalculatorInput<'_>) -> Vec<DerivedQuantity> {
        let mut quantities: Vec<QuantityKind> = Vec::new();
        for calculator in &self.calculators {
            if !quantities.contains(&calculator.quantity) {
                quantities.push(calculator.quantity);
            }
        }

        quantities
            .into_iter()
            .filter_map(|quantity| {
                self.compute(quantity, input)
                    .map(|value| DerivedQuantity { quantity, value })
            })
            .collect()
    }
}

#[inline]
pub(crate) fn exceeds_epsilon(value: f64) -> bool {
    value > QUANTITY_EPSILON
}

/// Parameter value, from the element or its type, scaled by
/// `length_scale^power`, if above epsilon
pub(crate) fn scaled_parameter(input: &CalculatorInput<'_>, name: &str, power: i32) -> Option<f64> {
    scale_value(input, input.parameter(name), power)
}

/// Element-only parameter value scaled by `length_scale^power`, if above epsilon
pub(crate) fn scaled_element_parameter(input: &CalculatorInput<'_>, name: &str, power: i32) -> Option<f64> {
    scale_value(input, input.element.parameters.get(name), power)
}

fn scale_value(input: &CalculatorInput<'_>, value: Option<f64>, power: i32) -> Option<f64> {
    value
        .filter(|v| exceeds_epsilon(*v))
        .map(|v| v * input.length_scale.powi(power))
        .filter(|v| exceeds_epsilon(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(_: &CalculatorInput<'_>) -> Option<f64> {
        Some(42.0)
    }

    fn tiny(_: &CalculatorInput<'_>) -> Option<f64> {
        Some(QUANTITY_EPSILON)
    }

    fn input<'a>(element: &'a Element, extrusion: Option<&'a ExtrusionData>) -> CalculatorInput<'a> {
        CalculatorInput {
            extrusion,
            element,
            element_type: None,
            length_scale: 1.0,
        }
    }

    #[test]
    fn test_lower_priority_number_runs_first() {
        let mut registry = CalculatorRegistry::standard();
        registry.register(QuantityKind::Length, 10, fixed);

        let element = Element::new(1).with_parameter(LENGTH_PARAMETER, 3.0);
        assert_eq!(registry.compute(QuantityKind::Length, &input(&element, None)), Some(42.0));
    }

    #[test]
    fn test_value_at_epsilon_is_not_a_result() {
        let mut registry = CalculatorRegistry::new();
        registry.register(QuantityKind::Length, 1, tiny);
        registry.register(QuantityKind::Length, 2, fixed);

        let element = Element::new(1);
        assert_eq!(registry.compute(QuantityKind::Length, &input(&element, None)), Some(42.0));

        let mut only_tiny = CalculatorRegistry::new();
        only_tiny.register(QuantityKind::Length, 1, tiny);
        assert_eq!(only_tiny.compute(QuantityKind::Length, &input(&element, None)), None);
    }

    #[test]
    fn test_derive_all_skips_missing_quantities() {
        let registry = CalculatorRegistry::standard();
        let element = Element::new(1).with_parameter(LENGTH_PARAMETER, 2.5);

        let derived = registry.derive_all(&input(&element, None));
        assert_eq!(
            derived,
            vec![DerivedQuantity {
                quantity: QuantityKind::Length,
                value: 2.5
            }]
        );
    }

    #[test]
    fn test_derive_all_is_idempotent() {
        let registry = CalculatorRegistry::standard();
        let mut extrusion = ExtrusionData::default();
        extrusion.axis = Some(ifc_export_geometry::Axis::X);
        extrusion.scaled_length = 4.0;
        extrusion.scaled_area = 0.25;
        let element = Element::new(1);

        let first = registry.derive_all(&input(&element, Some(&extrusion)));
        let second = registry.derive_all(&input(&element, Some(&extrusion)));
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
