// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{exceeds_epsilon, scaled_element_parameter, scaled_parameter, CalculatorInput};

/// Extrusion length parameter written by the authoring tool on the element
pub const EXTRUSION_LENGTH_PARAMETER: &str = "EXTRUSION_LENGTH";
pub const LENGTH_PARAMETER: &str = "Length";

/// Length of the product along its extrusion axis.
///
/// Prefers the measured extrusion; otherwise the element's extrusion length
/// parameter, then the plain length parameter of the element or its type,
/// both scaled to export units.
pub fn length(input: &CalculatorInput<'_>) -> Option<f64> {
    input
        .extrusion
        .filter(|e| e.has_extrusion())
        .map(|e| e.scaled_length)
        .filter(|v| exceeds_epsilon(*v))
        .or_else(|| scaled_element_parameter(input, EXTRUSION_LENGTH_PARAMETER, 1))
        .or_else(|| scaled_parameter(input, LENGTH_PARAMETER, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::QUANTITY_EPSILON;
    use crate::extrusion::ExtrusionData;
    use crate::model::{Element, ElementType};
    use approx::assert_relative_eq;
    use ifc_export_geometry::Axis;

    #[test]
    fn test_measured_extrusion_wins() {
        let element = Element::new(1).with_parameter(LENGTH_PARAMETER, 10.0);
        let mut extrusion = ExtrusionData::default();
        extrusion.axis = Some(Axis::Z);
        extrusion.scaled_length = 3.0;

        let input = CalculatorInput {
            extrusion: Some(&extrusion),
            element: &element,
            element_type: None,
            length_scale: 1.0,
        };
        assert_eq!(length(&input), Some(3.0));
    }

    #[test]
    fn test_parameters_are_scaled() {
        let element = Element::new(1);
        let element_type = ElementType::new(5, "Pipe").with_parameter(LENGTH_PARAMETER, 10.0);

        let input = CalculatorInput {
            extrusion: None,
            element: &element,
            element_type: Some(&element_type),
            length_scale: 0.3048,
        };
        assert_relative_eq!(length(&input).unwrap(), 3.048, epsilon = 1e-12);
    }

    #[test]
    fn test_extrusion_at_epsilon_falls_back_to_parameter() {
        let element = Element::new(1).with_parameter(LENGTH_PARAMETER, 5.0);
        let mut extrusion = ExtrusionData::default();
        extrusion.axis = Some(Axis::X);
        extrusion.scaled_length = QUANTITY_EPSILON;

        let input = CalculatorInput {
            extrusion: Some(&extrusion),
            element: &element,
            element_type: None,
            length_scale: 1.0,
        };
        assert_eq!(length(&input), Some(5.0));
    }

    #[test]
    fn test_zero_length_is_no_value() {
        let element = Element::new(1).with_parameter(EXTRUSION_LENGTH_PARAMETER, 0.0);
        let input = CalculatorInput {
            extrusion: Some(&ExtrusionData::default()),
            element: &element,
            element_type: None,
            length_scale: 1.0,
        };
        assert_eq!(length(&input), None);
    }

    #[test]
    fn test_extrusion_length_parameter_at_epsilon_is_no_value() {
        let element = Element::new(1).with_parameter(EXTRUSION_LENGTH_PARAMETER, QUANTITY_EPSILON);
        let input = CalculatorInput {
            extrusion: None,
            element: &element,
            element_type: None,
            length_scale: 1.0,
        };
        assert_eq!(length(&input), None);
    }

    #[test]
    fn test_extrusion_length_parameter_is_read_from_element_only() {
        let element = Element::new(1);
        let element_type = ElementType::new(5, "Pipe").with_parameter(EXTRUSION_LENGTH_PARAMETER, 7.0);
        let input = CalculatorInput {
            extrusion: None,
            element: &element,
            element_type: Some(&element_type),
            length_scale: 1.0,
        };
        assert_eq!(length(&input), None);

        let element = Element::new(1).with_parameter(EXTRUSION_LENGTH_PARAMETER, 7.0);
        let element_type = ElementType::new(5, "Pipe").with_parameter(LENGTH_PARAMETER, 9.0);
        let input = CalculatorInput {
            extrusion: None,
            element: &element,
            element_type: Some(&element_type),
            length_scale: 1.0,
        };
        assert_eq!(length(&input), Some(7.0));
    }
}
