// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{exceeds_epsilon, scaled_parameter, CalculatorInput};

pub const CROSS_SECTION_AREA_PARAMETER: &str = "CrossSectionArea";

/// Gross cross-section area perpendicular to the extrusion axis
pub fn cross_section_area(input: &CalculatorInput<'_>) -> Option<f64> {
    input
        .extrusion
        .filter(|e| e.has_extrusion())
        .map(|e| e.scaled_area)
        .filter(|v| exceeds_epsilon(*v))
        .or_else(|| scaled_parameter(input, CROSS_SECTION_AREA_PARAMETER, 2))
}
