// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{exceeds_epsilon, scaled_parameter, CalculatorInput};

pub const VOLUME_PARAMETER: &str = "Volume";

/// Gross volume: extrusion length times cross-section area
pub fn gross_volume(input: &CalculatorInput<'_>) -> Option<f64> {
    input
        .extrusion
        .filter(|e| e.has_extrusion())
        .map(|e| e.scaled_length * e.scaled_area)
        .filter(|v| exceeds_epsilon(*v))
        .or_else(|| scaled_parameter(input, VOLUME_PARAMETER, 3))
}
