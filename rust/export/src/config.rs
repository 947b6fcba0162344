// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export run options, loadable from environment variables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tessellation density requested from the representation builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TessellationLevel {
    Coarse,
    Medium,
    Fine,
}

impl FromStr for TessellationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" => Ok(Self::Coarse),
            "medium" => Ok(Self::Medium),
            "fine" => Ok(Self::Fine),
            other => Err(format!("unknown tessellation level '{}'", other)),
        }
    }
}

/// Options for one export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Split level-segment elements at level boundaries.
    pub split_by_level: bool,
    /// Scale from source length units to export units (e.g. 0.3048 for feet -> meters).
    pub length_scale: f64,
    /// Tessellation density for generic bodies.
    pub tessellation: TessellationLevel,
}

impl ExportOptions {
    /// Load options from environment variables, falling back to defaults.
    ///
    /// - `IFC_EXPORT_SPLIT_BY_LEVEL` (`true`/`false`, `1`/`0`)
    /// - `IFC_EXPORT_LENGTH_SCALE` (positive number)
    /// - `IFC_EXPORT_TESSELLATION` (`coarse`, `medium`, `fine`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            split_by_level: std::env::var("IFC_EXPORT_SPLIT_BY_LEVEL")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.split_by_level),
            length_scale: std::env::var("IFC_EXPORT_LENGTH_SCALE")
                .ok()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(defaults.length_scale),
            tessellation: std::env::var("IFC_EXPORT_TESSELLATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tessellation),
        }
    }

    pub fn with_split_by_level(mut self, split: bool) -> Self {
        self.split_by_level = split;
        self
    }

    pub fn with_length_scale(mut self, scale: f64) -> Self {
        self.length_scale = scale;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            split_by_level: false,
            length_scale: 1.0,
            tessellation: TessellationLevel::Medium,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
