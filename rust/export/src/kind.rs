// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export kinds and product entity kinds
//!
//! An [`ExportKind`] is the type-level classification an element is exported
//! as (e.g. `IfcDuctSegmentType`). Each kind maps to at most one concrete
//! product [`EntityKind`] through an explicit table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-level classification chosen for an element before export
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportKind {
    // Distribution flow segments
    DuctSegmentType,
    PipeSegmentType,
    CableCarrierSegmentType,
    CableSegmentType,

    // Distribution flow fittings and terminals
    DuctFittingType,
    PipeFittingType,
    FlowTerminalType,

    // Generic distribution flow element
    DistributionFlowElementType,

    // Structural
    ColumnType,
    BeamType,
    MemberType,

    // Generic
    BuildingElementProxyType,

    /// A type name with no product counterpart in the target schema
    Unmapped(String),
}

impl ExportKind {
    /// Parse an IFC type name, case-insensitively.
    /// Unknown names become [`ExportKind::Unmapped`].
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "IFCDUCTSEGMENTTYPE" => Self::DuctSegmentType,
            "IFCPIPESEGMENTTYPE" => Self::PipeSegmentType,
            "IFCCABLECARRIERSEGMENTTYPE" => Self::CableCarrierSegmentType,
            "IFCCABLESEGMENTTYPE" => Self::CableSegmentType,
            "IFCDUCTFITTINGTYPE" => Self::DuctFittingType,
            "IFCPIPEFITTINGTYPE" => Self::PipeFittingType,
            "IFCFLOWTERMINALTYPE" => Self::FlowTerminalType,
            "IFCDISTRIBUTIONFLOWELEMENTTYPE" => Self::DistributionFlowElementType,
            "IFCCOLUMNTYPE" => Self::ColumnType,
            "IFCBEAMTYPE" => Self::BeamType,
            "IFCMEMBERTYPE" => Self::MemberType,
            "IFCBUILDINGELEMENTPROXYTYPE" => Self::BuildingElementProxyType,
            _ => Self::Unmapped(name.to_string()),
        }
    }

    /// IFC type entity name
    pub fn type_name(&self) -> &str {
        match self {
            Self::DuctSegmentType => "IfcDuctSegmentType",
            Self::PipeSegmentType => "IfcPipeSegmentType",
            Self::CableCarrierSegmentType => "IfcCableCarrierSegmentType",
            Self::CableSegmentType => "IfcCableSegmentType",
            Self::DuctFittingType => "IfcDuctFittingType",
            Self::PipeFittingType => "IfcPipeFittingType",
            Self::FlowTerminalType => "IfcFlowTerminalType",
            Self::DistributionFlowElementType => "IfcDistributionFlowElementType",
            Self::ColumnType => "IfcColumnType",
            Self::BeamType => "IfcBeamType",
            Self::MemberType => "IfcMemberType",
            Self::BuildingElementProxyType => "IfcBuildingElementProxyType",
            Self::Unmapped(name) => name,
        }
    }

    /// Concrete product entity exported for instances of this kind
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Self::DuctSegmentType => Some(EntityKind::DuctSegment),
            Self::PipeSegmentType => Some(EntityKind::PipeSegment),
            Self::CableCarrierSegmentType => Some(EntityKind::CableCarrierSegment),
            Self::CableSegmentType => Some(EntityKind::CableSegment),
            Self::DuctFittingType => Some(EntityKind::DuctFitting),
            Self::PipeFittingType => Some(EntityKind::PipeFitting),
            Self::FlowTerminalType => Some(EntityKind::FlowTerminal),
            Self::DistributionFlowElementType => Some(EntityKind::DistributionFlowElement),
            Self::ColumnType => Some(EntityKind::Column),
            Self::BeamType => Some(EntityKind::Beam),
            Self::MemberType => Some(EntityKind::Member),
            Self::BuildingElementProxyType => Some(EntityKind::BuildingElementProxy),
            Self::Unmapped(_) => None,
        }
    }

    /// Elements of this kind may be split at level boundaries
    #[inline]
    pub fn is_level_segment(&self) -> bool {
        matches!(self, Self::DuctSegmentType)
    }

    /// Extrusions of this kind are only recognized along the vertical axis.
    ///
    /// Applies to split segments only; unsplit bodies consider every axis.
    /// No kind is both a level segment and vertical-only, so this has no
    /// effect until [`is_level_segment`](Self::is_level_segment) admits one.
    #[inline]
    pub fn is_vertical_extrusion(&self) -> bool {
        matches!(self, Self::ColumnType)
    }

    /// Generic distribution flow elements are never related to spaces
    #[inline]
    pub fn is_distribution_flow(&self) -> bool {
        matches!(self, Self::DistributionFlowElementType)
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Product (occurrence) entity kinds the exporter can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    DuctSegment,
    PipeSegment,
    CableCarrierSegment,
    CableSegment,
    DuctFitting,
    PipeFitting,
    FlowTerminal,
    DistributionFlowElement,
    Column,
    Beam,
    Member,
    BuildingElementProxy,
}

impl EntityKind {
    /// IFC entity name
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuctSegment => "IfcDuctSegment",
            Self::PipeSegment => "IfcPipeSegment",
            Self::CableCarrierSegment => "IfcCableCarrierSegment",
            Self::CableSegment => "IfcCableSegment",
            Self::DuctFitting => "IfcDuctFitting",
            Self::PipeFitting => "IfcPipeFitting",
            Self::FlowTerminal => "IfcFlowTerminal",
            Self::DistributionFlowElement => "IfcDistributionFlowElement",
            Self::Column => "IfcColumn",
            Self::Beam => "IfcBeam",
            Self::Member => "IfcMember",
            Self::BuildingElementProxy => "IfcBuildingElementProxy",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ExportKind::parse("IfcDuctSegmentType"), ExportKind::DuctSegmentType);
        assert_eq!(ExportKind::parse("IFCCOLUMNTYPE"), ExportKind::ColumnType);
        assert_eq!(
            ExportKind::parse("IfcSpaceHeaterType"),
            ExportKind::Unmapped("IfcSpaceHeaterType".to_string())
        );
    }

    #[test]
    fn test_every_mapped_kind_strips_type_suffix() {
        let kinds = [
            ExportKind::DuctSegmentType,
            ExportKind::PipeSegmentType,
            ExportKind::CableCarrierSegmentType,
            ExportKind::CableSegmentType,
            ExportKind::DuctFittingType,
            ExportKind::PipeFittingType,
            ExportKind::FlowTerminalType,
            ExportKind::DistributionFlowElementType,
            ExportKind::ColumnType,
            ExportKind::BeamType,
            ExportKind::MemberType,
            ExportKind::BuildingElementProxyType,
        ];
        for kind in kinds {
            let entity = kind.entity_kind().unwrap();
            assert_eq!(format!("{}Type", entity.name()), kind.type_name());
            assert_eq!(ExportKind::parse(kind.type_name()), kind);
        }
    }

    #[test]
    fn test_unmapped_kind_has_no_entity() {
        assert_eq!(ExportKind::Unmapped("IfcFooType".into()).entity_kind(), None);
    }

    #[test]
    fn test_policies() {
        assert!(ExportKind::DuctSegmentType.is_level_segment());
        assert!(!ExportKind::PipeSegmentType.is_level_segment());
        assert!(ExportKind::ColumnType.is_vertical_extrusion());
        assert!(!ExportKind::DuctSegmentType.is_vertical_extrusion());
        assert!(ExportKind::DistributionFlowElementType.is_distribution_flow());
        assert!(!ExportKind::DuctSegmentType.is_distribution_flow());
    }
}
