// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Product placements relative to world, level or space frames

use crate::model::{Level, LevelId, Space, SpaceId};
use nalgebra::{Matrix4, Vector3};

/// Frame a placement is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementParent {
    World,
    Level(LevelId),
    Space(SpaceId),
}

/// Local placement of a product
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub parent: PlacementParent,
    /// Placement in world coordinates
    pub world: Matrix4<f64>,
    /// Placement relative to `parent`
    pub local: Matrix4<f64>,
}

impl Placement {
    pub fn in_world(world: Matrix4<f64>) -> Self {
        Self {
            parent: PlacementParent::World,
            world,
            local: world,
        }
    }

    /// Placement relative to a level datum
    pub fn on_level(world: Matrix4<f64>, level: &Level) -> Self {
        let to_level = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -level.elevation));
        Self {
            parent: PlacementParent::Level(level.id),
            world,
            local: to_level * world,
        }
    }

    /// Re-express this placement in the local frame of `space`.
    /// Returns `None` if the space frame is singular.
    pub fn relative_to_space(&self, space: &Space) -> Option<Self> {
        let to_space = space.frame.try_inverse()?;
        Some(Self {
            parent: PlacementParent::Space(space.id),
            world: self.world,
            local: to_space * self.world,
        })
    }

    pub fn level(&self) -> Option<LevelId> {
        match self.parent {
            PlacementParent::Level(id) => Some(id),
            _ => None,
        }
    }

    /// Translation of the local placement
    pub fn local_origin(&self) -> Vector3<f64> {
        self.local.fixed_view::<3, 1>(0, 3).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_level_placement_subtracts_elevation() {
        let world = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 4.5));
        let placement = Placement::on_level(world, &Level::new(2, "Level 2", 3.0));

        assert_eq!(placement.level(), Some(LevelId(2)));
        assert_relative_eq!(placement.local_origin(), Vector3::new(1.0, 2.0, 1.5));
        assert_eq!(placement.world, world);
    }

    #[test]
    fn test_space_placement_uses_space_frame() {
        let world = Matrix4::new_translation(&Vector3::new(5.0, 5.0, 1.0));
        let space = Space {
            id: SpaceId(7),
            frame: Matrix4::new_translation(&Vector3::new(4.0, 3.0, 0.0)),
        };
        let placement = Placement::in_world(world).relative_to_space(&space).unwrap();

        assert_eq!(placement.parent, PlacementParent::Space(SpaceId(7)));
        assert_relative_eq!(placement.local_origin(), Vector3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_singular_space_frame_is_rejected() {
        let space = Space {
            id: SpaceId(1),
            frame: Matrix4::zeros(),
        };
        assert!(Placement::in_world(Matrix4::identity())
            .relative_to_space(&space)
            .is_none());
    }
}
