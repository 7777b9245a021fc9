//! Procedural building layout
//!
//! A building is a solid floor, a stack of hollow wall layers and a solid
//! ceiling. Floor and ceiling are single blocks stretched over the footprint;
//! wall layers are rings of unit blocks with a door gap near the ground.

use glam::{Vec3, Vec3Swizzles};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::block::BlockRecord;
use super::state::{BlockRole, NodeId, NodeKind, Transform, World};
use super::templates::Templates;
use crate::consts::*;
use crate::force_odd;
use crate::settings::GenerationSettings;

/// Dimensions and placement of one building
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingLayout {
    /// Placement on the ground plane (y = 0)
    pub position: Vec3,
    pub num_layers: u32,
    /// Always odd
    pub width: u32,
    /// Always odd
    pub depth: u32,
}

impl BuildingLayout {
    /// Center column along X
    #[inline]
    pub fn origin_x(&self) -> i32 {
        (self.width as i32 - 1) / 2
    }

    /// Center row along Z
    #[inline]
    pub fn origin_z(&self) -> i32 {
        (self.depth as i32 - 1) / 2
    }

    pub fn is_floor_or_ceiling(&self, layer: u32) -> bool {
        layer == 0 || layer + 1 == self.num_layers
    }

    /// Whether (x, z) lies on the footprint's outer ring
    pub fn is_perimeter(&self, x: i32, z: i32) -> bool {
        let max_x = self.width as i32 - 1;
        let max_z = self.depth as i32 - 1;
        x == 0 || x == max_x || z == 0 || z == max_z
    }

    /// Whether column x is carved out as the entrance in this layer
    pub fn is_door(&self, x: i32, layer: u32) -> bool {
        layer < DOOR_LAYER_LIMIT && (x - self.origin_x()).abs() <= DOOR_HALF_WIDTH
    }

    /// Grid cells that get a wall block in an intermediate layer, x outer / z inner
    pub fn wall_cells(&self, layer: u32) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (width, depth) = (self.width as i32, self.depth as i32);
        (0..width)
            .flat_map(move |x| (0..depth).map(move |z| (x, z)))
            .filter(move |&(x, z)| self.is_perimeter(x, z) && !self.is_door(x, layer))
    }

    /// Block count this layout produces
    pub fn block_count(&self) -> usize {
        (0..self.num_layers)
            .map(|layer| {
                if self.is_floor_or_ceiling(layer) {
                    1
                } else {
                    self.wall_cells(layer).count()
                }
            })
            .sum()
    }
}

/// Height above the target a block in `layer` spawns at, before jitter
#[inline]
pub fn spawn_height(layer: u32, layer_height: f32) -> f32 {
    layer_height * (SPAWN_BASE_LAYERS + SPAWN_LAYER_STRIDE * layer as f32)
}

/// Draw one building's placement and dimensions
pub fn roll_building<R: Rng + ?Sized>(rng: &mut R, settings: &GenerationSettings) -> BuildingLayout {
    let x = rng.random_range(0..settings.area_extent);
    let z = rng.random_range(0..settings.area_extent);
    let num_layers = rng.random_range(MIN_LAYERS..MAX_LAYERS_EXCLUSIVE);
    let width = force_odd(rng.random_range(MIN_FOOTPRINT..MAX_FOOTPRINT_EXCLUSIVE));
    let depth = force_odd(rng.random_range(MIN_FOOTPRINT..MAX_FOOTPRINT_EXCLUSIVE));

    BuildingLayout {
        position: Vec3::new(x as f32, 0.0, z as f32),
        num_layers,
        width,
        depth,
    }
}

/// Instantiate a building into the world, returning how many blocks it emitted
pub fn emit_building<R: Rng + ?Sized>(
    layout: &BuildingLayout,
    building_index: u32,
    templates: &Templates,
    settings: &GenerationSettings,
    rng: &mut R,
    world: &mut World,
) -> usize {
    let h = settings.layer_height;
    let building = world.spawn_node(
        NodeKind::Building {
            building: building_index,
        },
        None,
        templates.building_parent,
        Transform::from_translation(layout.position),
    );

    let mut emitted = 0;
    for layer in 0..layout.num_layers {
        let layer_y = layer as f32 * h;

        if layout.is_floor_or_ceiling(layer) {
            let role = if layer == 0 {
                BlockRole::Floor
            } else {
                BlockRole::Ceiling
            };
            let record = BlockRecord::new(Vec3::new(0.0, layer_y, 0.0), spawn_height(layer, h));
            let footprint = Vec3::new(layout.width as f32, 1.0, layout.depth as f32);
            world.spawn_block(record, role, building, templates.block, footprint);
            emitted += 1;
        } else {
            let layer_node = world.spawn_node(
                NodeKind::Layer { index: layer },
                Some(building),
                templates.layer,
                Transform::from_translation(Vec3::new(0.0, layer_y, 0.0)),
            );
            emitted += emit_wall_layer(layout, layer, layer_node, templates, h, rng, world);
        }
    }

    log::debug!(
        "Building {} at {:?}: {}x{} footprint, {} layers, {} blocks",
        building_index,
        layout.position.xz(),
        layout.width,
        layout.depth,
        layout.num_layers,
        emitted
    );
    emitted
}

fn emit_wall_layer<R: Rng + ?Sized>(
    layout: &BuildingLayout,
    layer: u32,
    layer_node: NodeId,
    templates: &Templates,
    layer_height: f32,
    rng: &mut R,
    world: &mut World,
) -> usize {
    let (origin_x, origin_z) = (layout.origin_x(), layout.origin_z());
    let base_height = spawn_height(layer, layer_height);

    let mut emitted = 0;
    for (x, z) in layout.wall_cells(layer) {
        let target = Vec3::new((x - origin_x) as f32, 0.0, (z - origin_z) as f32);
        let jitter = rng.random_range(-SPAWN_JITTER..SPAWN_JITTER);
        let record = BlockRecord::new(target, base_height + jitter);
        world.spawn_block(record, BlockRole::Wall, layer_node, templates.block, Vec3::ONE);
        emitted += 1;
    }
    emitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::templates::TemplateHandle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn templates() -> Templates {
        Templates {
            building_parent: TemplateHandle(1),
            layer: TemplateHandle(2),
            block: TemplateHandle(3),
        }
    }

    fn layout(width: u32, depth: u32, num_layers: u32) -> BuildingLayout {
        BuildingLayout {
            position: Vec3::new(100.0, 0.0, 200.0),
            num_layers,
            width,
            depth,
        }
    }

    #[test]
    fn test_origin_is_center() {
        let l = layout(5, 9, 6);
        assert_eq!(l.origin_x(), 2);
        assert_eq!(l.origin_z(), 4);
    }

    #[test]
    fn test_wall_cells_door_layer() {
        // 5x5 ring has 16 cells; door removes x=1..=3 on z=0 and z=4 (6 cells)
        let l = layout(5, 5, 7);
        assert_eq!(l.wall_cells(1).count(), 10);
        // Above the door limit the full ring is emitted
        assert_eq!(l.wall_cells(5).count(), 16);
    }

    #[test]
    fn test_block_count_matches_emission() {
        let l = layout(7, 5, 7);
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let emitted = emit_building(&l, 0, &templates(), &GenerationSettings::default(), &mut rng, &mut world);

        assert_eq!(emitted, l.block_count());
        assert_eq!(world.block_count(), emitted);
        // 1 building + 5 wall layers + one node per block
        assert_eq!(world.nodes.len(), 1 + 5 + emitted);
    }

    #[test]
    fn test_floor_and_ceiling_are_scaled_mega_blocks() {
        let l = layout(9, 11, 6);
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(2);
        emit_building(&l, 0, &templates(), &GenerationSettings::default(), &mut rng, &mut world);

        let building = world.buildings().next().unwrap();
        let mega: Vec<_> = world
            .nodes
            .iter()
            .filter(|n| {
                matches!(
                    n.kind,
                    NodeKind::Block {
                        role: BlockRole::Floor | BlockRole::Ceiling,
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(mega.len(), 2);
        for node in mega {
            assert_eq!(node.parent, Some(building));
            assert_eq!(node.template, TemplateHandle(3));
            assert_eq!(node.transform.post_scale, Vec3::new(9.0, 1.0, 11.0));
        }

        // Ceiling target sits on the top layer and spawns without jitter
        let ceiling = world.blocks[world.block_count() - 1];
        assert_eq!(ceiling.target_position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(ceiling.position.y, 5.0 + spawn_height(5, 1.0));
    }

    #[test]
    fn test_hierarchy_parenting() {
        let l = layout(5, 7, 5);
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(3);
        emit_building(&l, 0, &templates(), &GenerationSettings::default(), &mut rng, &mut world);

        for node in &world.nodes {
            match node.kind {
                NodeKind::Building { .. } => {
                    assert_eq!(node.parent, None);
                    assert_eq!(node.template, TemplateHandle(1));
                }
                NodeKind::Layer { index } => {
                    let parent = world.node(node.parent.unwrap()).unwrap();
                    assert!(matches!(parent.kind, NodeKind::Building { .. }));
                    assert_eq!(node.template, TemplateHandle(2));
                    assert_eq!(node.transform.translation.y, index as f32);
                }
                NodeKind::Block { role: BlockRole::Wall, .. } => {
                    let parent = world.node(node.parent.unwrap()).unwrap();
                    assert!(matches!(parent.kind, NodeKind::Layer { .. }));
                    assert_eq!(node.transform.post_scale, Vec3::ONE);
                }
                NodeKind::Block { .. } => {
                    let parent = world.node(node.parent.unwrap()).unwrap();
                    assert!(matches!(parent.kind, NodeKind::Building { .. }));
                }
            }
        }
    }

    #[test]
    fn test_layer_height_scales_targets_and_spawns() {
        let l = layout(5, 5, 5);
        let settings = GenerationSettings {
            layer_height: 2.0,
            ..Default::default()
        };
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(4);
        emit_building(&l, 0, &templates(), &settings, &mut rng, &mut world);

        let ceiling = world.blocks[world.block_count() - 1];
        assert_eq!(ceiling.target_position.y, 8.0);
        assert_eq!(ceiling.position.y, 8.0 + 2.0 * (10.0 + 2.0 * 4.0));
    }

    proptest! {
        #[test]
        fn prop_rolled_dimensions_in_range(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let settings = GenerationSettings::default();
            for _ in 0..16 {
                let l = roll_building(&mut rng, &settings);
                prop_assert!((5..=10).contains(&l.num_layers));
                prop_assert!((5..=21).contains(&l.width));
                prop_assert!((5..=21).contains(&l.depth));
                prop_assert_eq!(l.width % 2, 1);
                prop_assert_eq!(l.depth % 2, 1);
                prop_assert!(l.position.x >= 0.0 && l.position.x < 800.0);
                prop_assert!(l.position.z >= 0.0 && l.position.z < 800.0);
                prop_assert_eq!(l.position.y, 0.0);
            }
        }

        #[test]
        fn prop_wall_blocks_are_perimeter_and_respect_door(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let settings = GenerationSettings::default();
            let l = roll_building(&mut rng, &settings);
            let mut world = World::new();
            emit_building(&l, 0, &templates(), &settings, &mut rng, &mut world);

            let half_w = l.origin_x() as f32;
            let half_d = l.origin_z() as f32;
            for (block, &node_id) in world.blocks.iter().zip(&world.block_nodes) {
                prop_assert!(block.position.y > block.target_position.y);

                let node = world.node(node_id).unwrap();
                if let NodeKind::Block { role: BlockRole::Wall, .. } = node.kind {
                    let layer = match world.node(node.parent.unwrap()).unwrap().kind {
                        NodeKind::Layer { index } => index,
                        other => return Err(TestCaseError::fail(format!("wall parent {:?}", other))),
                    };
                    let t = block.target_position;
                    prop_assert!(t.x.abs() == half_w || t.z.abs() == half_d);
                    if layer < 5 {
                        prop_assert!(t.x.abs() > 1.0);
                    }
                    let jitter = block.position.y - spawn_height(layer, 1.0);
                    prop_assert!(jitter.abs() <= 0.5 + 1e-4);
                }
            }
        }
    }
}
