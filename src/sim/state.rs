//! World state: the scene-node hierarchy and the block arena
//!
//! Nodes and blocks live in flat vectors addressed by integer handles. Each
//! node stores its parent index; composing world transforms is left to the
//! renderer.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::block::{BlockId, BlockRecord, FallPhase};
use super::templates::TemplateHandle;

/// Index of a node in the world's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a block node represents inside its building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockRole {
    Floor,
    Ceiling,
    Wall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of one building
    Building { building: u32 },
    /// Intermediate wall layer
    Layer { index: u32 },
    /// A simulated block
    Block { block: BlockId, role: BlockRole },
}

/// Local transform handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    /// Non-uniform scale applied after the local transform (floor/ceiling only)
    pub post_scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            post_scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn with_post_scale(mut self, post_scale: Vec3) -> Self {
        self.post_scale = post_scale;
        self
    }
}

/// An instantiated template in the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub kind: NodeKind,
    /// `None` for roots (buildings)
    pub parent: Option<NodeId>,
    /// Template this node was copied from
    pub template: TemplateHandle,
    /// Local transform at spawn. For block nodes use `World::block_transform`.
    pub transform: Transform,
}

/// All generated nodes and simulated blocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub nodes: Vec<SceneNode>,
    /// Live block records, updated every tick
    pub blocks: Vec<BlockRecord>,
    /// `block_nodes[i]` is the node owning `blocks[i]`
    pub block_nodes: Vec<NodeId>,
    /// Simulation tick counter
    pub tick_count: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a non-block node and return its handle
    pub fn spawn_node(
        &mut self,
        kind: NodeKind,
        parent: Option<NodeId>,
        template: TemplateHandle,
        transform: Transform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            kind,
            parent,
            template,
            transform,
        });
        id
    }

    /// Add a block record together with the node that owns it
    pub fn spawn_block(
        &mut self,
        record: BlockRecord,
        role: BlockRole,
        parent: NodeId,
        template: TemplateHandle,
        post_scale: Vec3,
    ) -> BlockId {
        let block = BlockId(self.blocks.len() as u32);
        let transform = Transform::from_translation(record.position).with_post_scale(post_scale);
        let node = self.spawn_node(NodeKind::Block { block, role }, Some(parent), template, transform);
        self.blocks.push(record);
        self.block_nodes.push(node);
        block
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub fn block(&self, id: BlockId) -> Option<&BlockRecord> {
        self.blocks.get(id.index())
    }

    /// Scene node that owns a block
    pub fn block_node(&self, id: BlockId) -> Option<&SceneNode> {
        self.block_nodes
            .get(id.index())
            .and_then(|&node| self.node(node))
    }

    /// Current local transform of a block: its node's transform with the
    /// translation taken from the live block record
    pub fn block_transform(&self, id: BlockId) -> Option<Transform> {
        let record = self.block(id)?;
        let node = self.block_node(id)?;
        Some(Transform {
            translation: record.position,
            ..node.transform
        })
    }

    /// Direct children of a node, in creation order
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == Some(parent))
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Root building nodes
    pub fn buildings(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n.kind, NodeKind::Building { .. }))
            .map(|(i, _)| NodeId(i as u32))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn settled_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_settled()).count()
    }

    pub fn all_settled(&self) -> bool {
        self.blocks.iter().all(BlockRecord::is_settled)
    }

    /// Count of blocks in each phase as (falling, bouncing, resting)
    pub fn phase_counts(&self) -> (usize, usize, usize) {
        self.blocks
            .iter()
            .fold((0, 0, 0), |(f, b, r), block| match block.phase() {
                FallPhase::Falling => (f + 1, b, r),
                FallPhase::Bouncing => (f, b + 1, r),
                FallPhase::Resting => (f, b, r + 1),
            })
    }
}
