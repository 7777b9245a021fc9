//! Falling block record and its per-tick integration
//!
//! A block falls under constant acceleration until it crosses its target
//! height. A slow crossing snaps it to rest; a fast one inverts and damps the
//! velocity. Rest is a fixed point of the same update rule, so there is no
//! separate "done" flag.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Index of a block record in the world's block arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Motion state of a block, derived from its velocity and position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallPhase {
    /// Moving down toward the target
    Falling,
    /// Moving up after a fast crossing
    Bouncing,
    /// Zero velocity at target height
    Resting,
}

/// A single simulated block
///
/// Positions are in the block's parent space: building space for floor and
/// ceiling blocks, layer space for wall blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Rest position (immutable after generation)
    pub target_position: Vec3,
    pub velocity: Vec3,
    /// Constant acceleration (immutable after generation)
    pub acceleration: Vec3,
    /// Current position, advanced every tick
    pub position: Vec3,
}

impl BlockRecord {
    /// A block at rest velocity, spawned `drop_height` above its target
    pub fn new(target_position: Vec3, drop_height: f32) -> Self {
        Self {
            target_position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::new(0.0, GRAVITY, 0.0),
            position: target_position + Vec3::new(0.0, drop_height, 0.0),
        }
    }

    /// Advance one tick
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        debug_assert!(dt.is_finite());
        debug_assert!(self.velocity.is_finite() && self.position.is_finite());

        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;

        if self.position.y <= self.target_position.y {
            if self.velocity.y.abs() < SNAP_SPEED {
                self.position.y = self.target_position.y;
                self.velocity = Vec3::ZERO;
            } else {
                self.velocity *= BOUNCE_FACTOR;
            }
        }
    }

    /// True once the block sits at its target with zero velocity
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.velocity == Vec3::ZERO && self.position.y == self.target_position.y
    }

    pub fn phase(&self) -> FallPhase {
        if self.is_settled() {
            FallPhase::Resting
        } else if self.velocity.y > 0.0 {
            FallPhase::Bouncing
        } else {
            FallPhase::Falling
        }
    }

    /// Height remaining above the target (negative while below it)
    pub fn height_above_target(&self) -> f32 {
        self.position.y - self.target_position.y
    }
}
