//! Deterministic simulation module
//!
//! Layout generation and block physics live here. This module must stay
//! deterministic:
//! - Seeded RNG only, passed in explicitly
//! - Stable iteration order (building, layer, x, z)
//! - No rendering or platform dependencies

pub mod block;
pub mod generator;
pub mod layout;
pub mod state;
pub mod templates;
pub mod tick;

pub use block::{BlockId, BlockRecord, FallPhase};
pub use generator::{
    BuildingGenerator, GenerateError, GenerateOutcome, GenerationReport, GeneratorState,
};
pub use layout::{BuildingLayout, emit_building, roll_building, spawn_height};
pub use state::{BlockRole, NodeId, NodeKind, SceneNode, Transform, World};
pub use templates::{TemplateHandle, TemplateRefs, TemplateSlot, Templates};
pub use tick::{step, step_sequential, tick};
