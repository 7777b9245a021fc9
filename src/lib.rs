//! Block Rain - a field of buildings assembled from falling blocks
//!
//! Core modules:
//! - `sim`: Deterministic layout generation and per-block fall integration
//! - `settings`: Data-driven generation parameters

pub mod settings;
pub mod sim;

pub use settings::{GenerationSettings, SettingsError};

/// Generation and simulation constants
pub mod consts {
    /// Fixed timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default number of buildings in the field
    pub const DEFAULT_BUILDING_COUNT: u32 = 300;
    /// Buildings are placed in [0, extent) on both X and Z
    pub const DEFAULT_AREA_EXTENT: i32 = 800;
    /// Height of one building layer in world units
    pub const DEFAULT_LAYER_HEIGHT: f32 = 1.0;

    /// Layer count range (half-open, so 5..=10 layers)
    pub const MIN_LAYERS: u32 = 5;
    pub const MAX_LAYERS_EXCLUSIVE: u32 = 11;
    /// Footprint draw range (half-open) before forcing oddness, giving 5..=21
    pub const MIN_FOOTPRINT: u32 = 5;
    pub const MAX_FOOTPRINT_EXCLUSIVE: u32 = 21;

    /// Door gap covers columns originX-1..=originX+1
    pub const DOOR_HALF_WIDTH: i32 = 1;
    /// Door gap is carved only in layers below this index
    pub const DOOR_LAYER_LIMIT: u32 = 5;

    /// Constant per-block acceleration along Y
    pub const GRAVITY: f32 = -20.0;
    /// Below this |vy| a block crossing its target snaps to rest
    pub const SNAP_SPEED: f32 = 5.0;
    /// Velocity multiplier applied on a fast crossing
    pub const BOUNCE_FACTOR: f32 = -0.1;

    /// Spawn height is layer_height * (SPAWN_BASE_LAYERS + SPAWN_LAYER_STRIDE * layer)
    pub const SPAWN_BASE_LAYERS: f32 = 10.0;
    pub const SPAWN_LAYER_STRIDE: f32 = 2.0;
    /// Wall blocks get spawn jitter in [-SPAWN_JITTER, SPAWN_JITTER)
    pub const SPAWN_JITTER: f32 = 0.5;
}

/// Force a footprint dimension to be odd: even values round up, odd values
/// are kept as-is
#[inline]
pub fn force_odd(value: u32) -> u32 {
    value | 1
}
