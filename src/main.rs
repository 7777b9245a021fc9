//! Block Rain demo driver
//!
//! Generates a building field and runs the fall simulation headless until
//! every block has settled. Usage: `block-rain [settings.json]`

use block_rain::GenerationSettings;
use block_rain::consts::*;
use block_rain::sim::{
    BuildingGenerator, GenerateOutcome, TemplateHandle, TemplateRefs, World, tick,
};

/// Synthetic frame time fed to the accumulator (slightly uneven on purpose)
const FRAME_TIMES: [f32; 4] = [0.016, 0.017, 0.016, 0.018];
/// Give up after this many simulated seconds
const MAX_SIM_SECONDS: f32 = 30.0;

/// Headless driver state
struct Demo {
    world: World,
    accumulator: f32,
}

impl Demo {
    fn new(world: World) -> Self {
        Self {
            world,
            accumulator: 0.0,
        }
    }

    /// Run fixed-size ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.world, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

fn load_settings() -> GenerationSettings {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("No settings file given, using defaults");
        return GenerationSettings::default();
    };
    match GenerationSettings::load(&path) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("{}; using default settings", err);
            GenerationSettings::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Block Rain (native) starting...");

    let settings = load_settings();
    let refs = TemplateRefs::new(TemplateHandle(0), TemplateHandle(1), TemplateHandle(2));
    let mut generator = BuildingGenerator::new(settings);
    let mut world = World::new();

    let report = match generator.generate(&refs, &mut world) {
        Ok(GenerateOutcome::Generated(report)) => report,
        Ok(GenerateOutcome::Skipped) => {
            log::error!("Fresh generator unexpectedly skipped generation");
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("Generation failed: {}", err);
            std::process::exit(1);
        }
    };

    // Bootstrap runs once; a repeat call only reports the skip
    if let Ok(GenerateOutcome::Skipped) = generator.generate(&refs, &mut world) {
        log::debug!("Second generation call skipped as expected");
    }

    let mut demo = Demo::new(world);
    let mut elapsed = 0.0;
    let mut frame = 0usize;
    while !demo.world.all_settled() && elapsed < MAX_SIM_SECONDS {
        let dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
        demo.update(dt);
        elapsed += dt;
        frame += 1;

        if frame % 60 == 0 {
            let (falling, bouncing, resting) = demo.world.phase_counts();
            let highest = demo
                .world
                .blocks
                .iter()
                .map(|b| b.height_above_target())
                .fold(0.0_f32, f32::max);
            log::info!(
                "t={:.2}s tick={} falling={} bouncing={} resting={} highest={:.2}",
                elapsed,
                demo.world.tick_count,
                falling,
                bouncing,
                resting,
                highest
            );
        }
    }

    let settled = demo.world.settled_count();
    if demo.world.all_settled() {
        log::info!(
            "All {} blocks of {} buildings settled after {} ticks ({:.2}s)",
            settled,
            report.buildings.len(),
            demo.world.tick_count,
            elapsed
        );
    } else {
        log::warn!(
            "Stopped after {:.2}s with {}/{} blocks settled",
            elapsed,
            settled,
            demo.world.block_count()
        );
    }
}
