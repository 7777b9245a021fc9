//! One-shot world bootstrap
//!
//! `BuildingGenerator` fills a `World` with buildings exactly once. A second
//! call reports a skip and leaves everything untouched. The guard lives on
//! the generator instance, so independent worlds each get their own.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{BuildingLayout, emit_building, roll_building};
use super::state::World;
use super::templates::{TemplateRefs, TemplateSlot};
use crate::settings::{GenerationSettings, SettingsError};

/// Errors that abort a generation pass
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("missing template handles: {}", format_slots(.missing))]
    MissingTemplates { missing: Vec<TemplateSlot> },

    #[error("invalid generation settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

fn format_slots(slots: &[TemplateSlot]) -> String {
    slots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether the generation pass has happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeneratorState {
    #[default]
    NotRun,
    Ran,
}

/// Summary of a completed generation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Seed the RNG was built from (`None` when a caller supplied the RNG)
    pub seed: Option<u64>,
    pub buildings: Vec<BuildingLayout>,
    pub block_count: usize,
}

#[derive(Debug, Clone)]
pub enum GenerateOutcome {
    Generated(GenerationReport),
    /// Generation already ran; nothing was changed
    Skipped,
}

impl GenerateOutcome {
    pub fn report(&self) -> Option<&GenerationReport> {
        match self {
            GenerateOutcome::Generated(report) => Some(report),
            GenerateOutcome::Skipped => None,
        }
    }
}

/// Single-fire building generator
#[derive(Debug, Clone)]
pub struct BuildingGenerator {
    settings: GenerationSettings,
    state: GeneratorState,
}

impl BuildingGenerator {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            state: GeneratorState::NotRun,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Generate with a PCG32 seeded from the settings (or the clock)
    pub fn generate(
        &mut self,
        refs: &TemplateRefs,
        world: &mut World,
    ) -> Result<GenerateOutcome, GenerateError> {
        let seed = self.settings.seed_or_clock();
        let mut rng = Pcg32::seed_from_u64(seed);
        let outcome = self.generate_with_rng(refs, &mut rng, world)?;
        Ok(match outcome {
            GenerateOutcome::Generated(mut report) => {
                log::info!("Generated world from seed {}", seed);
                report.seed = Some(seed);
                GenerateOutcome::Generated(report)
            }
            GenerateOutcome::Skipped => GenerateOutcome::Skipped,
        })
    }

    /// Generate using a caller-supplied RNG
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &mut self,
        refs: &TemplateRefs,
        rng: &mut R,
        world: &mut World,
    ) -> Result<GenerateOutcome, GenerateError> {
        if self.state == GeneratorState::Ran {
            log::info!("Building generation already ran, skipping");
            return Ok(GenerateOutcome::Skipped);
        }

        let templates = self
            .settings
            .validate()
            .map_err(GenerateError::from)
            .and_then(|()| refs.resolve())
            .inspect_err(|err| {
                log::error!("Cannot generate buildings: {}", err);
            })?;
        self.state = GeneratorState::Ran;

        let count = self.settings.building_count;
        let mut buildings = Vec::with_capacity(count as usize);
        let mut block_count = 0;
        for building_index in 0..count {
            let layout = roll_building(rng, &self.settings);
            block_count += emit_building(&layout, building_index, &templates, &self.settings, rng, world);
            buildings.push(layout);
        }

        log::info!(
            "Total generated blocks: {} across {} buildings",
            block_count,
            count
        );

        Ok(GenerateOutcome::Generated(GenerationReport {
            seed: None,
            buildings,
            block_count,
        }))
    }
}
