//! End-to-end sample generation: parameter draw, layout, simulation, and
//! sample assembly.
//!
//! All randomness flows through seeds derived from the run seed, so a batch
//! is reproducible sample-by-sample and safe to generate in parallel: no
//! shared RNG state, each sample owns RNGs derived from `root + index`.

use rand::Rng;

use cogs_core::config::GenerationConfig;
use cogs_core::error::{CogsError, LayoutError};
use cogs_core::seed::SeedHierarchy;
use cogs_core::types::{Axis, Chain, Direction};
use cogs_layout::{build_layout, ChainLayout, LayoutParams};
use cogs_sim::{simulate, SimParams};

use crate::prompt::render_prompt;
use crate::sample::{ChainSnapshot, TaskFacts, TaskSample};

/// Stage key for the parameter draw (gear count, root direction, axis).
const STAGE_PARAMS: &str = "params";

// ---------------------------------------------------------------------------
// SampleGenerator
// ---------------------------------------------------------------------------

/// Deterministic task sample generator.
///
/// # Example
///
/// ```
/// use cogs_core::config::GenerationConfig;
/// use cogs_task::SampleGenerator;
///
/// let generator = SampleGenerator::new(GenerationConfig::default()).unwrap();
/// let sample = generator.generate(0).unwrap();
/// assert!(sample.stop_time_secs >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    config: GenerationConfig,
    seeds: SeedHierarchy,
}

impl SampleGenerator {
    /// Create a generator, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns [`CogsError::Config`] on invalid configuration values.
    pub fn new(config: GenerationConfig) -> Result<Self, CogsError> {
        config.validate()?;
        let seeds = SeedHierarchy::new(config.seed);
        Ok(Self { config, seeds })
    }

    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate the sample at `sample_index`.
    ///
    /// Draws gear count, root direction, and axis from the sample's parameter
    /// RNG, lays out the chain (retrying infeasible layouts with fresh
    /// attempt-derived RNGs), simulates to the stop instant, and assembles
    /// the serializable sample. Either a complete sample or an error.
    ///
    /// # Errors
    ///
    /// - [`CogsError::Layout`] when every layout attempt is infeasible.
    /// - [`CogsError::Simulation`] when the stop solve fails.
    pub fn generate(&self, sample_index: u64) -> Result<TaskSample, CogsError> {
        let mut params_rng = self.seeds.stage_rng(sample_index, STAGE_PARAMS);
        let gear_count = params_rng.gen_range(self.config.min_gears..=self.config.max_gears);
        let root = Direction::sample(&mut params_rng);
        let axis = Axis::sample(&mut params_rng);

        let layout = self.build_with_retries(sample_index, gear_count, axis)?;
        let chain = layout.into_chain(root)?;

        let sim_params = SimParams::from_config(&self.config);
        let sim = simulate(&chain, &sim_params)?;

        Ok(self.assemble(sample_index, &chain, sim.stop_time_secs, sim.frames))
    }

    /// Run the layout builder, retrying with fresh derived seeds when a draw
    /// happens to be infeasible. Non-layout errors are never retried.
    fn build_with_retries(
        &self,
        sample_index: u64,
        gear_count: usize,
        axis: Axis,
    ) -> Result<ChainLayout, LayoutError> {
        let params = LayoutParams {
            gear_count,
            axis,
            geometry: self.config.geometry(),
        };
        let mut last_err = None;
        for attempt in 0..self.config.max_layout_attempts {
            let mut rng = self.seeds.stage_rng(sample_index, &format!("layout:{attempt}"));
            match build_layout(&params, &mut rng) {
                Ok(layout) => return Ok(layout),
                Err(err @ LayoutError::Infeasible { .. }) => last_err = Some(err),
                Err(err) => return Err(err),
            }
        }
        // max_layout_attempts >= 1 is enforced by config validation.
        Err(last_err.unwrap_or(LayoutError::TooFewGears(gear_count)))
    }

    fn assemble(
        &self,
        sample_index: u64,
        chain: &Chain,
        stop_time_secs: f64,
        frames: Vec<cogs_sim::FramePose>,
    ) -> TaskSample {
        let speed = self.config.angular_speed;
        let facts = TaskFacts::from_chain(chain);
        let prompt = render_prompt(&facts);
        TaskSample {
            sample_index,
            seed: self.seeds.sample_seed(sample_index),
            facts,
            prompt,
            initial: ChainSnapshot::capture(chain, 0.0, speed, false),
            final_state: ChainSnapshot::capture(chain, stop_time_secs, speed, true),
            stop_time_secs,
            frames,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
