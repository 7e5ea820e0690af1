//! Euler-Maruyama path generation.
//!
//! ```text
//! r_{i+1} = r_i + (θ(t_i) − a·r_i)·Δt + σ·√Δt·Z_i,    r_0 = f(0, 0)
//! ```
//!
//! Shocks come either from a caller-supplied [`ShockMatrix`] of shape
//! `(n, num_paths)` or from one [`PricerRng`] stream per path.

use crate::config::SimulationConfig;
use crate::result::SimulationResult;
use crate::rng::{entropy_seed, PricerRng};
use crate::scenario::ScenarioDefinition;
use crate::shocks::ShockMatrix;
use shortrate_core::types::ValidationError;
use shortrate_models::models::rates::CalibratedModel;
use tracing::debug;

/// Simulate with [`SimulationConfig::default`].
///
/// # Errors
///
/// As [`PathSimulator::simulate`].
pub fn simulate(
    model: &CalibratedModel,
    scenario: &ScenarioDefinition,
    shocks: Option<&ShockMatrix>,
) -> Result<SimulationResult, ValidationError> {
    PathSimulator::default().simulate(model, scenario, shocks)
}

/// Short-rate path simulator.
///
/// # Examples
///
/// ```rust
/// use shortrate_core::market_data::curves::DiscountCurve;
/// use shortrate_models::models::rates::{CalibratedModel, FitterConfig, HullWhiteParams};
/// use shortrate_simulation::{PathSimulator, ScenarioDefinition, SimulationConfig};
///
/// let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.01).unwrap();
/// let model = CalibratedModel::fit(params, curve, &FitterConfig::default(), 0.0).unwrap();
///
/// let scenario = ScenarioDefinition::new(100, 1.0, 1.0 / 12.0).unwrap();
/// let simulator = PathSimulator::new(SimulationConfig::default().with_seed(7));
/// let result = simulator.simulate(&model, &scenario, None).unwrap();
///
/// assert_eq!(result.num_timesteps(), 13);
/// assert_eq!(result.num_paths(), 100);
/// assert!((result.rate(0, 0).unwrap() - 0.03).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSimulator {
    config: SimulationConfig,
}

/// Per-run constants shared by every path.
struct Dynamics {
    r0: f64,
    decay: f64,
    diffusion: f64,
    /// θ(t_i)·Δt for each step.
    drift: Vec<f64>,
    dt: f64,
}

impl Dynamics {
    /// Fill `out` (length `n + 1`) with one trajectory.
    #[inline]
    fn run(&self, out: &mut [f64], mut shock: impl FnMut(usize) -> f64) {
        let mut r = self.r0;
        out[0] = r;
        for (i, slot) in out[1..].iter_mut().enumerate() {
            r += self.drift[i] - self.decay * r * self.dt + self.diffusion * shock(i);
            *slot = r;
        }
    }
}

impl PathSimulator {
    /// Create a simulator.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Simulator settings.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generate `scenario.num_paths()` trajectories on the scenario grid.
    ///
    /// # Errors
    ///
    /// * `ValidationError::ShockShapeMismatch` - `shocks` is not
    ///   `(num_steps, num_paths)`; nothing is simulated
    /// * `ValidationError::InvalidParameter` - the path table would not fit
    ///   in memory addressing
    pub fn simulate(
        &self,
        model: &CalibratedModel,
        scenario: &ScenarioDefinition,
        shocks: Option<&ShockMatrix>,
    ) -> Result<SimulationResult, ValidationError> {
        let steps = scenario.num_steps();
        let num_paths = scenario.num_paths();
        if let Some(shocks) = shocks {
            shocks.check_shape(steps, num_paths)?;
        }
        let width = scenario.num_timesteps();
        let cells = width.checked_mul(num_paths).ok_or_else(|| {
            ValidationError::invalid("num_paths", "path table size overflows usize")
        })?;

        let time_grid = scenario.time_grid();
        let dt = scenario.step_size();
        let theta = model.theta();
        let dynamics = Dynamics {
            r0: model.initial_short_rate(),
            decay: model.mean_reversion(),
            diffusion: model.volatility() * dt.sqrt(),
            drift: time_grid[..steps].iter().map(|&t| theta.value(t) * dt).collect(),
            dt,
        };

        let seed = self.config.seed.unwrap_or_else(entropy_seed);
        debug!(
            "Simulating {} paths x {} steps (dt = {}, seed = {}, external shocks = {})",
            num_paths,
            steps,
            dt,
            seed,
            shocks.is_some()
        );

        let mut rates = vec![0.0; cells];
        let fill = |(j, out): (usize, &mut [f64])| match shocks {
            Some(m) => {
                let data = m.as_slice();
                dynamics.run(out, |i| data[i * num_paths + j]);
            }
            None => {
                let mut rng = PricerRng::for_path(seed, j);
                dynamics.run(out, |_| rng.gen_normal());
            }
        };

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            use rayon::prelude::*;

            rates.par_chunks_mut(width).enumerate().for_each(fill);
            return Ok(SimulationResult::new(time_grid, num_paths, rates));
        }

        rates.chunks_mut(width).enumerate().for_each(fill);
        Ok(SimulationResult::new(time_grid, num_paths, rates))
    }
}
