//! Simulated short-rate paths.

/// Sample statistics of the short rate at one grid time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SampleMoments {
    /// Grid time.
    pub time: f64,
    /// Sample mean.
    pub mean: f64,
    /// Unbiased sample variance; zero for a single path.
    pub variance: f64,
    /// Standard error of the mean.
    pub std_error: f64,
}

/// Path table produced by the simulator.
///
/// Immutable once produced. `rate(i, j)` is the short rate at `time_grid[i]`
/// on path `j`; `rate(0, j)` is `r(0)` for every path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationResult {
    time_grid: Vec<f64>,
    num_paths: usize,
    /// Path-major: path `j` occupies `rates[j·T..(j+1)·T]`, `T = time_grid.len()`.
    rates: Vec<f64>,
}

impl SimulationResult {
    pub(crate) fn new(time_grid: Vec<f64>, num_paths: usize, rates: Vec<f64>) -> Self {
        debug_assert_eq!(rates.len(), time_grid.len() * num_paths);
        Self {
            time_grid,
            num_paths,
            rates,
        }
    }

    /// Grid times, starting at 0.
    #[inline]
    pub fn time_grid(&self) -> &[f64] {
        &self.time_grid
    }

    /// Number of paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Number of grid points, including `t = 0`.
    #[inline]
    pub fn num_timesteps(&self) -> usize {
        self.time_grid.len()
    }

    /// Short rate at grid point `step` on path `path`.
    #[inline]
    pub fn rate(&self, step: usize, path: usize) -> Option<f64> {
        let n = self.num_timesteps();
        (step < n && path < self.num_paths).then(|| self.rates[path * n + step])
    }

    /// Full trajectory of path `path`.
    #[inline]
    pub fn path(&self, path: usize) -> Option<&[f64]> {
        let n = self.num_timesteps();
        (path < self.num_paths).then(|| &self.rates[path * n..(path + 1) * n])
    }

    /// Iterator over trajectories in path order.
    pub fn paths(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.rates.chunks_exact(self.num_timesteps().max(1))
    }

    /// Short rate at grid point `step` across all paths.
    pub fn rates_at(&self, step: usize) -> Option<Vec<f64>> {
        (step < self.num_timesteps()).then(|| self.paths().map(|p| p[step]).collect())
    }

    /// Pathwise discount factors `exp(−∫₀^{t_step} r dt)`, trapezoidal rule.
    pub fn discount_factors(&self, step: usize) -> Option<Vec<f64>> {
        if step >= self.num_timesteps() {
            return None;
        }
        let grid = &self.time_grid;
        Some(
            self.paths()
                .map(|p| {
                    let integral: f64 = (0..step)
                        .map(|i| 0.5 * (p[i] + p[i + 1]) * (grid[i + 1] - grid[i]))
                        .sum();
                    (-integral).exp()
                })
                .collect(),
        )
    }

    /// Mean, variance and standard error of the rate at grid point `step`.
    pub fn sample_moments(&self, step: usize) -> Option<SampleMoments> {
        let rates = self.rates_at(step)?;
        let (mean, variance) = mean_and_variance(&rates);
        Some(SampleMoments {
            time: self.time_grid[step],
            mean,
            variance,
            std_error: (variance / rates.len() as f64).sqrt(),
        })
    }
}

/// Sample mean and unbiased variance; variance is zero below two samples.
pub(crate) fn mean_and_variance(xs: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    if xs.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let mean = xs.iter().sum::<f64>() / n;
    let variance = if xs.len() < 2 {
        0.0
    } else {
        xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
    };
    (mean, variance)
}
