use crate::error::{Error, Result};
use crate::random::XorShift64Star;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingStrategy {
    /// Permutation search: exhaustive for small layers, sampled for large ones, grown jointly
    /// layer by layer and refined one layer at a time.
    #[default]
    Search,
    /// Up/down barycenter sweeps. Cheap, but gives no zero-crossing guarantee.
    Barycenter,
}

impl FromStr for OrderingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "barycenter" => Ok(Self::Barycenter),
            other => Err(Error::InvalidOption {
                name: "strategy",
                reason: format!("unknown strategy `{other}` (expected search or barycenter)"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub strategy: OrderingStrategy,
    /// Upper bound on orderings explored per layer and on joint configurations per search
    /// round. Layers with at most this many orderings are searched exhaustively.
    pub exploration_budget: usize,
    /// Number of down+up passes for [`OrderingStrategy::Barycenter`].
    pub sweep_iterations: usize,
    /// When `false`, over-budget layers take the first orderings of the deterministic
    /// permutation sequence instead of random shuffles, which makes layouts reproducible
    /// without a seed.
    pub sampling: bool,
    /// Seed for sampled orderings. `None` seeds from the system clock.
    pub seed: Option<u64>,
    /// Stop after this many crossing evaluations and keep the best configuration so far.
    ///
    /// The initial configuration (and a hint, when one is offered) is always evaluated before
    /// the cap is checked, and those evaluations count toward it. Must be at least 1.
    pub max_evaluations: Option<usize>,
}

impl LayoutOptions {
    pub const DEFAULT_EXPLORATION_BUDGET: usize = 100;
    pub const DEFAULT_SWEEP_ITERATIONS: usize = 10;

    /// Search without random sampling.
    pub fn exhaustive() -> Self {
        Self {
            sampling: false,
            ..Self::default()
        }
    }

    pub fn barycenter() -> Self {
        Self {
            strategy: OrderingStrategy::Barycenter,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(text)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.exploration_budget == 0 {
            return Err(Error::InvalidOption {
                name: "explorationBudget",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.sweep_iterations == 0 {
            return Err(Error::InvalidOption {
                name: "sweepIterations",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_evaluations == Some(0) {
            return Err(Error::InvalidOption {
                name: "maxEvaluations",
                reason: "must be at least 1; the initial configuration is always evaluated"
                    .to_string(),
            });
        }
        Ok(())
    }

    pub fn random_source(&self) -> XorShift64Star {
        match self.seed {
            Some(seed) => XorShift64Star::new(seed),
            None => XorShift64Star::from_time(),
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            strategy: OrderingStrategy::Search,
            exploration_budget: Self::DEFAULT_EXPLORATION_BUDGET,
            sweep_iterations: Self::DEFAULT_SWEEP_ITERATIONS,
            sampling: true,
            seed: None,
            max_evaluations: None,
        }
    }
}
