//! Self-balancing context size sampler
//!
//! Sizes are drawn from `1..=M` with probability proportional to a weight
//! vector. Each time a drawn size has been *successfully* used, [`adapt`]
//! lowers that size's weight relative to all others (negative feedback), so
//! over a run of `T` successful draws the empirical size distribution is
//! pushed towards uniform coverage.
//!
//! The update is
//!
//! ```text
//! w_i      <- w_i + 1/(T*M)              for every i
//! w_chosen <- w_chosen - 1/(T*M) - 1/T
//! ```
//!
//! Total weight mass shrinks by `1/(T*M)` per adaptation and is never
//! renormalized. Selection only looks at weight ratios, so the shrinking sum
//! does not change which sizes are favoured.
//!
//! [`adapt`]: AdaptiveSizeSampler::adapt

use crate::error::SamplingError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Weighted sampler over context sizes `1..=M`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SamplerSnapshot")]
pub struct AdaptiveSizeSampler {
    /// Candidate sizes, always `1..=M`
    population: Vec<usize>,
    /// Unnormalized selection weights, index-aligned with `population`
    weights: Vec<f64>,
    /// Number of successful draws expected over the sampler's lifetime (`T`)
    budget: usize,
    /// Successful adaptations so far
    adaptations: usize,
}

impl AdaptiveSizeSampler {
    /// Create a sampler over sizes `1..=max_size` with a uniform prior
    ///
    /// # Errors
    /// Returns [`SamplingError::InvalidInput`] if `max_size` or `budget` is 0.
    pub fn new(max_size: usize, budget: usize) -> Result<Self, SamplingError> {
        if max_size == 0 {
            return Err(SamplingError::invalid_input("max size must be at least 1"));
        }
        if budget == 0 {
            return Err(SamplingError::invalid_input(
                "iteration budget must be at least 1",
            ));
        }

        #[allow(clippy::cast_precision_loss)]
        let prior = 1.0 / max_size as f64;

        Ok(Self {
            population: (1..=max_size).collect(),
            weights: vec![prior; max_size],
            budget,
            adaptations: 0,
        })
    }

    /// Pick a size, proportionally to the current weights
    ///
    /// Does not change the sampler. Weights that have drifted below zero
    /// count as zero; if nothing positive is left the pick is uniform.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let index = match WeightedIndex::new(self.weights.iter().map(|w| w.max(0.0))) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..self.population.len()),
        };
        self.population[index]
    }

    /// Record a successful use of `size`
    ///
    /// Must only be called once the downstream work that consumed `size` has
    /// completed. Failed attempts are retried with a fresh [`pick`] and never
    /// adapt.
    ///
    /// # Errors
    /// Returns [`SamplingError::InvalidInput`] if `size` is not in `1..=M`.
    /// The weights are left untouched in that case.
    ///
    /// [`pick`]: AdaptiveSizeSampler::pick
    pub fn adapt(&mut self, size: usize) -> Result<(), SamplingError> {
        let index = self.index_of(size)?;

        #[allow(clippy::cast_precision_loss)]
        let (m, t) = (self.weights.len() as f64, self.budget as f64);
        let boost = 1.0 / (t * m);

        for weight in &mut self.weights {
            *weight += boost;
        }
        self.weights[index] = self.weights[index] - boost - 1.0 / t;
        self.adaptations += 1;

        Ok(())
    }

    /// Candidate sizes
    #[inline]
    #[must_use]
    pub fn population(&self) -> &[usize] {
        &self.population
    }

    /// Current weights, index-aligned with [`population`](Self::population)
    #[inline]
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Current weight of `size`, if it is a candidate
    #[must_use]
    pub fn weight_of(&self, size: usize) -> Option<f64> {
        self.index_of(size).ok().map(|i| self.weights[i])
    }

    /// Largest candidate size (`M`)
    #[inline]
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.population.len()
    }

    /// Iteration budget (`T`)
    #[inline]
    #[must_use]
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Number of successful adaptations so far
    #[inline]
    #[must_use]
    pub fn adaptations(&self) -> usize {
        self.adaptations
    }

    /// Whether the budget of successful draws has been used up
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.adaptations >= self.budget
    }

    fn index_of(&self, size: usize) -> Result<usize, SamplingError> {
        if size == 0 || size > self.population.len() {
            return Err(SamplingError::invalid_input(format!(
                "size {size} is outside 1..={}",
                self.population.len()
            )));
        }
        Ok(size - 1)
    }
}

/// Serialized form, checked on the way back in
#[derive(Deserialize)]
struct SamplerSnapshot {
    population: Vec<usize>,
    weights: Vec<f64>,
    budget: usize,
    adaptations: usize,
}

impl TryFrom<SamplerSnapshot> for AdaptiveSizeSampler {
    type Error = SamplingError;

    fn try_from(snapshot: SamplerSnapshot) -> Result<Self, Self::Error> {
        let expected: Vec<usize> = (1..=snapshot.population.len()).collect();
        if snapshot.population.is_empty() || snapshot.population != expected {
            return Err(SamplingError::invalid_input(
                "population must be 1..=M with M >= 1",
            ));
        }
        if snapshot.weights.len() != snapshot.population.len() {
            return Err(SamplingError::invalid_input(format!(
                "{} weights for {} sizes",
                snapshot.weights.len(),
                snapshot.population.len()
            )));
        }
        if snapshot.budget == 0 {
            return Err(SamplingError::invalid_input(
                "iteration budget must be at least 1",
            ));
        }

        Ok(Self {
            population: snapshot.population,
            weights: snapshot.weights,
            budget: snapshot.budget,
            adaptations: snapshot.adaptations,
        })
    }
}
