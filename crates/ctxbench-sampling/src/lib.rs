//! ctxbench Sampling
//!
//! Randomness for the context benchmark:
//! - [`draw_elements`] picks symbols uniformly, with replacement
//! - [`AdaptiveSizeSampler`] picks context sizes and rebalances itself after
//!   every successful use so that all sizes get roughly equal coverage
//!
//! Both take the random source by `&mut` so a single seeded generator can be
//! shared across a whole run.
//!
//! # Example
//!
//! ```rust,ignore
//! use ctxbench_sampling::{draw_elements, AdaptiveSizeSampler};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut sampler = AdaptiveSizeSampler::new(10, 100)?;
//!
//! let size = sampler.pick(&mut rng);
//! let symbols = draw_elements(&mut rng, &network_symbols, size)?;
//! // ... only once the context was created:
//! sampler.adapt(size)?;
//! ```

#![warn(unreachable_pub)]

pub mod drawer;
pub mod error;
pub mod sampler;

pub use drawer::draw_elements;
pub use error::SamplingError;
pub use sampler::AdaptiveSizeSampler;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
