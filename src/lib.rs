//! Moment-matched merging of Gaussian mixtures, scalar and multivariate.
//!
//! ```
//! let g = gaussmerge::merge_1d(&[0.0, 5.0, 10.0], &[1.0, 2.0, 1.5], &[0.2, 0.5, 0.3]).unwrap();
//! assert!((g.mean - 5.5).abs() < 1e-12);
//! assert!((g.var - 13.9).abs() < 1e-12);
//! ```

extern crate nalgebra as na;

pub mod error;
pub mod gaussian;
pub mod grid;
pub mod merge;
pub mod mixture;

pub use error::{MergeError, Result};
pub use gaussian::{Gaussian, MvGaussian};
pub use merge::{merge_1d, merge_multivariate, moment_match, Weighting};
pub use mixture::{Mixture, MvMixture};
