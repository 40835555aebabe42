use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::Distribution;

use crate::error::{MergeError, Result};
use crate::gaussian::{Gaussian, MvGaussian};
use crate::merge::{merge_1d, merge_multivariate};

/// Weighted mixture of univariate Gaussians.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mixture {
    components: Vec<(f64, Gaussian)>,
}

impl Mixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(means: &[f64], variances: &[f64], weights: &[f64]) -> Result<Self> {
        if variances.len() != means.len() {
            return Err(MergeError::shape("variances", means.len(), variances.len()));
        }
        if weights.len() != means.len() {
            return Err(MergeError::shape("weights", means.len(), weights.len()));
        }
        let components = weights
            .iter()
            .zip(means.iter().zip(variances))
            .map(|(&w, (&m, &v))| (w, Gaussian::new(m, v)))
            .collect();
        Ok(Self { components })
    }

    pub fn push(&mut self, weight: f64, g: Gaussian) {
        self.components.push((weight, g));
    }

    pub fn with(mut self, weight: f64, g: Gaussian) -> Self {
        self.push(weight, g);
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[(f64, Gaussian)] {
        &self.components
    }

    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(|(w, _)| w).sum()
    }

    /// Moment-matched Gaussian of this mixture (weights normalised).
    pub fn merge(&self) -> Result<Gaussian> {
        let (weights, (means, vars)): (Vec<f64>, (Vec<f64>, Vec<f64>)) = self
            .components
            .iter()
            .map(|(w, g)| (*w, (g.mean, g.var)))
            .unzip();
        merge_1d(&means, &vars, &weights)
    }

    /// `weight * pdf` of every component at `x`, as given.
    pub fn weighted_pdfs(&self, x: f64) -> Vec<f64> {
        self.components.iter().map(|(w, g)| w * g.pdf(x)).collect()
    }

    /// Mixture density at `x`, with weights normalised. Zero for an empty or
    /// zero-weight mixture.
    pub fn pdf(&self, x: f64) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        self.weighted_pdfs(x).iter().sum::<f64>() / total
    }

    /// Draws one value: a component by weight, then a value from it.
    /// `None` if the weights cannot form a distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<f64> {
        let index = WeightedIndex::new(self.components.iter().map(|(w, _)| *w)).ok()?;
        let (_, g) = self.components[index.sample(rng)];
        Some(g.sample(rng))
    }
}

/// Weighted mixture of multivariate Gaussians.
///
/// Weights are kept as given; [`MvMixture::merge`] does not renormalise them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MvMixture {
    components: Vec<(f64, MvGaussian)>,
}

impl MvMixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, weight: f64, g: MvGaussian) {
        self.components.push((weight, g));
    }

    pub fn with(mut self, weight: f64, g: MvGaussian) -> Self {
        self.push(weight, g);
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[(f64, MvGaussian)] {
        &self.components
    }

    pub fn merge(&self) -> Result<MvGaussian> {
        let weights: Vec<f64> = self.components.iter().map(|(w, _)| *w).collect();
        let means: Vec<na::DVector<f64>> =
            self.components.iter().map(|(_, g)| g.mean.clone()).collect();
        let covariances: Vec<na::DMatrix<f64>> =
            self.components.iter().map(|(_, g)| g.cov.clone()).collect();
        merge_multivariate(&means, &covariances, &weights)
    }

    /// `sum weight_i * pdf_i(x)` with weights as given. `None` if any
    /// component covariance is singular.
    pub fn pdf(&self, x: &na::DVector<f64>) -> Option<f64> {
        self.components
            .iter()
            .map(|(w, g)| g.pdf(x).map(|p| w * p))
            .sum()
    }

    /// Draws `n` points. Components are picked in proportion to their weights
    /// whatever the weights sum to.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Option<Vec<na::DVector<f64>>> {
        let index = WeightedIndex::new(self.components.iter().map(|(w, _)| *w)).ok()?;
        // 各成分の平方根行列は先に求めておく
        let roots = self
            .components
            .iter()
            .map(|(_, g)| g.sqrt_cov())
            .collect::<Option<Vec<_>>>()?;
        let points = (0..n)
            .map(|_| {
                let i = index.sample(rng);
                MvGaussian::sample_with(&self.components[i].1.mean, &roots[i], rng)
            })
            .collect();
        Some(points)
    }
}
