use core::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// 1次元ガウス分布
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pub mean: f64,
    pub var: f64,
}

impl Gaussian {
    pub fn new(mean: f64, var: f64) -> Self {
        Self { mean, var }
    }

    pub fn std_dev(&self) -> f64 {
        self.var.sqrt()
    }

    /// Probability density at `x`. Zero when the variance is not positive.
    pub fn pdf(&self, x: f64) -> f64 {
        if self.var <= 0.0 {
            return 0.0;
        }
        (-(x - self.mean).powi(2) / (2.0 * self.var)).exp() / (2.0 * PI * self.var).sqrt()
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        self.mean + self.std_dev() * z
    }
}

impl Default for Gaussian {
    fn default() -> Self {
        Self {
            mean: 0.0,
            var: 0.0,
        }
    }
}

impl core::fmt::Display for Gaussian {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "mean: {:.2}, var: {:.2}", self.mean, self.var)
    }
}

/// 多次元ガウス分布
#[derive(Debug, Clone, PartialEq)]
pub struct MvGaussian {
    pub mean: na::DVector<f64>,
    pub cov: na::DMatrix<f64>,
}

impl MvGaussian {
    pub fn new(mean: na::DVector<f64>, cov: na::DMatrix<f64>) -> Self {
        Self { mean, cov }
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Returns the density function of this distribution, or `None` when the
    /// covariance is not positive definite.
    ///
    /// The Cholesky factor is computed once, so the closure is cheap to call
    /// on every point of a grid.
    pub fn density(&self) -> Option<impl Fn(&na::DVector<f64>) -> f64 + Sync + '_> {
        let chol = self.cov.clone().cholesky()?;
        let log_det = 2.0 * chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum::<f64>();
        let norm = (-0.5 * (self.dim() as f64 * (2.0 * PI).ln() + log_det)).exp();
        Some(move |x: &na::DVector<f64>| {
            let diff = x - &self.mean;
            // マハラノビス距離の2乗
            let maha = diff.dot(&chol.solve(&diff));
            norm * (-0.5 * maha).exp()
        })
    }

    pub fn pdf(&self, x: &na::DVector<f64>) -> Option<f64> {
        self.density().map(|f| f(x))
    }

    /// `L` with `L * L^T = cov`, built from the SVD so that singular
    /// (semidefinite) covariances still have a square root.
    pub fn sqrt_cov(&self) -> Option<na::DMatrix<f64>> {
        let svd = self.cov.clone().svd_unordered(true, false);
        let s_sqrt = na::DMatrix::from_diagonal(&svd.singular_values.map(|x| x.sqrt()));
        let u = svd.u?;
        Some(u * s_sqrt)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<na::DVector<f64>> {
        let l = self.sqrt_cov()?;
        Some(Self::sample_with(&self.mean, &l, rng))
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Option<Vec<na::DVector<f64>>> {
        let l = self.sqrt_cov()?;
        Some((0..n).map(|_| Self::sample_with(&self.mean, &l, rng)).collect())
    }

    pub(crate) fn sample_with<R: Rng + ?Sized>(
        mean: &na::DVector<f64>,
        l: &na::DMatrix<f64>,
        rng: &mut R,
    ) -> na::DVector<f64> {
        let z = na::DVector::<f64>::from_fn(mean.len(), |_, _| StandardNormal.sample(rng));
        mean + l * z
    }
}

impl From<Gaussian> for MvGaussian {
    fn from(g: Gaussian) -> Self {
        Self::new(
            na::DVector::from_element(1, g.mean),
            na::DMatrix::from_element(1, 1, g.var),
        )
    }
}

impl core::fmt::Display for MvGaussian {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "mean:{}cov:{}", self.mean.transpose(), self.cov)
    }
}
