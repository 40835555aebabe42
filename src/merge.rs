//! Moment matching of Gaussian mixtures.
//!
//! A weighted mixture `sum w_i N(mu_i, P_i)` is replaced by the single
//! Gaussian with the same first and second moments:
//!
//! ```text
//! mu = sum w_i mu_i
//! P  = sum w_i P_i + sum w_i (mu_i - mu)(mu_i - mu)^T
//! ```
//!
//! The first covariance term is the spread inside the components, the second
//! the spread of the component means around the merged mean.
//!
//! [`merge_1d`] and [`merge_multivariate`] are thin entry points over
//! [`moment_match`]; the scalar case runs through the kernel as a 1x1 matrix.
//! They differ in how weights are treated, see [`Weighting`].

use log::{debug, warn};

use crate::error::{MergeError, Result};
use crate::gaussian::{Gaussian, MvGaussian};

/// 対称性・半正定値性の判定に使う相対許容誤差
const TOLERANCE: f64 = 1e-9;
/// 重み和が1から外れているとみなす閾値
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// How the kernel consumes the weight sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weighting {
    /// Divide every weight by the total so that they sum to 1.
    /// A zero total is rejected.
    Normalize,
    /// Use the weights exactly as given. If they do not sum to 1 the result
    /// is not guaranteed to be a valid covariance.
    AsGiven,
}

/// Merges N univariate Gaussians into one.
///
/// Weights are normalised before use, so only their ratios matter.
pub fn merge_1d(means: &[f64], variances: &[f64], weights: &[f64]) -> Result<Gaussian> {
    check_len("variances", means.len(), variances.len())?;
    check_len("weights", means.len(), weights.len())?;
    for (i, &var) in variances.iter().enumerate() {
        if !(var > 0.0 && var.is_finite()) {
            return Err(MergeError::invalid(format!(
                "variance[{i}] must be positive and finite, got {var}"
            )));
        }
    }

    // スカラーは 1x1 の行列として扱う
    let means: Vec<na::DVector<f64>> = means
        .iter()
        .map(|&m| na::DVector::from_element(1, m))
        .collect();
    let covariances: Vec<na::DMatrix<f64>> = variances
        .iter()
        .map(|&v| na::DMatrix::from_element(1, 1, v))
        .collect();

    let merged = moment_match(&means, &covariances, weights, Weighting::Normalize)?;
    Ok(Gaussian::new(merged.mean[0], merged.cov[(0, 0)]))
}

/// Merges N d-dimensional Gaussians into one.
///
/// Weights are used as given and are NOT renormalised. Callers wanting a
/// proper mixture must pass weights summing to 1, or call [`moment_match`]
/// with [`Weighting::Normalize`].
pub fn merge_multivariate(
    means: &[na::DVector<f64>],
    covariances: &[na::DMatrix<f64>],
    weights: &[f64],
) -> Result<MvGaussian> {
    moment_match(means, covariances, weights, Weighting::AsGiven)
}

/// Shared kernel behind both entry points.
///
/// All inputs are validated before anything is accumulated, and a result
/// that does not fit in f64 is reported as [`MergeError::InvalidInput`].
pub fn moment_match(
    means: &[na::DVector<f64>],
    covariances: &[na::DMatrix<f64>],
    weights: &[f64],
    weighting: Weighting,
) -> Result<MvGaussian> {
    let dim = validate(means, covariances, weights)?;
    let weights = resolve_weights(weights, weighting)?;
    debug!(
        "merging {} gaussians of dim {} ({:?})",
        means.len(),
        dim,
        weighting
    );

    // 重み付き平均
    let mut mean = na::DVector::<f64>::zeros(dim);
    for (m, &w) in means.iter().zip(&weights) {
        mean += w * m;
    }

    // 成分内の共分散 + 平均のばらつきによる共分散
    let mut cov = na::DMatrix::<f64>::zeros(dim, dim);
    for ((m, p), &w) in means.iter().zip(covariances).zip(&weights) {
        let diff = m - &mean;
        cov += w * p + w * &diff * diff.transpose();
    }

    // 有限な入力でも平均の差の2乗はオーバーフローし得る
    if !mean.iter().chain(cov.iter()).all(|x| x.is_finite()) {
        return Err(MergeError::invalid(
            "merged moments overflow the f64 range",
        ));
    }
    Ok(MvGaussian::new(mean, cov))
}

fn resolve_weights(weights: &[f64], weighting: Weighting) -> Result<Vec<f64>> {
    match weighting {
        Weighting::Normalize => {
            // 負の重みは弾いてあるので max == 0 は全て0の場合のみ
            let max = weights.iter().fold(0.0_f64, |acc, &w| acc.max(w));
            if max <= 0.0 {
                return Err(MergeError::invalid("weights sum to zero"));
            }
            // 最大値で割ってから和を取り, 和のオーバーフローを避ける
            let scaled: Vec<f64> = weights.iter().map(|w| w / max).collect();
            let sum: f64 = scaled.iter().sum();
            Ok(scaled.iter().map(|w| w / sum).collect())
        }
        Weighting::AsGiven => {
            let sum: f64 = weights.iter().sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                warn!("weights sum to {sum}, merged covariance may not be positive semidefinite");
            }
            Ok(weights.to_vec())
        }
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(MergeError::shape(what, expected, found));
    }
    Ok(())
}

/// Checks shapes and numeric sanity of a merge request, returning the
/// common dimension.
fn validate(
    means: &[na::DVector<f64>],
    covariances: &[na::DMatrix<f64>],
    weights: &[f64],
) -> Result<usize> {
    let first = means
        .first()
        .ok_or_else(|| MergeError::invalid("no components to merge"))?;
    check_len("covariances", means.len(), covariances.len())?;
    check_len("weights", means.len(), weights.len())?;

    let dim = first.len();
    if dim == 0 {
        return Err(MergeError::invalid("components have dimension zero"));
    }

    for (i, m) in means.iter().enumerate() {
        check_len("mean dimension", dim, m.len())?;
        if !m.iter().all(|x| x.is_finite()) {
            return Err(MergeError::invalid(format!("mean[{i}] is not finite")));
        }
    }
    for (i, p) in covariances.iter().enumerate() {
        check_len("covariance rows", dim, p.nrows())?;
        check_len("covariance columns", dim, p.ncols())?;
        check_covariance(i, p)?;
    }
    for (i, &w) in weights.iter().enumerate() {
        if !(w >= 0.0 && w.is_finite()) {
            return Err(MergeError::invalid(format!(
                "weight[{i}] must be non-negative and finite, got {w}"
            )));
        }
    }
    Ok(dim)
}

fn check_covariance(i: usize, p: &na::DMatrix<f64>) -> Result<()> {
    if !p.iter().all(|x| x.is_finite()) {
        return Err(MergeError::invalid(format!("covariance[{i}] is not finite")));
    }
    let scale = p.amax().max(1.0);
    if (p - p.transpose()).amax() > TOLERANCE * scale {
        return Err(MergeError::invalid(format!(
            "covariance[{i}] is not symmetric"
        )));
    }
    let min_eig = p.symmetric_eigenvalues().min();
    if min_eig < -TOLERANCE * scale {
        return Err(MergeError::invalid(format!(
            "covariance[{i}] is not positive semidefinite (eigenvalue {min_eig:e})"
        )));
    }
    Ok(())
}
