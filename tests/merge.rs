extern crate nalgebra as na;

use approx::assert_relative_eq;
use gaussmerge::{
    merge_1d, merge_multivariate, moment_match, Gaussian, MergeError, Mixture, MvGaussian,
    MvMixture, Weighting,
};
use na::{dmatrix, dvector};

#[test]
fn scalar_example_from_three_components() {
    let g = merge_1d(&[0.0, 5.0, 10.0], &[1.0, 2.0, 1.5], &[0.2, 0.5, 0.3]).unwrap();
    assert_relative_eq!(g.mean, 5.5, epsilon = 1e-12);
    assert_relative_eq!(g.var, 13.9, epsilon = 1e-12);
    // within = 1.65, between = 12.25
    let within = 0.2 * 1.0 + 0.5 * 2.0 + 0.3 * 1.5;
    assert_relative_eq!(g.var - within, 12.25, epsilon = 1e-12);
    assert_eq!(format!("{}", g), "mean: 5.50, var: 13.90");
}

#[test]
fn scalar_uniform_weight_scaling_is_invisible() {
    let a = merge_1d(&[1.0, -4.0], &[0.5, 3.0], &[1.0, 3.0]).unwrap();
    let b = merge_1d(&[1.0, -4.0], &[0.5, 3.0], &[10.0, 30.0]).unwrap();
    assert_relative_eq!(a.mean, b.mean, epsilon = 1e-12);
    assert_relative_eq!(a.var, b.var, epsilon = 1e-12);
}

#[test]
fn multivariate_example_from_two_components() {
    let means = [dvector![0.0, 0.0], dvector![3.0, 3.0]];
    let covs = [
        dmatrix![1.0, 0.5; 0.5, 1.0],
        dmatrix![1.5, -0.7; -0.7, 1.5],
    ];
    let g = merge_multivariate(&means, &covs, &[0.5, 0.5]).unwrap();
    assert_relative_eq!(g.mean, dvector![1.5, 1.5], epsilon = 1e-12);
    assert_relative_eq!(g.cov, dmatrix![3.5, 2.15; 2.15, 3.5], epsilon = 1e-12);
    assert!(g.cov.symmetric_eigenvalues().min() >= 0.0);
}

#[test]
fn multivariate_rejects_mixed_dimensions() {
    let means = [dvector![0.0, 0.0], dvector![0.0, 0.0, 0.0]];
    let covs = [na::DMatrix::identity(2, 2), na::DMatrix::identity(3, 3)];
    let err = merge_multivariate(&means, &covs, &[0.5, 0.5]).unwrap_err();
    assert!(matches!(err, MergeError::ShapeMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "shape mismatch in mean dimension: expected 2, found 3"
    );
}

#[test]
fn scalar_rejects_all_zero_weights() {
    let err = merge_1d(&[0.0, 5.0, 10.0], &[1.0, 2.0, 1.5], &[0.0, 0.0, 0.0]).unwrap_err();
    assert!(matches!(err, MergeError::InvalidInput(_)));
}

#[test]
fn policies_differ_only_when_weights_do_not_sum_to_one() {
    let means = [dvector![0.0, 1.0], dvector![2.0, -1.0]];
    let covs = [dmatrix![1.0, 0.0; 0.0, 1.0], dmatrix![0.5, 0.1; 0.1, 0.5]];

    let unit = [0.25, 0.75];
    let a = moment_match(&means, &covs, &unit, Weighting::AsGiven).unwrap();
    let b = moment_match(&means, &covs, &unit, Weighting::Normalize).unwrap();
    assert_relative_eq!(a.mean, b.mean, epsilon = 1e-12);
    assert_relative_eq!(a.cov, b.cov, epsilon = 1e-12);

    let doubled = [0.5, 1.5];
    let c = moment_match(&means, &covs, &doubled, Weighting::AsGiven).unwrap();
    let d = moment_match(&means, &covs, &doubled, Weighting::Normalize).unwrap();
    assert_relative_eq!(d.mean, b.mean, epsilon = 1e-12);
    assert_relative_eq!(c.mean, 2.0 * b.mean, epsilon = 1e-12);
}

#[test]
fn scalar_and_one_dim_multivariate_agree_on_unit_weights() {
    let g = merge_1d(&[0.0, 5.0, 10.0], &[1.0, 2.0, 1.5], &[0.2, 0.5, 0.3]).unwrap();
    let mv = MvMixture::new()
        .with(0.2, MvGaussian::from(Gaussian::new(0.0, 1.0)))
        .with(0.5, MvGaussian::from(Gaussian::new(5.0, 2.0)))
        .with(0.3, MvGaussian::from(Gaussian::new(10.0, 1.5)))
        .merge()
        .unwrap();
    assert_relative_eq!(mv.mean[0], g.mean, epsilon = 1e-12);
    assert_relative_eq!(mv.cov[(0, 0)], g.var, epsilon = 1e-12);
}

#[test]
fn mixture_builder_matches_free_function() {
    let m = Mixture::new()
        .with(1.0, Gaussian::new(-2.0, 0.3))
        .with(2.0, Gaussian::new(4.0, 1.1));
    assert_eq!(m.len(), 2);
    assert_eq!(
        m.merge().unwrap(),
        merge_1d(&[-2.0, 4.0], &[0.3, 1.1], &[1.0, 2.0]).unwrap()
    );
}
