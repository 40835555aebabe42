extern crate nalgebra as na;

use anyhow::Result;
use gaussmerge::grid::{density_grid, linspace, write_grid_csv};
use gaussmerge::merge_multivariate;
use na::{dmatrix, dvector};

const WEIGHTS: [f64; 2] = [0.5, 0.5];

// 描画範囲 [-5, 8] x [-5, 8]
const LO: f64 = -5.0;
const HI: f64 = 8.0;
const POINTS: usize = 100;

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;

    let means = [dvector![0.0, 0.0], dvector![3.0, 3.0]];
    let covariances = [
        dmatrix![1.0, 0.5; 0.5, 1.0],
        dmatrix![1.5, -0.7; -0.7, 1.5],
    ];

    let merged = merge_multivariate(&means, &covariances, &WEIGHTS)?;
    println!("merged mean: {}", merged.mean.transpose());
    println!("merged cov: {}", merged.cov);

    let xs = linspace(LO, HI, POINTS);
    let ys = linspace(LO, HI, POINTS);
    let inputs = means
        .iter()
        .zip(&covariances)
        .map(|(m, p)| gaussmerge::MvGaussian::new(m.clone(), p.clone()));
    for (i, g) in inputs.enumerate() {
        let file_path = format!("logs/merge-2d-gaussian{}.csv", i + 1);
        write_grid_csv(&file_path, &density_grid(&g, &xs, &ys)?)?;
        log::info!("wrote {}", file_path);
    }
    let file_path = "logs/merge-2d-merged.csv";
    write_grid_csv(file_path, &density_grid(&merged, &xs, &ys)?)?;
    log::info!("wrote {}", file_path);
    Ok(())
}
