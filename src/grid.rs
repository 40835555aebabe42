//! Sampling densities on grids and writing them out as CSV for plotting.

use std::path::Path;

use rayon::prelude::*;

use crate::error::{MergeError, Result};
use crate::gaussian::{Gaussian, MvGaussian};
use crate::mixture::Mixture;

/// `n` evenly spaced points from `start` to `stop`, both ends included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// 1次元の密度曲線
#[derive(Debug, Clone, PartialEq)]
pub struct Curves {
    pub x: Vec<f64>,
    /// `weight * pdf` of each component, one curve per component
    pub components: Vec<Vec<f64>>,
    pub merged: Vec<f64>,
}

pub fn density_curves(mixture: &Mixture, merged: &Gaussian, x: &[f64]) -> Curves {
    let components = mixture
        .components()
        .iter()
        .map(|(w, g)| x.iter().map(|&xi| w * g.pdf(xi)).collect::<Vec<f64>>())
        .collect();
    let merged = x.iter().map(|&xi| merged.pdf(xi)).collect();
    Curves {
        x: x.to_vec(),
        components,
        merged,
    }
}

/// 2次元の密度グリッド. `z[j][i]` は `(x[i], y[j])` での密度
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

/// Evaluates a 2D Gaussian on the `x` by `y` mesh, one row per `y` in
/// parallel.
pub fn density_grid(g: &MvGaussian, x: &[f64], y: &[f64]) -> Result<Grid> {
    if g.dim() != 2 {
        return Err(MergeError::shape("grid dimension", 2, g.dim()));
    }
    let f = g
        .density()
        .ok_or_else(|| MergeError::invalid("covariance is not positive definite"))?;
    let z: Vec<Vec<f64>> = y
        .par_iter()
        .map(|&yj| {
            x.iter()
                .map(|&xi| f(&na::DVector::from_vec(vec![xi, yj])))
                .collect::<Vec<f64>>()
        })
        .collect();
    Ok(Grid {
        x: x.to_vec(),
        y: y.to_vec(),
        z,
    })
}

fn writer(path: &Path) -> anyhow::Result<csv::Writer<std::fs::File>> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(csv::Writer::from_path(path)?)
}

/// Columns: `x`, `component_1` .. `component_n`, `merged`.
pub fn write_curves_csv<P: AsRef<Path>>(path: P, curves: &Curves) -> anyhow::Result<()> {
    let mut wtr = writer(path.as_ref())?;
    let mut header = vec!["x".to_string()];
    header.extend((1..=curves.components.len()).map(|i| format!("component_{i}")));
    header.push("merged".to_string());
    wtr.write_record(&header)?;

    for (i, x) in curves.x.iter().enumerate() {
        let mut row = vec![x.to_string()];
        row.extend(curves.components.iter().map(|c| c[i].to_string()));
        row.push(curves.merged[i].to_string());
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Long format, one `x,y,density` row per mesh point.
pub fn write_grid_csv<P: AsRef<Path>>(path: P, grid: &Grid) -> anyhow::Result<()> {
    let mut wtr = writer(path.as_ref())?;
    wtr.write_record(["x", "y", "density"])?;
    for (yj, row) in grid.y.iter().zip(&grid.z) {
        for (xi, z) in grid.x.iter().zip(row) {
            wtr.write_record([xi.to_string(), yj.to_string(), z.to_string()])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
