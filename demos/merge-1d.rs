use anyhow::Result;
use gaussmerge::grid::{density_curves, linspace, write_curves_csv};
use gaussmerge::Mixture;

const MEANS: [f64; 3] = [0.0, 5.0, 10.0];
const VARIANCES: [f64; 3] = [1.0, 2.0, 1.5];
const WEIGHTS: [f64; 3] = [0.2, 0.5, 0.3];

// 描画範囲
const X_MIN: f64 = -5.0;
const X_MAX: f64 = 15.0;
const POINTS: usize = 1000;
// 検算用のサンプル数
const SAMPLES: usize = 100_000;

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;

    let mixture = Mixture::from_parts(&MEANS, &VARIANCES, &WEIGHTS)?;
    let merged = mixture.merge()?;
    println!("merged: {}", merged);

    for (i, (w, g)) in mixture.components().iter().enumerate() {
        print!("gaussian {}: ", i + 1);
        print!("weight: {:4.2}, ", w);
        println!("{}", g);
    }

    // 混合分布から直接サンプリングして合成結果と比べる
    let mut rng = rand::thread_rng();
    let xs: Vec<f64> = (0..SAMPLES)
        .filter_map(|_| mixture.sample(&mut rng))
        .collect();
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    print!("sampled mean: {:6.2}, ", mean);
    println!("sampled var: {:6.2}", var);

    let file_path = "logs/merge-1d.csv";
    let curves = density_curves(&mixture, &merged, &linspace(X_MIN, X_MAX, POINTS));
    write_curves_csv(file_path, &curves)?;
    log::info!("wrote {}", file_path);
    Ok(())
}
