//! Integration tests for reproducible fitting

use ndarray::{Array1, Array2};
use podium_model::{
    FittedRegressor, GradientBoostingRegressor, PredictorConfig, RacePredictor, Regressor,
    SplitConfig,
};
use rstest::rstest;

/// Twelve drivers with loosely correlated qualifying and sector times.
fn grid() -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((12, 4), |(i, j)| {
        let base = [87.0, 19.0, 20.0, 21.0][j];
        base + (i as f64) * 0.25 + ((i * 7 + j * 3) % 5) as f64 * 0.1
    });
    let y = Array1::from_shape_fn(12, |i| 63.0 + (i as f64) * 0.6 + ((i * 5) % 3) as f64 * 0.2);
    (x, y)
}

#[rstest]
#[case(42)]
#[case(7)]
#[case(2025)]
fn test_same_seed_same_mae_and_predictions(#[case] seed: u64) {
    let config = PredictorConfig {
        split: SplitConfig {
            seed,
            ..Default::default()
        },
        ..Default::default()
    };
    let (x, y) = grid();

    let first = RacePredictor::new(config).unwrap().train(&x, &y).unwrap();
    let second = RacePredictor::new(config).unwrap().train(&x, &y).unwrap();

    assert!((first.mae() - second.mae()).abs() <= 1e-9);
    assert_eq!(first.predict(&x).unwrap(), second.predict(&x).unwrap());
}

#[test]
fn test_held_out_rows_follow_fraction() {
    let (x, y) = grid();
    let trained = RacePredictor::try_default().unwrap().train(&x, &y).unwrap();
    // ceil(0.2 * 12) = 3
    assert_eq!(trained.test_rows(), 3);
    assert_eq!(trained.train_rows(), 9);
}

#[test]
fn test_boosting_beats_mean_on_training_data() {
    let (x, y) = grid();
    let model = GradientBoostingRegressor::try_default()
        .unwrap()
        .fit(&x, &y)
        .unwrap();
    let preds = model.predict(&x).unwrap();

    let mean = y.mean().unwrap_or(0.0);
    let sse_model: f64 = preds.iter().zip(&y).map(|(p, t)| (p - t).powi(2)).sum();
    let sse_mean: f64 = y.iter().map(|t| (t - mean).powi(2)).sum();
    assert!(sse_model < sse_mean * 0.01);
}
