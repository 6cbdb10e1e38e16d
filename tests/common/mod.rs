#![allow(dead_code)]

use std::path::PathBuf;

use ferrite_digits::{DataPoint, Network};
use rand::{rngs::StdRng, SeedableRng};

pub fn seeded_network(layer_sizes: &[usize], seed: u64) -> Network {
    Network::with_rng(layer_sizes, &mut StdRng::seed_from_u64(seed))
}

/// Two linearly separable clusters in the unit square: class 0 below the
/// diagonal, class 1 above it.
pub fn toy_dataset() -> Vec<DataPoint> {
    let class_0 = [[0.9, 0.1], [0.8, 0.3], [0.7, 0.2], [0.95, 0.5], [0.6, 0.1], [0.85, 0.05]];
    let class_1 = [[0.1, 0.9], [0.3, 0.8], [0.2, 0.7], [0.5, 0.95], [0.1, 0.6], [0.05, 0.85]];

    class_0.iter().map(|p| DataPoint::new(p.to_vec(), 0, 2))
        .chain(class_1.iter().map(|p| DataPoint::new(p.to_vec(), 1, 2)))
        .collect()
}

pub fn assert_close(a: &[f64], b: &[f64], tolerance: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(
            (x - y).abs() <= tolerance,
            "index {}: {} vs {} (tolerance {})",
            i,
            x,
            y,
            tolerance
        );
    }
}

/// A path under the system temp dir that is unique to this test process.
pub fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ferrite-digits-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir.join(name)
}
