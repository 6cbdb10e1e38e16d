mod common;

use ferrite_digits::{
    evaluate, train_loop, ActivationType, CostType, DataPoint, Network, NetworkSaveData,
    TrainConfig,
};
use rand::{rngs::StdRng, SeedableRng};

use common::{assert_close, seeded_network, toy_dataset};

#[test]
fn full_batch_descent_never_increases_cost() {
    let data = toy_dataset();
    let mut network = seeded_network(&[2, 3, 2], 17);

    let mut costs = vec![evaluate(&network, &data).mean_cost];
    for _ in 0..500 {
        network.learn(&data, 0.3, 0.0, 0.0);
        costs.push(evaluate(&network, &data).mean_cost);
    }

    for (step, pair) in costs.windows(2).enumerate() {
        assert!(
            pair[1] <= pair[0] + 1e-12,
            "cost rose at step {}: {} -> {}",
            step,
            pair[0],
            pair[1]
        );
    }
    assert!(costs[500] < costs[0], "cost did not fall: {} -> {}", costs[0], costs[500]);
}

#[test]
fn momentum_training_separates_toy_clusters() {
    let data = toy_dataset();
    let mut network = seeded_network(&[2, 3, 2], 3);

    for _ in 0..3000 {
        network.learn(&data, 1.0, 0.0, 0.5);
    }

    let evaluation = evaluate(&network, &data);
    assert_eq!(evaluation.correct, data.len(), "accuracy was {}", evaluation.accuracy);
}

#[test]
fn softmax_cross_entropy_learns() {
    let data = toy_dataset();
    let mut network = seeded_network(&[2, 4, 2], 9);
    network.set_activation_functions(ActivationType::ReLU, ActivationType::Softmax);
    network.set_cost_function(CostType::CrossEntropy);

    let before = evaluate(&network, &data).mean_cost;
    for _ in 0..300 {
        network.learn(&data, 0.1, 0.0, 0.5);
    }
    let after = evaluate(&network, &data);
    assert!(after.mean_cost < before, "cost did not fall: {} -> {}", before, after.mean_cost);
    let (_, outputs) = network.classify(&data[0].inputs);
    assert!((outputs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn parallel_learning_matches_single_threaded() {
    // Batch far larger than the worker count so many samples contend for
    // the same gradient accumulators.
    let batch: Vec<DataPoint> = (0..256)
        .map(|i| {
            let x = (i as f64 * 0.37).sin().abs();
            let y = (i as f64 * 0.91).cos().abs();
            DataPoint::new(vec![x, y, x * y], usize::from(x > y), 2)
        })
        .collect();

    let mut parallel = seeded_network(&[3, 8, 5, 2], 21);
    let mut serial = seeded_network(&[3, 8, 5, 2], 21);

    for _ in 0..5 {
        parallel.learn(&batch, 0.3, 0.01, 0.9);
    }

    let single = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    single.install(|| {
        for _ in 0..5 {
            serial.learn(&batch, 0.3, 0.01, 0.9);
        }
    });

    for (a, b) in parallel.layers().iter().zip(serial.layers()) {
        assert_close(a.weights(), b.weights(), 1e-9);
        assert_close(a.biases(), b.biases(), 1e-9);
    }
}

/// Same parameters and strategies, but no scratch pool and no velocities.
fn fresh_copy(network: &Network) -> Network {
    let json = NetworkSaveData::serialize_network(network).unwrap();
    NetworkSaveData::load_network_from_data(&json).unwrap()
}

#[test]
fn changing_batch_size_uses_every_sample() {
    let data = toy_dataset();
    let mut network = seeded_network(&[2, 3, 2], 4);

    // Growing, shrinking and regrowing batches against a network whose pool is
    // sized by earlier calls. Momentum is off, so a fresh copy stepping once
    // must land on the same parameters.
    let batches: [&[DataPoint]; 5] = [&data[..5], &data, &data[..1], &data[2..9], &data];
    let initial_weights = network.layers()[0].weights().to_vec();
    for (step, batch) in batches.iter().enumerate() {
        let mut reference = fresh_copy(&network);
        reference.learn(batch, 0.5, 0.0, 0.0);
        network.learn(batch, 0.5, 0.0, 0.0);

        for (layer, expected) in network.layers().iter().zip(reference.layers()) {
            assert_close(layer.weights(), expected.weights(), 1e-12);
            assert_close(layer.biases(), expected.biases(), 1e-12);
        }
        assert_ne!(
            network.layers()[0].weights(),
            initial_weights.as_slice(),
            "step {} left the network untouched",
            step
        );
    }
}

#[test]
fn single_sample_after_full_batch_matches_fresh_network() {
    let data = toy_dataset();
    let mut network = seeded_network(&[2, 2], 6);
    network.learn(&data, 0.5, 0.0, 0.0);

    let mut reference = fresh_copy(&network);
    let before = fresh_copy(&network);
    reference.learn(&data[7..8], 0.5, 0.0, 0.0);
    network.learn(&data[7..8], 0.5, 0.0, 0.0);

    assert_ne!(network.layers()[0].weights(), before.layers()[0].weights());
    assert_eq!(network.layers()[0].weights(), reference.layers()[0].weights());
    assert_eq!(network.layers()[0].biases(), reference.layers()[0].biases());
}

#[test]
fn train_loop_reports_every_epoch() {
    let mut data = toy_dataset();
    let validation = data.split_off(10);
    let mut network = seeded_network(&[2, 3, 2], 8);
    let config = TrainConfig {
        epochs: 4,
        mini_batch_size: 3,
        initial_learning_rate: 1.0,
        learn_rate_decay: 0.5,
        regularization: 0.0,
        momentum: 0.5,
        ..TrainConfig::default()
    };

    let mut rng = StdRng::seed_from_u64(1);
    let history =
        train_loop(&mut network, &mut data, Some(validation.as_slice()), &config, &mut rng)
            .unwrap();

    assert_eq!(history.len(), 4);
    assert_eq!(history[0].epoch, 1);
    assert_eq!(history[3].total_epochs, 4);
    assert!((history[2].learn_rate - 0.5).abs() < 1e-12);
    assert!(history.iter().all(|s| s.validation_accuracy.is_some()));
    assert!(history.iter().all(|s| (0.0..=1.0).contains(&s.train_accuracy)));
}

#[test]
fn train_loop_rejects_zero_batch_size() {
    let mut data = toy_dataset();
    let mut network = seeded_network(&[2, 2], 0);
    let config = TrainConfig { mini_batch_size: 0, ..TrainConfig::default() };
    let mut rng = StdRng::seed_from_u64(0);
    assert!(train_loop(&mut network, &mut data, None, &config, &mut rng).is_err());
}
