use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::data::DataPoint;
use crate::error::Result;
use crate::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::evaluate::evaluate;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Splits `data` into (training, validation) at `training_split`.
pub fn split_data(
    mut data: Vec<DataPoint>,
    training_split: f64,
) -> (Vec<DataPoint>, Vec<DataPoint>) {
    let split_index = ((data.len() as f64) * training_split.clamp(0.0, 1.0)) as usize;
    let validation = data.split_off(split_index.min(data.len()));
    (data, validation)
}

/// Trains `network` for `config.epochs` epochs of mini-batch gradient descent
/// and returns the statistics of every epoch.
///
/// `training_data` is reshuffled in place at the start of each epoch when
/// `config.shuffle` is set. The last mini-batch of an epoch may be short.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    training_data: &mut [DataPoint],
    validation_data: Option<&[DataPoint]>,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    config.validate()?;

    info!(
        epochs = config.epochs,
        training_samples = training_data.len(),
        validation_samples = validation_data.map_or(0, |v| v.len()),
        mini_batch_size = config.mini_batch_size,
        "starting training"
    );

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        let t_start = Instant::now();
        let learn_rate = config.learn_rate(epoch);

        if config.shuffle {
            training_data.shuffle(rng);
        }

        run_one_epoch(network, training_data, learn_rate, config);

        let train = evaluate(network, training_data);
        let validation = validation_data
            .filter(|data| !data.is_empty())
            .map(|data| evaluate(network, data));

        let stats = EpochStats {
            epoch: epoch + 1,
            total_epochs: config.epochs,
            learn_rate,
            train_cost: train.mean_cost,
            train_accuracy: train.accuracy,
            validation_cost: validation.map(|v| v.mean_cost),
            validation_accuracy: validation.map(|v| v.accuracy),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        info!(
            epoch = stats.epoch,
            total = stats.total_epochs,
            learn_rate = stats.learn_rate,
            train_cost = stats.train_cost,
            train_accuracy = stats.train_accuracy,
            validation_accuracy = ?stats.validation_accuracy,
            elapsed_ms = stats.elapsed_ms,
            "epoch complete"
        );
        history.push(stats);
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn run_one_epoch(
    network: &mut Network,
    training_data: &[DataPoint],
    learn_rate: f64,
    config: &TrainConfig,
) {
    for (batch_index, batch) in training_data.chunks(config.mini_batch_size).enumerate() {
        network.learn(batch, learn_rate, config.regularization, config.momentum);
        debug!(batch = batch_index, size = batch.len(), "applied mini-batch");
    }
}
