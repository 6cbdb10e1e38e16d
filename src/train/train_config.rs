use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};

/// Hyperparameters for a `train_loop` run.
///
/// # Fields
/// - `epochs`               : full passes over the training data
/// - `mini_batch_size`      : samples per `Network::learn` call
/// - `initial_learning_rate`: learn rate of the first epoch
/// - `learn_rate_decay`     : epoch `k` uses `initial / (1 + decay * k)`
/// - `regularization`       : decoupled weight decay strength
/// - `momentum`             : velocity carried between updates
/// - `training_split`       : fraction of the data used for training; the
///                             rest is held out for validation
/// - `shuffle`              : reshuffle the training data every epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub initial_learning_rate: f64,
    pub learn_rate_decay: f64,
    pub regularization: f64,
    pub momentum: f64,
    pub training_split: f64,
    pub shuffle: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 10,
            mini_batch_size: 32,
            initial_learning_rate: 0.05,
            learn_rate_decay: 0.075,
            regularization: 0.1,
            momentum: 0.9,
            training_split: 0.8,
            shuffle: true,
        }
    }
}

impl TrainConfig {
    /// Learn rate for the 0-based `epoch`.
    pub fn learn_rate(&self, epoch: usize) -> f64 {
        self.initial_learning_rate / (1.0 + self.learn_rate_decay * epoch as f64)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mini_batch_size == 0 {
            return Err(NnError::InvalidConfig("mini_batch_size must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.training_split) {
            return Err(NnError::InvalidConfig(format!(
                "training_split must lie in [0, 1], got {}",
                self.training_split
            )));
        }
        Ok(())
    }
}
