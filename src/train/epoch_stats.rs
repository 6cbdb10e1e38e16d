use serde::{Serialize, Deserialize};

/// Per-epoch training statistics returned by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Learn rate used for this epoch after decay.
    pub learn_rate: f64,
    /// Mean cost over the training set after this epoch.
    pub train_cost: f64,
    /// Fraction of training samples classified correctly, in [0, 1].
    pub train_accuracy: f64,
    pub validation_cost: Option<f64>,
    pub validation_accuracy: Option<f64>,
    /// Wall-clock duration of the epoch (training and evaluation) in milliseconds.
    pub elapsed_ms: u64,
}
