pub mod epoch_stats;
pub mod evaluate;
pub mod train_config;
pub mod loop_fn;

pub use epoch_stats::EpochStats;
pub use evaluate::{evaluate, Evaluation};
pub use train_config::TrainConfig;
pub use loop_fn::{split_data, train_loop};
