pub mod activation;
pub mod config;
pub mod cost;
pub mod data;
pub mod error;
pub mod layers;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::ActivationType;
pub use config::{DataConfig, RunConfig};
pub use cost::CostType;
pub use data::{DataPoint, Image, ImageLoader};
pub use error::{NnError, Result};
pub use layers::{Layer, LayerLearnData, NetworkLearnData};
pub use network::{Network, NetworkConfig, NetworkSaveData};
pub use train::{evaluate, train_loop, EpochStats, TrainConfig};
