pub mod config;
pub mod network;
pub mod save_data;

pub use config::NetworkConfig;
pub use network::{max_value_index, Network};
pub use save_data::{ConnectionSaveData, NetworkSaveData};
