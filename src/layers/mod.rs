pub mod dense;
pub mod learn_data;

pub use dense::Layer;
pub use learn_data::{LayerLearnData, NetworkLearnData};
