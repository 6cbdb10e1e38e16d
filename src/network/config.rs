use serde::{Serialize, Deserialize};

use crate::activation::ActivationType;
use crate::cost::CostType;
use crate::error::{NnError, Result};

/// Architecture of a network: layer sizes plus the activation and cost
/// functions it is built with.
///
/// Kept separate from the trained weights so an architecture can be written
/// into a run configuration before any training happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Input size first, output size last.
    pub layer_sizes: Vec<usize>,
    /// Activation used by every hidden layer.
    pub activation: ActivationType,
    pub output_activation: ActivationType,
    pub cost: CostType,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            layer_sizes: vec![784, 100, 10],
            activation: ActivationType::ReLU,
            output_activation: ActivationType::Softmax,
            cost: CostType::CrossEntropy,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(NnError::InvalidConfig(format!(
                "layer_sizes needs at least an input and an output size, got {:?}",
                self.layer_sizes
            )));
        }
        if self.layer_sizes.contains(&0) {
            return Err(NnError::InvalidConfig(format!(
                "layer_sizes must all be positive, got {:?}",
                self.layer_sizes
            )));
        }
        Ok(())
    }
}
