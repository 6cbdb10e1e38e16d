use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::activation::ActivationType;
use crate::cost::CostType;
use crate::error::{NnError, Result};
use crate::network::network::Network;

/// Learned parameters of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSaveData {
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
    pub activation_type: ActivationType,
}

/// Serialized snapshot of a network: architecture, parameters, and the
/// activation/cost tags needed to rebuild it.
///
/// ```json
/// { "layerSizes": [...], "connections": [{ "weights": [...], "biases": [...],
///   "activationType": "ReLU" }, ...], "costFunctionType": "CrossEntropy" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSaveData {
    pub layer_sizes: Vec<usize>,
    pub connections: Vec<ConnectionSaveData>,
    pub cost_function_type: CostType,
}

impl NetworkSaveData {
    pub fn from_network(network: &Network) -> NetworkSaveData {
        NetworkSaveData {
            layer_sizes: network.layer_sizes().to_vec(),
            connections: network.layers().iter()
                .map(|layer| ConnectionSaveData {
                    weights: layer.weights().to_vec(),
                    biases: layer.biases().to_vec(),
                    activation_type: layer.activation,
                })
                .collect(),
            cost_function_type: network.cost(),
        }
    }

    /// Rebuilds a live network. Every saved array must have exactly the length
    /// the architecture implies.
    pub fn load_network(&self) -> Result<Network> {
        if self.layer_sizes.len() < 2 {
            return Err(NnError::InvalidData(format!(
                "layerSizes needs at least two entries, got {:?}",
                self.layer_sizes
            )));
        }

        let layer_count = self.layer_sizes.len() - 1;
        if self.connections.len() != layer_count {
            return Err(NnError::shape("connections", layer_count, self.connections.len()));
        }

        // Check the saved arrays before allocating anything from `layerSizes`.
        for (pair, connection) in self.layer_sizes.windows(2).zip(&self.connections) {
            let weight_count = pair[0].checked_mul(pair[1]).ok_or_else(|| {
                NnError::InvalidData(format!(
                    "layer of {} x {} nodes is too large",
                    pair[0], pair[1]
                ))
            })?;
            if connection.weights.len() != weight_count {
                return Err(NnError::shape("layer weights", weight_count, connection.weights.len()));
            }
            if connection.biases.len() != pair[1] {
                return Err(NnError::shape("layer biases", pair[1], connection.biases.len()));
            }
        }

        let mut network = Network::new(&self.layer_sizes);

        for (layer, connection) in network.layers_mut().iter_mut().zip(&self.connections) {
            layer.load_parameters(&connection.weights, &connection.biases)?;
            layer.set_activation(connection.activation_type);
        }
        network.set_cost_function(self.cost_function_type);

        Ok(network)
    }

    pub fn serialize_network(network: &Network) -> Result<String> {
        Ok(serde_json::to_string(&NetworkSaveData::from_network(network))?)
    }

    pub fn load_network_from_data(data: &str) -> Result<Network> {
        serde_json::from_str::<NetworkSaveData>(data)?.load_network()
    }

    /// Writes the network to `path` as pretty-printed JSON.
    pub fn save_to_file(network: &Network, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &NetworkSaveData::from_network(network))?;
        info!(path = %path.display(), layer_sizes = ?network.layer_sizes(), "saved network");
        Ok(())
    }

    pub fn load_network_from_file(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let save_data: NetworkSaveData = serde_json::from_reader(reader)?;
        let network = save_data.load_network()?;
        info!(path = %path.display(), layer_sizes = ?network.layer_sizes(), "loaded network");
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn trained_shape() -> Network {
        let mut network = Network::with_rng(&[3, 4, 2], &mut StdRng::seed_from_u64(5));
        network.set_activation_functions(ActivationType::SiLU, ActivationType::Softmax);
        network.set_cost_function(CostType::CrossEntropy);
        network
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let json = NetworkSaveData::serialize_network(&trained_shape()).unwrap();
        assert!(json.contains("\"layerSizes\":[3,4,2]"));
        assert!(json.contains("\"costFunctionType\":\"CrossEntropy\""));
        assert!(json.contains("\"activationType\":\"SiLU\""));
    }

    #[test]
    fn round_trip_restores_tags() {
        let network = trained_shape();
        let loaded = NetworkSaveData::load_network_from_data(
            &NetworkSaveData::serialize_network(&network).unwrap(),
        ).unwrap();
        assert_eq!(loaded.cost(), CostType::CrossEntropy);
        assert_eq!(loaded.layers()[0].activation, ActivationType::SiLU);
        assert_eq!(loaded.layers()[1].activation, ActivationType::Softmax);
        assert_eq!(loaded.layers()[0].weights(), network.layers()[0].weights());
    }

    #[test]
    fn rejects_overflowing_layer_sizes() {
        let json = r#"{"layerSizes":[4294967296,4294967296],
            "connections":[{"weights":[],"biases":[],"activationType":"ReLU"}],
            "costFunctionType":"MeanSquareError"}"#;
        let result = NetworkSaveData::load_network_from_data(json);
        assert!(matches!(result, Err(NnError::InvalidData(_))));
    }

    #[test]
    fn rejects_huge_layer_sizes_without_matching_arrays() {
        let json = r#"{"layerSizes":[1000000,1000000],
            "connections":[{"weights":[0.5],"biases":[0.0],"activationType":"ReLU"}],
            "costFunctionType":"MeanSquareError"}"#;
        let result = NetworkSaveData::load_network_from_data(json);
        assert!(matches!(
            result,
            Err(NnError::ShapeMismatch { expected: 1_000_000_000_000, actual: 1, .. })
        ));
    }

    #[test]
    fn rejects_wrong_bias_count() {
        let mut save_data = NetworkSaveData::from_network(&trained_shape());
        save_data.connections[0].biases.push(0.0);
        assert!(matches!(
            save_data.load_network(),
            Err(NnError::ShapeMismatch { expected: 4, actual: 5, .. })
        ));
    }

    #[test]
    fn rejects_wrong_weight_count() {
        let mut save_data = NetworkSaveData::from_network(&trained_shape());
        save_data.connections[1].weights.pop();
        assert!(matches!(save_data.load_network(), Err(NnError::ShapeMismatch { .. })));
    }

    #[test]
    fn rejects_missing_connections() {
        let mut save_data = NetworkSaveData::from_network(&trained_shape());
        save_data.connections.truncate(1);
        assert!(matches!(
            save_data.load_network(),
            Err(NnError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            NetworkSaveData::load_network_from_data("{\"layerSizes\": [2, 2], \"connections\": ["),
            Err(NnError::Json(_))
        ));
        assert!(NetworkSaveData::load_network_from_data("{\"layerSizes\": [2, 2]}").is_err());
    }
}
