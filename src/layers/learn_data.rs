use crate::layers::dense::Layer;

/// Per-sample scratch for one layer, written by the forward pass and read by
/// the backward pass.
#[derive(Debug, Clone)]
pub struct LayerLearnData {
    /// Copy of the vector that entered the layer.
    pub inputs: Vec<f64>,
    pub weighted_inputs: Vec<f64>,
    pub activations: Vec<f64>,
    /// ∂cost/∂weighted_input for each node.
    pub node_values: Vec<f64>,
}

impl LayerLearnData {
    pub fn new(layer: &Layer) -> LayerLearnData {
        LayerLearnData {
            inputs: vec![0.0; layer.nodes_in()],
            weighted_inputs: vec![0.0; layer.nodes_out()],
            activations: vec![0.0; layer.nodes_out()],
            node_values: vec![0.0; layer.nodes_out()],
        }
    }
}

/// Scratch for a whole network: one `LayerLearnData` per layer.
#[derive(Debug, Clone)]
pub struct NetworkLearnData {
    pub layer_data: Vec<LayerLearnData>,
}

impl NetworkLearnData {
    pub fn new(layers: &[Layer]) -> NetworkLearnData {
        NetworkLearnData {
            layer_data: layers.iter().map(LayerLearnData::new).collect(),
        }
    }
}
