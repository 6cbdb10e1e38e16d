use std::path::Path;

use rand::Rng;
use rayon::prelude::*;

use crate::activation::ActivationType;
use crate::cost::CostType;
use crate::data::DataPoint;
use crate::error::Result;
use crate::layers::{Layer, NetworkLearnData};
use crate::network::config::NetworkConfig;
use crate::network::save_data::NetworkSaveData;

/// A fully connected feedforward network.
#[derive(Debug)]
pub struct Network {
    layers: Vec<Layer>,
    layer_sizes: Vec<usize>,
    cost: CostType,
    // One scratch set per batch slot; rebuilt only when the batch size changes.
    batch_learn_data: Vec<NetworkLearnData>,
}

impl Network {
    /// Builds a network with one layer between each consecutive pair of sizes.
    ///
    /// All layers start as Sigmoid and the cost as mean squared error.
    ///
    /// # Panics
    /// Panics if fewer than two sizes are given.
    pub fn new(layer_sizes: &[usize]) -> Network {
        Network::with_rng(layer_sizes, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Network {
        assert!(layer_sizes.len() >= 2, "a network needs an input and an output size");

        let layers = layer_sizes
            .windows(2)
            .map(|pair| Layer::with_rng(pair[0], pair[1], rng))
            .collect();

        Network {
            layers,
            layer_sizes: layer_sizes.to_vec(),
            cost: CostType::default(),
            batch_learn_data: Vec::new(),
        }
    }

    /// Builds a network from a validated `NetworkConfig`.
    pub fn from_config<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Result<Network> {
        config.validate()?;
        let mut network = Network::with_rng(&config.layer_sizes, rng);
        network.set_activation_functions(config.activation, config.output_activation);
        network.set_cost_function(config.cost);
        Ok(network)
    }

    // -----------------------------------------------------------------------
    // Inference
    // -----------------------------------------------------------------------

    /// Runs the network and returns the index of the largest output (first one
    /// on ties) together with every output.
    pub fn classify(&self, inputs: &[f64]) -> (usize, Vec<f64>) {
        let outputs = self.calculate_outputs(inputs);
        (max_value_index(&outputs), outputs)
    }

    pub fn calculate_outputs(&self, inputs: &[f64]) -> Vec<f64> {
        let mut current = inputs.to_vec();
        for layer in &self.layers {
            current = layer.calculate_outputs(&current);
        }
        current
    }

    // -----------------------------------------------------------------------
    // Training
    // -----------------------------------------------------------------------

    /// One mini-batch gradient descent step over `training_data`.
    ///
    /// Gradients of every sample are computed in parallel and summed into each
    /// layer's accumulators; parameters are only touched afterwards, with the
    /// learn rate divided by the batch size. An empty batch does nothing.
    pub fn learn(
        &mut self,
        training_data: &[DataPoint],
        learn_rate: f64,
        regularization: f64,
        momentum: f64,
    ) {
        if training_data.is_empty() {
            return;
        }

        if self.batch_learn_data.len() != training_data.len() {
            self.batch_learn_data = (0..training_data.len())
                .map(|_| NetworkLearnData::new(&self.layers))
                .collect();
        }

        let layers = &self.layers;
        let cost = self.cost;
        self.batch_learn_data
            .par_iter_mut()
            .zip(training_data.par_iter())
            .for_each(|(learn_data, data_point)| {
                update_gradients(layers, cost, data_point, learn_data)
            });

        let batch_learn_rate = learn_rate / training_data.len() as f64;
        for layer in &mut self.layers {
            layer.apply_gradients(batch_learn_rate, regularization, momentum);
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub fn set_cost_function(&mut self, cost: CostType) {
        self.cost = cost;
    }

    /// Uses `activation` on every layer.
    pub fn set_activation_function(&mut self, activation: ActivationType) {
        self.set_activation_functions(activation, activation);
    }

    /// Uses `activation` on hidden layers and `output_activation` on the last.
    pub fn set_activation_functions(
        &mut self,
        activation: ActivationType,
        output_activation: ActivationType,
    ) {
        if let Some((output, hidden)) = self.layers.split_last_mut() {
            for layer in hidden {
                layer.set_activation(activation);
            }
            output.set_activation(output_activation);
        }
    }

    pub fn cost(&self) -> CostType {
        self.cost
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        NetworkSaveData::save_to_file(self, path)
    }

    /// Loads a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        NetworkSaveData::load_network_from_file(path)
    }
}

/// Forward and backward pass for one sample, adding its gradients to every
/// layer's accumulators.
fn update_gradients(
    layers: &[Layer],
    cost: CostType,
    data_point: &DataPoint,
    learn_data: &mut NetworkLearnData,
) {
    let layer_data = &mut learn_data.layer_data;

    for (i, layer) in layers.iter().enumerate() {
        let (done, rest) = layer_data.split_at_mut(i);
        let inputs = match done.last() {
            Some(previous) => previous.activations.as_slice(),
            None => data_point.inputs.as_slice(),
        };
        layer.calculate_outputs_learn(inputs, &mut rest[0]);
    }

    let output_index = layers.len() - 1;
    let output_layer = &layers[output_index];
    output_layer.calculate_output_layer_node_values(
        &mut layer_data[output_index],
        &data_point.expected_outputs,
        cost,
    );
    output_layer.update_gradients(&layer_data[output_index]);

    for i in (0..output_index).rev() {
        let (head, tail) = layer_data.split_at_mut(i + 1);
        let hidden_layer = &layers[i];
        hidden_layer.calculate_hidden_layer_node_values(
            &mut head[i],
            &layers[i + 1],
            &tail[0].node_values,
        );
        hidden_layer.update_gradients(&head[i]);
    }
}

/// Index of the maximum value; the first one wins on ties.
pub fn max_value_index(values: &[f64]) -> usize {
    let mut max_value = f64::MIN;
    let mut index = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > max_value {
            max_value = value;
            index = i;
        }
    }
    index
}
