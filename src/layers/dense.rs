use parking_lot::Mutex;
use rand::Rng;

use crate::activation::ActivationType;
use crate::cost::CostType;
use crate::error::{NnError, Result};
use crate::layers::learn_data::LayerLearnData;
use crate::math::random::sample_normal;

/// Accumulated cost gradients for one layer, summed over every sample of the
/// current mini-batch.
#[derive(Debug, Clone)]
struct LayerGradients {
    weights: Vec<f64>,
    biases: Vec<f64>,
}

/// A fully connected layer: one affine transform followed by an activation.
///
/// Weights are stored flattened, one row per output node:
/// `weights[node_out * nodes_in + node_in]`.
#[derive(Debug)]
pub struct Layer {
    nodes_in: usize,
    nodes_out: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
    // The only state written during the parallel part of a batch.
    gradients: Mutex<LayerGradients>,
    weight_velocities: Vec<f64>,
    bias_velocities: Vec<f64>,
    pub activation: ActivationType,
}

impl Layer {
    pub fn new(nodes_in: usize, nodes_out: usize) -> Layer {
        Layer::with_rng(nodes_in, nodes_out, &mut rand::thread_rng())
    }

    /// Builds a Sigmoid layer with zero biases and weights drawn from
    /// N(0, 1) / sqrt(nodes_in).
    pub fn with_rng<R: Rng + ?Sized>(nodes_in: usize, nodes_out: usize, rng: &mut R) -> Layer {
        let n_weights = nodes_in * nodes_out;
        let mut layer = Layer {
            nodes_in,
            nodes_out,
            weights: vec![0.0; n_weights],
            biases: vec![0.0; nodes_out],
            gradients: Mutex::new(LayerGradients {
                weights: vec![0.0; n_weights],
                biases: vec![0.0; nodes_out],
            }),
            weight_velocities: vec![0.0; n_weights],
            bias_velocities: vec![0.0; nodes_out],
            activation: ActivationType::Sigmoid,
        };
        layer.initialize_random_weights(rng);
        layer
    }

    pub fn initialize_random_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let scale = (self.nodes_in as f64).sqrt();
        for w in self.weights.iter_mut() {
            *w = sample_normal(rng, 0.0, 1.0) / scale;
        }
    }

    // -----------------------------------------------------------------------
    // Forward pass
    // -----------------------------------------------------------------------

    /// Inference-only forward pass. Leaves the layer untouched.
    pub fn calculate_outputs(&self, inputs: &[f64]) -> Vec<f64> {
        let mut weighted_inputs = vec![0.0; self.nodes_out];
        self.weighted_inputs_into(inputs, &mut weighted_inputs);

        (0..self.nodes_out)
            .map(|node| self.activation.activate(&weighted_inputs, node))
            .collect()
    }

    /// Forward pass that records inputs, weighted inputs and activations in
    /// `learn_data` for the backward pass.
    ///
    /// Only `learn_data` is written, so concurrent calls with distinct scratch
    /// objects are fine.
    pub fn calculate_outputs_learn<'a>(
        &self,
        inputs: &[f64],
        learn_data: &'a mut LayerLearnData,
    ) -> &'a [f64] {
        learn_data.inputs.copy_from_slice(inputs);
        self.weighted_inputs_into(inputs, &mut learn_data.weighted_inputs);

        for node in 0..self.nodes_out {
            learn_data.activations[node] =
                self.activation.activate(&learn_data.weighted_inputs, node);
        }

        &learn_data.activations
    }

    fn weighted_inputs_into(&self, inputs: &[f64], weighted_inputs: &mut [f64]) {
        assert_eq!(
            inputs.len(),
            self.nodes_in,
            "layer expects {} inputs, got {}",
            self.nodes_in,
            inputs.len()
        );
        for (node_out, weighted_input) in weighted_inputs.iter_mut().enumerate() {
            let row = &self.weights[node_out * self.nodes_in..(node_out + 1) * self.nodes_in];
            *weighted_input = self.biases[node_out]
                + row.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>();
        }
    }

    // -----------------------------------------------------------------------
    // Backward pass
    // -----------------------------------------------------------------------

    /// Starts backpropagation: ∂cost/∂weighted_input for every output node.
    pub fn calculate_output_layer_node_values(
        &self,
        learn_data: &mut LayerLearnData,
        expected_outputs: &[f64],
        cost: CostType,
    ) {
        for node in 0..self.nodes_out {
            let cost_derivative =
                cost.derivative(learn_data.activations[node], expected_outputs[node]);
            let activation_derivative =
                self.activation.derivative(&learn_data.weighted_inputs, node);
            learn_data.node_values[node] = cost_derivative * activation_derivative;
        }
    }

    /// Pulls the next layer's node values back through the transpose of its
    /// weight matrix.
    pub fn calculate_hidden_layer_node_values(
        &self,
        learn_data: &mut LayerLearnData,
        next_layer: &Layer,
        next_node_values: &[f64],
    ) {
        for node in 0..self.nodes_out {
            let mut node_value = 0.0;
            for (next_node, next_value) in next_node_values.iter().enumerate() {
                node_value += next_layer.weight(node, next_node) * next_value;
            }
            node_value *= self.activation.derivative(&learn_data.weighted_inputs, node);
            learn_data.node_values[node] = node_value;
        }
    }

    /// Adds one sample's contribution to the shared gradient accumulators.
    ///
    /// Safe to call from several threads against the same layer.
    pub fn update_gradients(&self, learn_data: &LayerLearnData) {
        let mut gradients = self.gradients.lock();

        for node_out in 0..self.nodes_out {
            let node_value = learn_data.node_values[node_out];
            let row = node_out * self.nodes_in;
            for node_in in 0..self.nodes_in {
                gradients.weights[row + node_in] += learn_data.inputs[node_in] * node_value;
            }
            gradients.biases[node_out] += node_value;
        }
    }

    /// Momentum SGD step with decoupled weight decay, then clears the
    /// accumulators.
    ///
    /// `velocity = velocity * momentum - gradient * learn_rate`
    /// `weight   = weight * (1 - regularization * learn_rate) + velocity`
    pub fn apply_gradients(&mut self, learn_rate: f64, regularization: f64, momentum: f64) {
        let weight_decay = 1.0 - regularization * learn_rate;
        let gradients = self.gradients.get_mut();

        for ((weight, velocity), gradient) in self.weights.iter_mut()
            .zip(self.weight_velocities.iter_mut())
            .zip(gradients.weights.iter_mut())
        {
            *velocity = *velocity * momentum - *gradient * learn_rate;
            *weight = *weight * weight_decay + *velocity;
            *gradient = 0.0;
        }

        for ((bias, velocity), gradient) in self.biases.iter_mut()
            .zip(self.bias_velocities.iter_mut())
            .zip(gradients.biases.iter_mut())
        {
            *velocity = *velocity * momentum - *gradient * learn_rate;
            *bias += *velocity;
            *gradient = 0.0;
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn nodes_in(&self) -> usize {
        self.nodes_in
    }

    pub fn nodes_out(&self) -> usize {
        self.nodes_out
    }

    pub fn weight(&self, node_in: usize, node_out: usize) -> f64 {
        self.weights[self.flat_weight_index(node_in, node_out)]
    }

    pub fn flat_weight_index(&self, node_in: usize, node_out: usize) -> usize {
        node_out * self.nodes_in + node_in
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn weight_velocities(&self) -> &[f64] {
        &self.weight_velocities
    }

    pub fn bias_velocities(&self) -> &[f64] {
        &self.bias_velocities
    }

    /// Snapshot of the (weight, bias) gradient accumulators.
    pub fn cost_gradients(&self) -> (Vec<f64>, Vec<f64>) {
        let gradients = self.gradients.lock();
        (gradients.weights.clone(), gradients.biases.clone())
    }

    pub fn set_activation(&mut self, activation: ActivationType) {
        self.activation = activation;
    }

    /// Overwrites weights and biases in place. Lengths must match exactly.
    pub fn load_parameters(&mut self, weights: &[f64], biases: &[f64]) -> Result<()> {
        if weights.len() != self.weights.len() {
            return Err(NnError::shape("layer weights", self.weights.len(), weights.len()));
        }
        if biases.len() != self.biases.len() {
            return Err(NnError::shape("layer biases", self.biases.len(), biases.len()));
        }
        self.weights.copy_from_slice(weights);
        self.biases.copy_from_slice(biases);
        Ok(())
    }
}
