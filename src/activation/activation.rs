use serde::{Serialize, Deserialize};

/// Activation applied to a layer's weighted inputs.
///
/// Every variant reads the whole weighted-input vector so that `Softmax`, whose
/// normalisation is cross-element, fits the same call shape as the element-wise
/// functions. The variant name is the stable tag written to saved networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivationType {
    #[default]
    Sigmoid,
    TanH,
    ReLU,
    SiLU,
    Softmax,
}

impl ActivationType {
    /// Activation of node `index` given all of the layer's weighted inputs.
    pub fn activate(&self, weighted_inputs: &[f64], index: usize) -> f64 {
        let x = weighted_inputs[index];
        match self {
            ActivationType::Sigmoid => sigmoid(x),
            ActivationType::TanH => {
                let e2 = (2.0 * x).exp();
                (e2 - 1.0) / (e2 + 1.0)
            }
            ActivationType::ReLU => x.max(0.0),
            ActivationType::SiLU => x / (1.0 + (-x).exp()),
            ActivationType::Softmax => {
                let exp_sum: f64 = weighted_inputs.iter().map(|v| v.exp()).sum();
                x.exp() / exp_sum
            }
        }
    }

    /// Derivative of the activation of node `index` with respect to its own
    /// weighted input.
    ///
    /// For `Softmax` this is the diagonal term of the Jacobian only.
    pub fn derivative(&self, weighted_inputs: &[f64], index: usize) -> f64 {
        let x = weighted_inputs[index];
        match self {
            ActivationType::Sigmoid => {
                let a = sigmoid(x);
                a * (1.0 - a)
            }
            ActivationType::TanH => {
                let e2 = (2.0 * x).exp();
                let t = (e2 - 1.0) / (e2 + 1.0);
                1.0 - t * t
            }
            ActivationType::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationType::SiLU => {
                let s = sigmoid(x);
                x * s * (1.0 - s) + s
            }
            ActivationType::Softmax => {
                let exp_sum: f64 = weighted_inputs.iter().map(|v| v.exp()).sum();
                let ex = x.exp();
                (ex * exp_sum - ex * ex) / (exp_sum * exp_sum)
            }
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
