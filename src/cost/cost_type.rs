use serde::{Serialize, Deserialize};

use crate::cost::{CrossEntropyCost, MseCost};

/// Selects the cost function a network is trained against.
///
/// - `MeanSquareError`: pair with Sigmoid/TanH outputs.
/// - `CrossEntropy`   : pair with Sigmoid or Softmax outputs for classification.
///
/// The variant name is the stable tag written to saved networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CostType {
    #[default]
    MeanSquareError,
    CrossEntropy,
}

impl CostType {
    /// Scalar cost over a full output vector.
    pub fn cost(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            CostType::MeanSquareError => MseCost::cost(predicted, expected),
            CostType::CrossEntropy => CrossEntropyCost::cost(predicted, expected),
        }
    }

    /// Partial derivative of the cost with respect to one predicted output.
    pub fn derivative(&self, predicted: f64, expected: f64) -> f64 {
        match self {
            CostType::MeanSquareError => MseCost::derivative(predicted, expected),
            CostType::CrossEntropy => CrossEntropyCost::derivative(predicted, expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_matches_cost_gradient() {
        let h = 1e-7;
        let expected = [0.0, 1.0, 0.0];
        let predicted = [0.2, 0.6, 0.35];
        for cost in [CostType::MeanSquareError, CostType::CrossEntropy] {
            for i in 0..predicted.len() {
                let mut plus = predicted;
                let mut minus = predicted;
                plus[i] += h;
                minus[i] -= h;
                let numeric =
                    (cost.cost(&plus, &expected) - cost.cost(&minus, &expected)) / (2.0 * h);
                let analytic = cost.derivative(predicted[i], expected[i]);
                assert!(
                    (numeric - analytic).abs() < 1e-5,
                    "{:?} output {}: numeric {} vs analytic {}",
                    cost, i, numeric, analytic
                );
            }
        }
    }

    #[test]
    fn perfect_prediction_costs_nothing() {
        let target = [0.0, 1.0, 0.0];
        assert_eq!(CostType::MeanSquareError.cost(&target, &target), 0.0);
        assert_eq!(CostType::CrossEntropy.cost(&target, &target), 0.0);
    }

    #[test]
    fn cross_entropy_derivative_is_zero_at_saturation() {
        assert_eq!(CostType::CrossEntropy.derivative(0.0, 1.0), 0.0);
        assert_eq!(CostType::CrossEntropy.derivative(1.0, 0.0), 0.0);
    }

    #[test]
    fn mse_cost_is_half_squared_error() {
        let cost = CostType::MeanSquareError.cost(&[1.0, 0.5], &[0.0, 0.0]);
        assert!((cost - 0.625).abs() < 1e-12);
    }
}
