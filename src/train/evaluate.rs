use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::data::DataPoint;
use crate::network::Network;

/// Cost and accuracy of a network over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mean_cost: f64,
    /// Fraction of samples whose predicted class equals their label.
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
}

/// Runs inference over `data` in parallel. An empty dataset scores zero.
pub fn evaluate(network: &Network, data: &[DataPoint]) -> Evaluation {
    let total = data.len();
    if total == 0 {
        return Evaluation { mean_cost: 0.0, accuracy: 0.0, correct: 0, total: 0 };
    }

    let cost = network.cost();
    let (total_cost, correct) = data
        .par_iter()
        .map(|data_point| {
            let (predicted, outputs) = network.classify(&data_point.inputs);
            let hit = usize::from(predicted == data_point.label);
            (cost.cost(&outputs, &data_point.expected_outputs), hit)
        })
        .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    Evaluation {
        mean_cost: total_cost / total as f64,
        accuracy: correct as f64 / total as f64,
        correct,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationType;

    #[test]
    fn counts_correct_predictions() {
        // Identity-like single layer: output i follows input i.
        let mut network = Network::new(&[2, 2]);
        network.set_activation_function(ActivationType::ReLU);
        network.layers_mut()[0].load_parameters(&[1.0, 0.0, 0.0, 1.0], &[0.0, 0.0]).unwrap();

        let data = vec![
            DataPoint::new(vec![1.0, 0.0], 0, 2),
            DataPoint::new(vec![0.0, 1.0], 1, 2),
            DataPoint::new(vec![0.0, 1.0], 0, 2),
        ];
        let evaluation = evaluate(&network, &data);
        assert_eq!(evaluation.correct, 2);
        assert_eq!(evaluation.total, 3);
        assert!((evaluation.accuracy - 2.0 / 3.0).abs() < 1e-12);
        // Only the mislabelled sample costs anything: 0.5 * (1 + 1) / 3.
        assert!((evaluation.mean_cost - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_dataset_scores_zero() {
        let network = Network::new(&[2, 2]);
        assert_eq!(evaluate(&network, &[]).total, 0);
    }
}
