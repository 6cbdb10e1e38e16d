pub struct MseCost;

impl MseCost {
    /// Scalar cost: sum(0.5 · (predicted - expected)²)
    pub fn cost(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| {
                let error = p - e;
                0.5 * error * error
            })
            .sum()
    }

    /// Per-output gradient: predicted - expected
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }
}
