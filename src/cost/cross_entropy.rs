/// Cross-entropy over independent per-class probabilities.
pub struct CrossEntropyCost;

impl CrossEntropyCost {
    /// Scalar cost:
    ///   -ln(p)      where expected == 1
    ///   -ln(1 - p)  elsewhere
    ///
    /// Terms that evaluate to NaN contribute nothing to the sum.
    pub fn cost(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(&p, &e)| {
                let v = if e == 1.0 { -p.ln() } else { -(1.0 - p).ln() };
                if v.is_nan() { 0.0 } else { v }
            })
            .sum()
    }

    /// Per-output gradient: (expected - p) / (p · (p - 1)).
    ///
    /// Zero at p == 0 and p == 1, where the expression is undefined.
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        let p = predicted;
        if p == 0.0 || p == 1.0 {
            return 0.0;
        }
        (expected - p) / (p * (p - 1.0))
    }
}
