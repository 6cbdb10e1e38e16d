/// One labelled training example.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub inputs: Vec<f64>,
    /// One-hot encoding of `label`.
    pub expected_outputs: Vec<f64>,
    pub label: usize,
}

impl DataPoint {
    /// Panics if `label >= number_of_labels`.
    pub fn new(inputs: Vec<f64>, label: usize, number_of_labels: usize) -> DataPoint {
        DataPoint {
            inputs,
            expected_outputs: one_hot(label, number_of_labels),
            label,
        }
    }
}

fn one_hot(index: usize, len: usize) -> Vec<f64> {
    let mut encoded = vec![0.0; len];
    encoded[index] = 1.0;
    encoded
}
