use ferrite_digits::{ActivationType, DataPoint, Network};

fn main() {
    let mut network = Network::new(&[2, 3, 2]);
    network.set_activation_functions(ActivationType::TanH, ActivationType::Sigmoid);

    // Class 1 when exactly one input is set.
    let data = vec![
        DataPoint::new(vec![1.0, 0.0], 1, 2),
        DataPoint::new(vec![1.0, 1.0], 0, 2),
        DataPoint::new(vec![0.0, 1.0], 1, 2),
        DataPoint::new(vec![0.0, 0.0], 0, 2),
    ];

    let epochs = 5000;
    for epoch in 0..epochs {
        network.learn(&data, 0.5, 0.0, 0.9);
        if epoch % 1000 == 0 {
            let evaluation = ferrite_digits::evaluate(&network, &data);
            println!("Epoch {epoch}: cost = {:.6}", evaluation.mean_cost);
        }
    }

    for point in &data {
        let (class, outputs) = network.classify(&point.inputs);
        println!("Input: {:?} -> class {} {:.4?}", point.inputs, class, outputs);
    }
}
