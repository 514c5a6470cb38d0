use std::path::Path;

use magnetite_nn::{Layer, LossType, Matrix, Network};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MODEL_PATH: &str = "xor_trained.json";

fn main() -> magnetite_nn::Result<()> {
    tracing_subscriber::fmt::init();

    let inputs: Vec<Matrix> = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
        .iter()
        .map(|pair| Matrix::from_row(pair.to_vec()))
        .collect();
    let targets: Vec<Matrix> = [0.0, 1.0, 1.0, 0.0]
        .iter()
        .map(|&value| Matrix::from_row(vec![value]))
        .collect();

    let mut network = if Path::new(MODEL_PATH).exists() {
        println!("Loading trained model from {MODEL_PATH}");
        Network::load(MODEL_PATH)?
    } else {
        let mut rng = StdRng::seed_from_u64(71);
        let mut network = Network::new(
            vec![
                Layer::dense(2, 3, &mut rng),
                Layer::activation(3),
                Layer::dense(3, 1, &mut rng),
                Layer::activation(1),
            ],
            LossType::Mse,
        );

        let losses = network.train(&inputs, &targets, 5000, 0.1)?;
        println!("Training finished, final loss = {:.6}", losses[losses.len() - 1]);

        network.save(MODEL_PATH)?;
        println!("Saved model to {MODEL_PATH}");
        network
    };

    for input in &inputs {
        let output = network.predict(input)?;
        println!("Input: {:?} -> Output: {:.4}", input.data[0], output.data[0][0]);
    }

    let mut reloaded = Network::load(MODEL_PATH)?;
    let probe = Matrix::from_row(vec![1.0, 0.0]);
    assert_eq!(network.predict(&probe)?, reloaded.predict(&probe)?);
    println!("Reloaded model predicts identically.");

    Ok(())
}
