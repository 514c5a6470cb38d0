use std::sync::mpsc;
use std::thread;

use magnetite_nn::{collect_pairs, train_loop, Layer, LossType, Matrix, Network, TrainConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// Symbol encoding for the distracted sequence recall task.
const TARGET_SET: [f64; 2] = [0.1, 0.2];
const DISTRACTOR_SET: [f64; 2] = [0.3, 0.4];
const PROMPT_SET: [f64; 2] = [0.5, 0.6];

/// Builds one sample: two target symbols and six distractors in shuffled
/// order, then the two prompt symbols. The expected output is zero
/// everywhere except the last two positions, which repeat the target symbols
/// in the order they appeared.
fn sequence_pair<R: Rng>(rng: &mut R) -> (Matrix, Matrix) {
    let mut sequence: Vec<f64> = Vec::with_capacity(10);
    for _ in 0..2 {
        sequence.push(TARGET_SET[rng.gen_range(0..TARGET_SET.len())]);
    }
    for _ in 0..6 {
        sequence.push(DISTRACTOR_SET[rng.gen_range(0..DISTRACTOR_SET.len())]);
    }
    sequence.shuffle(rng);
    sequence.extend_from_slice(&PROMPT_SET);

    let recalled: Vec<f64> = sequence
        .iter()
        .copied()
        .filter(|value| TARGET_SET.contains(value))
        .collect();
    let mut output = vec![0.0; sequence.len()];
    output[8] = recalled[0];
    output[9] = recalled[1];

    (Matrix::from_row(sequence), Matrix::from_row(output))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn main() -> magnetite_nn::Result<()> {
    tracing_subscriber::fmt::init();

    let mut data_rng = StdRng::seed_from_u64(29);
    let mut source = || sequence_pair(&mut data_rng);
    let (inputs, targets) = collect_pairs(&mut source, 500);

    let mut net_rng = StdRng::seed_from_u64(30);
    let mut network = Network::new(
        vec![
            Layer::dense(10, 30, &mut net_rng),
            Layer::activation(30),
            Layer::dense(30, 30, &mut net_rng),
            Layer::activation(30),
            Layer::dense(30, 10, &mut net_rng),
            Layer::activation(10),
        ],
        LossType::Mse,
    );

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(1000, 0.1);
    config.progress_tx = Some(tx);

    let trainer = thread::spawn(move || {
        train_loop(&mut network, &inputs, &targets, &config).map(|loss| (network, loss))
    });

    for stats in rx {
        if stats.epoch % 100 == 0 || stats.epoch == stats.total_epochs {
            println!(
                "epoch {:>4}/{}  loss {:.6}  ({} ms)",
                stats.epoch, stats.total_epochs, stats.train_loss, stats.elapsed_ms
            );
        }
    }

    let (mut network, final_loss) = trainer.join().expect("training thread panicked")?;
    println!("Final loss: {final_loss:.6}");

    // Recall quality on sequences the network has never seen.
    for _ in 0..15 {
        let (input, _) = sequence_pair(&mut data_rng);
        let predicted = network.predict(&input)?;
        let rounded: Vec<f64> = predicted.data[0].iter().map(|&v| round1(v)).collect();
        println!("{:?} -> {:?}", input.data[0], rounded);
    }

    Ok(())
}
