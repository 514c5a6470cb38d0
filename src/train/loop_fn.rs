use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` for `config.epochs` epochs and returns the mean training
/// loss of the **last completed epoch**.
///
/// Samples are visited one at a time, in the order given; parameters update
/// after every sample.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped (natural disconnect), **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Panics
/// Panics if `inputs` is empty.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Matrix],
    targets: &[Matrix],
    config: &TrainConfig,
) -> Result<f64> {
    assert!(!inputs.is_empty(), "inputs must not be empty");

    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        // Check stop flag at the top of each epoch.
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let train_loss = network.train_epoch(inputs, targets, config.learning_rate)?;
        last_train_loss = train_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        tracing::debug!("Epoch {}/{}: loss = {:.6}", epoch, config.epochs, train_loss);

        // ── Emit progress ─────────────────────────────────────────────────
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_train_loss)
}
