use crate::error::{EngineError, Result};
use crate::layers::Layer;
use crate::loss::LossType;
use crate::math::matrix::Matrix;

/// An ordered stack of layers trained against a single loss function.
#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub loss: LossType,
}

impl Network {
    pub fn new(layers: Vec<Layer>, loss: LossType) -> Network {
        Network { layers, loss }
    }

    /// Forward pass; each layer caches its input for a later backward pass.
    pub fn predict(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Walks the layers in reverse, turning the loss gradient into parameter
    /// updates as it goes.
    ///
    /// # Panics
    /// Gradient shapes must line up with the inputs cached by a preceding
    /// `predict`; calling this on a freshly built or loaded network panics.
    pub fn backprop(&mut self, loss_gradient: Matrix, learning_rate: f64) {
        let mut gradient = loss_gradient;
        for layer in self.layers.iter_mut().rev() {
            gradient = layer.backward(&gradient, learning_rate);
        }
    }

    /// One full pass over the samples in the order given, updating after
    /// every sample. Returns the mean per-sample loss.
    pub fn train_epoch(
        &mut self,
        inputs: &[Matrix],
        targets: &[Matrix],
        learning_rate: f64,
    ) -> Result<f64> {
        if inputs.len() != targets.len() {
            return Err(EngineError::ShapeMismatch(format!(
                "training needs one target per input, got {} inputs and {} targets",
                inputs.len(),
                targets.len()
            )));
        }

        let mut total_loss = 0.0;
        for (input, target) in inputs.iter().zip(targets.iter()) {
            let output = self.predict(input)?;
            total_loss += self.loss.loss(target, &output)?;
            let gradient = self.loss.derivative(target, &output)?;
            self.backprop(gradient, learning_rate);
        }

        Ok(total_loss / inputs.len() as f64)
    }

    /// Runs `epochs` passes over the data and returns the mean loss of each.
    pub fn train(
        &mut self,
        inputs: &[Matrix],
        targets: &[Matrix],
        epochs: usize,
        learning_rate: f64,
    ) -> Result<Vec<f64>> {
        let mut losses = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let epoch_loss = self.train_epoch(inputs, targets, learning_rate)?;
            tracing::debug!("Epoch {}/{}: loss = {:.6}", epoch + 1, epochs, epoch_loss);
            losses.push(epoch_loss);
        }
        Ok(losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ActivationLayer, DenseLayer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_dense_tanh() -> Network {
        let dense = DenseLayer::with_parameters(
            Matrix::from_data(vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]),
            Matrix::from_row(vec![0.1, 0.2, 0.3]),
        );
        Network::new(
            vec![Layer::Dense(dense), Layer::activation(3)],
            LossType::Mse,
        )
    }

    #[test]
    fn predict_chains_the_layers() {
        let mut network = fixed_dense_tanh();
        let output = network.predict(&Matrix::from_row(vec![1.0, 2.0])).unwrap();
        let expected = Matrix::from_row(vec![
            1.0_f64.tanh(),
            1.4_f64.tanh(),
            1.8_f64.tanh(),
        ]);
        assert!(output.approx_eq(&expected, 1e-12));
    }

    #[test]
    fn predict_surfaces_layer_shape_errors() {
        let mut network = fixed_dense_tanh();
        let err = network
            .predict(&Matrix::from_row(vec![1.0, 2.0, 3.0]))
            .unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn train_epoch_rejects_mismatched_sample_counts() {
        let mut network = fixed_dense_tanh();
        let inputs = vec![Matrix::from_row(vec![1.0, 2.0])];
        let targets = vec![];
        let err = network.train_epoch(&inputs, &targets, 0.1).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn train_epoch_stops_at_the_first_bad_sample() {
        let mut network = fixed_dense_tanh();
        let mut reference = network.clone();

        let inputs = vec![
            Matrix::from_row(vec![1.0, 2.0]),
            Matrix::from_row(vec![1.0, 2.0, 3.0]),
        ];
        let targets = vec![
            Matrix::from_row(vec![0.5, 0.5, 0.5]),
            Matrix::from_row(vec![0.5, 0.5, 0.5]),
        ];

        let err = network.train_epoch(&inputs, &targets, 0.1).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));

        // The valid first sample was applied; the pass ended at the second.
        reference
            .train_epoch(&inputs[..1], &targets[..1], 0.1)
            .unwrap();
        assert_eq!(
            network.predict(&inputs[0]).unwrap(),
            reference.predict(&inputs[0]).unwrap()
        );
    }

    #[test]
    #[should_panic]
    fn backprop_without_a_forward_pass_panics() {
        let mut network = Network::new(
            vec![Layer::Activation(ActivationLayer::default())],
            LossType::Mse,
        );
        network.backprop(Matrix::from_row(vec![0.1]), 0.1);
    }

    #[test]
    fn training_reduces_loss_on_a_linear_target() {
        // y = 2x is solved exactly by a single dense layer.
        let mut rng = StdRng::seed_from_u64(5);
        let mut network = Network::new(vec![Layer::dense(1, 1, &mut rng)], LossType::Mse);

        let inputs: Vec<Matrix> = [1.0, 2.0, 3.0]
            .iter()
            .map(|&x| Matrix::from_row(vec![x]))
            .collect();
        let targets: Vec<Matrix> = [2.0, 4.0, 6.0]
            .iter()
            .map(|&y| Matrix::from_row(vec![y]))
            .collect();

        let losses = network.train(&inputs, &targets, 500, 0.02).unwrap();
        assert_eq!(losses.len(), 500);
        assert!(losses[losses.len() - 1] < losses[0]);
        assert!(losses[losses.len() - 1] < 1e-3);
    }

    #[test]
    fn identical_seeds_give_identical_networks() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(42);
            Network::new(
                vec![
                    Layer::dense(2, 3, &mut rng),
                    Layer::activation(3),
                    Layer::dense(3, 1, &mut rng),
                    Layer::activation(1),
                ],
                LossType::Mse,
            )
        };

        let inputs = vec![
            Matrix::from_row(vec![0.0, 0.0]),
            Matrix::from_row(vec![1.0, 0.0]),
        ];
        let targets = vec![Matrix::from_row(vec![0.0]), Matrix::from_row(vec![1.0])];

        let mut first = build();
        let mut second = build();
        first.train(&inputs, &targets, 25, 0.1).unwrap();
        second.train(&inputs, &targets, 25, 0.1).unwrap();

        let probe = Matrix::from_row(vec![0.5, 0.5]);
        assert_eq!(
            first.predict(&probe).unwrap(),
            second.predict(&probe).unwrap()
        );
    }

    #[test]
    fn epoch_events_include_the_total_epoch_count() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

        impl Write for SharedBuffer {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = SharedBuffer(buffer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();

        let mut network = fixed_dense_tanh();
        let inputs = vec![Matrix::from_row(vec![1.0, 2.0])];
        let targets = vec![Matrix::from_row(vec![0.0, 0.0, 0.0])];
        tracing::subscriber::with_default(subscriber, || {
            network.train(&inputs, &targets, 3, 0.01).unwrap();
        });

        let log = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log.contains("Epoch 1/3"));
        assert!(log.contains("Epoch 3/3"));
    }
}
