use rand::Rng;

use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;

/// Fully connected affine layer: output = input * weights + biases.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    /// input_size x output_size weight matrix.
    pub weights: Matrix,
    /// 1 x output_size bias row.
    pub biases: Matrix,
    /// Input row cached by the latest successful forward pass.
    pub last_input: Matrix,
}

impl DenseLayer {
    /// Creates a layer with weights and biases drawn from N(0, 1).
    pub fn new<R: Rng>(input_size: usize, output_size: usize, rng: &mut R) -> DenseLayer {
        DenseLayer {
            weights: Matrix::standard_normal(input_size, output_size, rng),
            biases: Matrix::standard_normal(1, output_size, rng),
            last_input: Matrix::zeros(1, input_size),
        }
    }

    /// Restores a layer from known parameters, e.g. ones read back from a
    /// saved model.
    pub fn with_parameters(weights: Matrix, biases: Matrix) -> DenseLayer {
        let input_size = weights.rows;
        DenseLayer {
            weights,
            biases,
            last_input: Matrix::zeros(1, input_size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn output_size(&self) -> usize {
        self.weights.cols
    }

    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        if input.rows != 1 || input.cols != self.weights.rows {
            return Err(EngineError::ShapeMismatch(format!(
                "dense layer expects a 1x{} input row, got {}x{}",
                self.weights.rows, input.rows, input.cols
            )));
        }
        self.last_input = input.clone();
        Ok(input.clone() * self.weights.clone() + self.biases.clone())
    }

    /// Propagates `output_gradient` back through the layer and applies the
    /// parameter update in the same step.
    ///
    /// The returned input gradient is computed from the weights as they were
    /// before the update.
    pub fn backward(&mut self, output_gradient: &Matrix, learning_rate: f64) -> Matrix {
        let weights_gradient = self.last_input.transpose() * output_gradient.clone();
        let input_gradient = output_gradient.clone() * self.weights.transpose();

        self.weights = self.weights.clone() - weights_gradient.scale(learning_rate);
        self.biases = self.biases.clone() - output_gradient.scale(learning_rate);

        input_gradient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_by_three() -> DenseLayer {
        DenseLayer::with_parameters(
            Matrix::from_data(vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]),
            Matrix::from_row(vec![0.1, 0.2, 0.3]),
        )
    }

    #[test]
    fn forward_computes_affine_map() {
        let mut layer = two_by_three();
        let output = layer.forward(&Matrix::from_row(vec![1.0, 2.0])).unwrap();
        assert!(output.approx_eq(&Matrix::from_row(vec![1.0, 1.4, 1.8]), 1e-14));
        assert_eq!(layer.last_input.data, vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn forward_rejects_wrong_width() {
        let mut layer = two_by_three();
        let err = layer
            .forward(&Matrix::from_row(vec![1.0, 2.0, 3.0]))
            .unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn forward_rejects_multiple_rows() {
        let mut layer = two_by_three();
        let err = layer
            .forward(&Matrix::zeros(2, 2))
            .unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn failed_forward_leaves_cached_input_untouched() {
        let mut layer = two_by_three();
        layer.forward(&Matrix::from_row(vec![1.0, 2.0])).unwrap();
        let _ = layer.forward(&Matrix::from_row(vec![9.0])).unwrap_err();
        assert_eq!(layer.last_input.data, vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn backward_updates_parameters_and_returns_input_gradient() {
        let mut layer = two_by_three();
        layer.forward(&Matrix::from_row(vec![1.0, 2.0])).unwrap();

        let input_gradient = layer.backward(&Matrix::from_row(vec![0.2, 0.4, 0.6]), 0.1);

        assert!(layer.weights.approx_eq(
            &Matrix::from_data(vec![vec![0.08, 0.16, 0.24], vec![0.36, 0.42, 0.48]]),
            1e-14
        ));
        assert!(layer
            .biases
            .approx_eq(&Matrix::from_row(vec![0.08, 0.16, 0.24]), 1e-14));
        // Computed against the pre-update weights.
        assert!(input_gradient.approx_eq(&Matrix::from_row(vec![0.28, 0.64]), 1e-14));
    }

    #[test]
    fn new_layer_shapes_follow_the_constructor() {
        let mut rng = StdRng::seed_from_u64(3);
        let layer = DenseLayer::new(4, 2, &mut rng);
        assert_eq!(layer.input_size(), 4);
        assert_eq!(layer.output_size(), 2);
        assert_eq!((layer.weights.rows, layer.weights.cols), (4, 2));
        assert_eq!((layer.biases.rows, layer.biases.cols), (1, 2));
        assert_eq!((layer.last_input.rows, layer.last_input.cols), (1, 4));
    }
}
