use rand::Rng;

use crate::error::Result;
use crate::layers::activation::ActivationLayer;
use crate::layers::dense::DenseLayer;
use crate::math::matrix::Matrix;

/// The closed set of layer kinds a network can contain.
#[derive(Debug, Clone)]
pub enum Layer {
    Dense(DenseLayer),
    Activation(ActivationLayer),
}

impl Layer {
    /// Dense layer with parameters drawn from N(0, 1).
    pub fn dense<R: Rng>(input_size: usize, output_size: usize, rng: &mut R) -> Layer {
        Layer::Dense(DenseLayer::new(input_size, output_size, rng))
    }

    /// Element-wise tanh layer over `size` values.
    pub fn activation(size: usize) -> Layer {
        Layer::Activation(ActivationLayer::new(size))
    }

    /// Runs the layer on a 1 x n input row and caches the input for the
    /// next backward pass.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        match self {
            Layer::Dense(layer) => layer.forward(input),
            Layer::Activation(layer) => layer.forward(input),
        }
    }

    /// Converts an output gradient into an input gradient, updating any
    /// trainable parameters along the way.
    pub fn backward(&mut self, output_gradient: &Matrix, learning_rate: f64) -> Matrix {
        match self {
            Layer::Dense(layer) => layer.backward(output_gradient, learning_rate),
            Layer::Activation(layer) => layer.backward(output_gradient),
        }
    }
}
