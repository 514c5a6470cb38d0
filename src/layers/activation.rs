use crate::error::Result;
use crate::math::matrix::Matrix;

/// Element-wise tanh activation.
#[derive(Debug, Clone, Default)]
pub struct ActivationLayer {
    /// Declared width. Informational only; it pre-sizes the cached input.
    pub size: usize,
    /// Pre-activation row cached by the latest forward pass.
    pub last_input: Matrix,
}

impl ActivationLayer {
    pub fn new(size: usize) -> ActivationLayer {
        ActivationLayer {
            size,
            last_input: Matrix::zeros(1, size),
        }
    }

    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.last_input = input.clone();
        Ok(input.map(|x| x.tanh()))
    }

    /// Scales `output_gradient` by the tanh derivative at the cached
    /// pre-activation values. The layer has no parameters to update.
    pub fn backward(&mut self, output_gradient: &Matrix) -> Matrix {
        let derivative = self.last_input.map(|x| {
            let t = x.tanh();
            1.0 - t * t
        });
        derivative.hadamard(output_gradient)
    }
}
