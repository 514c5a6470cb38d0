use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((target - predicted)²)
    pub fn loss(target: &Matrix, predicted: &Matrix) -> Result<f64> {
        Self::check_shapes(target, predicted)?;
        let size = (target.rows * target.cols) as f64;
        let diff = target.clone() - predicted.clone();
        Ok(diff.hadamard(&diff).sum() / size)
    }

    /// Gradient with respect to each prediction: 2 * (predicted - target) / size
    pub fn derivative(target: &Matrix, predicted: &Matrix) -> Result<Matrix> {
        Self::check_shapes(target, predicted)?;
        let size = (target.rows * target.cols) as f64;
        Ok((predicted.clone() - target.clone()).scale(2.0 / size))
    }

    fn check_shapes(target: &Matrix, predicted: &Matrix) -> Result<()> {
        if target.rows != predicted.rows || target.cols != predicted.cols {
            return Err(EngineError::ShapeMismatch(format!(
                "loss needs matching shapes, got {}x{} target and {}x{} prediction",
                target.rows, target.cols, predicted.rows, predicted.cols
            )));
        }
        Ok(())
    }
}
