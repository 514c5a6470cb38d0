use crate::error::{EngineError, Result};
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Selects which loss function the network trains with.
///
/// Saved models name the loss by `tag`; an unknown tag fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossType {
    Mse,
}

impl LossType {
    pub fn loss(&self, target: &Matrix, predicted: &Matrix) -> Result<f64> {
        match self {
            LossType::Mse => MseLoss::loss(target, predicted),
        }
    }

    pub fn derivative(&self, target: &Matrix, predicted: &Matrix) -> Result<Matrix> {
        match self {
            LossType::Mse => MseLoss::derivative(target, predicted),
        }
    }

    /// Tag written into saved models.
    pub fn tag(&self) -> &'static str {
        match self {
            LossType::Mse => "MSE",
        }
    }

    /// Parses a tag read back from a saved model.
    pub fn from_tag(tag: &str) -> Result<LossType> {
        match tag {
            "MSE" => Ok(LossType::Mse),
            other => Err(EngineError::UnsupportedModelFormat(format!(
                "unknown loss tag {:?}",
                other
            ))),
        }
    }
}
