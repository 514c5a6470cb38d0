pub mod data;
pub mod error;
pub mod math;
pub mod layers;
pub mod loss;
pub mod network;
pub mod train;

// Convenience re-exports
pub use data::{collect_pairs, PairSource};
pub use error::{EngineError, Result};
pub use math::matrix::Matrix;
pub use layers::layer::Layer;
pub use layers::{ActivationLayer, DenseLayer};
pub use loss::loss_type::LossType;
pub use loss::mse::MseLoss;
pub use network::network::Network;
pub use train::{train_loop, EpochStats, TrainConfig};
