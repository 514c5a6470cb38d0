pub mod activation;
pub mod dense;
pub mod layer;

pub use activation::ActivationLayer;
pub use dense::DenseLayer;
pub use layer::Layer;
