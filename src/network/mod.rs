pub mod network;
pub mod store;

pub use network::Network;
