pub mod backprop;
pub mod forward;
pub mod network;
pub mod topology;
pub mod weights;

pub use backprop::backpropagate;
pub use forward::{forward, predict, ForwardPass};
pub use network::Network;
pub use topology::Topology;
pub use weights::{WeightSet, INIT_EPSILON};
