mod brute_force;
mod declaration;
mod evidence;
mod factorize;
mod inference;
mod network;

pub use crate::error::{BNError, BNResult};
pub use declaration::{Declaration, NetworkDefinition, ProbabilityRow};
pub use evidence::Evidence;
pub use inference::{InferenceConfig, InferenceMethod, InferenceReport};
pub use network::{BayesianNetwork, MapProbabilityTable, Node, ProbabilityTable};
