/// A module containing general logic of factor graphs and sum-product message passing over dense tensors
pub mod core;
/// A module containing discrete Bayesian networks and inference on them via factor graphs
pub mod bayesian;

mod error;

pub use error::{BNError, BNResult};

#[cfg(test)]
mod tests;
