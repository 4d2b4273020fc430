mod edge;
mod factor_graph;
mod factor_graph_builder;
mod factor_node;
mod message;
mod schedulers;
pub mod tensor;
mod variable_node;

pub use edge::Edge;
pub use factor_graph::{FactorGraph, MessagePassingInfo};
pub use factor_graph_builder::FactorGraphBuilder;
pub use factor_node::FactorNode;
pub use message::Message;
pub use schedulers::LoopyConfig;
pub use tensor::Tensor;
pub use variable_node::VariableNode;
