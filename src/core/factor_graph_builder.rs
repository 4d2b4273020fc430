use std::collections::HashMap;

use ndarray::Axis;

use crate::{
    core::edge::Edge, core::factor_graph::FactorGraph, core::factor_node::FactorNode,
    core::tensor::Tensor, core::variable_node::VariableNode,
    error::{BNError, BNResult},
};

// public methods ---------------------------------------------------------------------------

#[derive(Debug, Default)]
/// A factor graph builder
pub struct FactorGraphBuilder {
    factors: Vec<FactorNode>,
    variables: Vec<VariableNode>,
    edges: Vec<Edge>,
    names: HashMap<String, usize>,
}

impl FactorGraphBuilder {
    /// Creates an empty factor graph builder
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::core::FactorGraphBuilder;
    ///
    /// let fgb = FactorGraphBuilder::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        FactorGraphBuilder::default()
    }

    /// Creates a factor graph builder with preallocated memory
    ///
    /// # Arguments
    ///
    /// * `variables_capacity` - A number of variables we need to preallocate memory for
    /// * `factors_capacity` - A number of factors we need to preallocate memory for
    #[inline]
    pub fn with_capacity(variables_capacity: usize, factors_capacity: usize) -> Self {
        FactorGraphBuilder {
            factors: Vec::with_capacity(factors_capacity),
            variables: Vec::with_capacity(variables_capacity),
            edges: Vec::new(),
            names: HashMap::with_capacity(variables_capacity),
        }
    }

    /// Adds a variable to a factor graph or updates the domain size of an
    /// existing variable with the same name. Returns the index of the variable.
    ///
    /// # Arguments
    ///
    /// * `name` - A name of a variable
    /// * `domain_size` - A number of values a variable takes
    ///
    /// # Notes
    ///
    /// Once a factor refers to a variable its domain size is fixed, a different
    /// size results in `BNError::ShapeMismatch`
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::core::FactorGraphBuilder;
    ///
    /// let mut fgb = FactorGraphBuilder::new();
    /// let rain = fgb.add_variable("Rain", 2).unwrap();
    /// assert_eq!(fgb.add_variable("Rain", 2), Ok(rain));
    /// ```
    #[inline]
    pub fn add_variable(&mut self, name: &str, domain_size: usize) -> BNResult<usize> {
        if let Some(index) = self.names.get(name) {
            let variable = &mut self.variables[*index];
            if variable.domain_size != domain_size && variable.degree() > 0 {
                return Err(BNError::ShapeMismatch {
                    operation: "add_variable",
                    expected: variable.domain_size,
                    actual: domain_size,
                });
            }
            variable.domain_size = domain_size;
            return Ok(*index);
        }
        let index = self.variables.len();
        self.variables
            .push(VariableNode::new_disconnected(name.to_owned(), domain_size));
        self.names.insert(name.to_owned(), index);
        Ok(index)
    }

    /// Adds a factor to a factor graph. Returns the index of the factor.
    ///
    /// # Arguments
    ///
    /// * `tensor` - A factor's tensor
    /// * `var_indices` - Indices of adjoint variables, the i-th variable
    ///     corresponds to the i-th axis of `tensor`
    ///
    /// # Notes
    ///
    /// If the rank of `tensor` does not match the number of `var_indices` or
    /// an axis length differs from the variable's domain size, the method
    /// returns `BNError::ShapeMismatch`. If an index from `var_indices` is out
    /// of range of the variables list, the method returns an error
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::core::FactorGraphBuilder;
    /// use ndarray::{ArrayD, IxDyn};
    ///
    /// let mut fgb = FactorGraphBuilder::new();
    /// let light = fgb.add_variable("TrafficLight", 3).unwrap();
    /// let risk = fgb.add_variable("Risk", 2).unwrap();
    /// let tensor = ArrayD::from_shape_vec(
    ///     IxDyn(&[3, 2]),
    ///     vec![0.1, 0.9, 0.55, 0.45, 0.95, 0.05],
    /// ).unwrap();
    /// fgb.add_factor(tensor, &[light, risk]).unwrap();
    /// let fg = fgb.build();
    /// assert_eq!(fg.get_factor_degrees(), vec![2]);
    /// ```
    pub fn add_factor(&mut self, tensor: Tensor, var_indices: &[usize]) -> BNResult<usize> {
        if tensor.ndim() != var_indices.len() {
            return Err(BNError::ShapeMismatch {
                operation: "add_factor",
                expected: var_indices.len(),
                actual: tensor.ndim(),
            });
        }
        for (axis, index) in var_indices.iter().enumerate() {
            let variable = self
                .variables
                .get(*index)
                .ok_or(BNError::OutOfRangeVariable(self.variables.len(), *index))?;
            let axis_len = tensor.len_of(Axis(axis));
            if axis_len != variable.domain_size {
                return Err(BNError::ShapeMismatch {
                    operation: "add_factor",
                    expected: variable.domain_size,
                    actual: axis_len,
                });
            }
        }
        let factor_index = self.factors.len();
        let mut factor_node = FactorNode::new_disconnected(tensor);
        for (axis, index) in var_indices.iter().enumerate() {
            let edge_index = self.edges.len();
            self.edges.push(Edge::new(factor_index, *index, axis));
            factor_node.edges.push(edge_index);
            self.variables[*index].edges.push(edge_index);
        }
        self.factors.push(factor_node);
        Ok(factor_index)
    }

    /// Returns the index of a variable with a given name
    #[inline]
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Returns a factor graph
    #[inline]
    pub fn build(self) -> FactorGraph {
        FactorGraph {
            factors: self.factors,
            variables: self.variables,
            edges: self.edges,
            names: self.names,
        }
    }
}
