use std::{collections::HashMap, fmt::Display};

use ndarray::Axis;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    core::edge::Edge,
    core::factor_node::FactorNode,
    core::tensor::{contract, contract_all, elementwise_multiply, initial, slice_axis, Tensor},
    core::variable_node::VariableNode,
    error::{BNError, BNResult},
};

// ------------------------------------------------------------------------------------------

/// Information returned after a loopy message passing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePassingInfo {
    /// Number of iterations past
    pub iterations_number: usize,

    /// Whether the stopping criterion has been met before exhausting iterations
    pub converged: bool,

    /// Final discrepancy between last and previous iteration's messages maximized across edges
    pub last_discrepancy: f64,

    /// Dynamics of discrepancy
    pub discrepancy_dynamics: Vec<f64>,
}

impl Display for MessagePassingInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.converged {
            write!(
                f,
                "Messaged passing has converged after {} iterations, last iteration discrepancy: {}",
                self.iterations_number, self.last_discrepancy,
            )
        } else {
            write!(
                f,
                "Messaged passing has not converged after {} iterations, last iteration discrepancy: {}",
                self.iterations_number, self.last_discrepancy,
            )
        }
    }
}

// ------------------------------------------------------------------------------------------

/// A factor graph
///
/// Variables, factors and edges are stored in separate arenas and refer
/// to each other by indices.
#[derive(Debug, Clone)]
pub struct FactorGraph {
    pub(crate) factors: Vec<FactorNode>,
    pub(crate) variables: Vec<VariableNode>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) names: HashMap<String, usize>,
}

impl FactorGraph {
    /// Returns degree (number of adjoint factors) of each variable
    #[inline]
    pub fn get_variable_degrees(&self) -> Vec<usize> {
        self.variables.iter().map(|x| x.degree()).collect()
    }

    /// Returns degree (number of adjoint variables) of each factor
    /// in order they were added to a factor graph
    #[inline]
    pub fn get_factor_degrees(&self) -> Vec<usize> {
        self.factors.iter().map(|x| x.degree()).collect()
    }

    /// Returns variable nodes
    #[inline]
    pub fn variables(&self) -> &[VariableNode] {
        &self.variables
    }

    /// Returns factor nodes
    #[inline]
    pub fn factors(&self) -> &[FactorNode] {
        &self.factors
    }

    /// Returns edges
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the index of a variable with a given name
    #[inline]
    pub fn variable_index(&self, name: &str) -> BNResult<usize> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| BNError::UnknownVariable(name.to_owned()))
    }

    /// Conditions a factor graph on observed values
    ///
    /// # Arguments
    ///
    /// * `evidence` - Pairs of a variable index and an index of the observed value
    ///
    /// # Notes
    ///
    /// Each observed variable's domain size becomes 1 and every factor's tensor
    /// is sliced along the axes of observed variables. Observing a variable twice
    /// with the same value is a no-op, with different values is an error.
    /// On error the graph is left untouched. Previously computed messages are dropped.
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
    /// let mut fg = fgb.build();
    /// fg.apply_evidence(&[(risk, 0)]).unwrap();
    /// assert_eq!(fg.factors()[0].tensor().shape(), &[3, 1]);
    /// assert_eq!(fg.variables()[risk].domain_size(), 1);
    /// ```
    pub fn apply_evidence(&mut self, evidence: &[(usize, usize)]) -> BNResult<()> {
        let mut observations: Vec<(usize, usize)> = Vec::with_capacity(evidence.len());
        for (var_index, value_index) in evidence {
            let variable = self
                .variables
                .get(*var_index)
                .ok_or(BNError::OutOfRangeVariable(self.variables.len(), *var_index))?;
            let observed = variable.evidence_index.or_else(|| {
                observations
                    .iter()
                    .find(|(index, _)| index == var_index)
                    .map(|(_, value)| *value)
            });
            match observed {
                Some(observed) if observed == *value_index => continue,
                Some(observed) => {
                    return Err(BNError::ConflictingEvidence {
                        variable: variable.name.clone(),
                        first: observed.to_string(),
                        second: value_index.to_string(),
                    })
                }
                None if *value_index >= variable.domain_size => {
                    return Err(BNError::InvalidEvidenceValue {
                        variable: variable.name.clone(),
                        value: value_index.to_string(),
                    })
                }
                None => observations.push((*var_index, *value_index)),
            }
        }
        // nothing is modified before every observation is validated
        for (var_index, value_index) in &observations {
            let variable = &mut self.variables[*var_index];
            variable.evidence_index = Some(*value_index);
            variable.domain_size = 1;
        }
        for factor in &mut self.factors {
            let mut tensor = factor.tensor.clone();
            for (axis, edge_index) in factor.edges.iter().enumerate().rev() {
                let variable = &self.variables[self.edges[*edge_index].variable];
                if let Some(value_index) = variable.evidence_index {
                    if tensor.len_of(Axis(axis)) > 1 {
                        tensor = slice_axis(&tensor, axis, value_index)?;
                    }
                }
            }
            factor.tensor = tensor;
        }
        self.reset_messages();
        debug!(
            observed = evidence.len(),
            factors = self.factors.len(),
            "evidence applied"
        );
        Ok(())
    }

    /// Drops all messages
    #[inline]
    pub fn reset_messages(&mut self) {
        for edge in &mut self.edges {
            edge.clear_messages();
        }
    }

    /// Checks whether a factor graph has no cycles
    ///
    /// # Notes
    ///
    /// A graph is a forest iff the number of its edges equals the number
    /// of nodes minus the number of connected components
    pub fn is_tree(&self) -> bool {
        let variables_number = self.variables.len();
        let nodes_number = variables_number + self.factors.len();
        let mut visited = vec![false; nodes_number];
        let mut components = 0;
        let mut stack = Vec::new();
        for start in 0..nodes_number {
            if visited[start] {
                continue;
            }
            components += 1;
            visited[start] = true;
            stack.push(start);
            while let Some(node) = stack.pop() {
                let (edges, is_variable) = if node < variables_number {
                    (&self.variables[node].edges, true)
                } else {
                    (&self.factors[node - variables_number].edges, false)
                };
                for edge_index in edges {
                    let edge = &self.edges[*edge_index];
                    let neighbour = if is_variable {
                        variables_number + edge.factor
                    } else {
                        edge.variable
                    };
                    if !visited[neighbour] {
                        visited[neighbour] = true;
                        stack.push(neighbour);
                    }
                }
            }
        }
        self.edges.len() + components == nodes_number
    }

    /// Computes the unnormalized probability of all observations from
    /// the messages around a variable
    ///
    /// # Arguments
    ///
    /// * `var_index` - Index of a variable
    ///
    /// # Notes
    ///
    /// The factor to variable message and the variable to factor message of
    /// the variable's first edge are contracted into a scalar. After exact message
    /// passing this is the sum of the product of all factors over every
    /// variable that is not observed.
    pub fn variable_marginal(&self, var_index: usize) -> BNResult<f64> {
        let variable = self
            .variables
            .get(var_index)
            .ok_or(BNError::OutOfRangeVariable(self.variables.len(), var_index))?;
        let missing = || BNError::MissingMessage(variable.name.clone());
        let edge = &self.edges[*variable.edges.first().ok_or_else(missing)?];
        let message_in = edge.to_variable.as_ref().ok_or_else(missing)?;
        let message_out = edge.to_factor.as_ref().ok_or_else(missing)?;
        Ok(contract(message_in, 0, message_out)?.sum())
    }

    /// Same as `variable_marginal` for a variable given by name
    #[inline]
    pub fn marginal(&self, name: &str) -> BNResult<f64> {
        self.variable_marginal(self.variable_index(name)?)
    }

    /// Computes the Bethe approximation of the sum of the product of all factors
    ///
    /// # Notes
    ///
    /// Z = prod_f Z_f * prod_v Z_v / prod_e Z_e, where Z_f contracts a factor
    /// with its incoming messages, Z_v sums the product of a variable's incoming
    /// messages and Z_e contracts both messages of an edge. The value does not
    /// depend on messages scale and is exact on trees at the fixed point.
    pub fn bethe_estimate(&self) -> BNResult<f64> {
        let mut log_z = 0f64;
        for factor in &self.factors {
            let incoming = factor
                .edges
                .iter()
                .map(|e| self.edge_message(*e, |edge| edge.to_factor.as_ref()))
                .collect::<BNResult<Vec<_>>>()?;
            let z = contract_all(&factor.tensor, &incoming)?;
            if z <= 0f64 {
                return Ok(0f64);
            }
            log_z += z.ln();
        }
        for variable in &self.variables {
            let mut product = initial(variable.domain_size);
            for edge_index in &variable.edges {
                let message = self.edge_message(*edge_index, |edge| edge.to_variable.as_ref())?;
                product = elementwise_multiply(&product, message)?;
            }
            let z = product.sum();
            if z <= 0f64 {
                return Ok(0f64);
            }
            log_z += z.ln();
        }
        for edge_index in 0..self.edges.len() {
            let to_factor = self.edge_message(edge_index, |edge| edge.to_factor.as_ref())?;
            let to_variable = self.edge_message(edge_index, |edge| edge.to_variable.as_ref())?;
            let z = contract(to_variable, 0, to_factor)?.sum();
            if z <= 0f64 {
                return Ok(0f64);
            }
            log_z -= z.ln();
        }
        Ok(log_z.exp())
    }

    #[inline(always)]
    fn edge_message(
        &self,
        edge_index: usize,
        slot: impl Fn(&Edge) -> Option<&Tensor>,
    ) -> BNResult<&Tensor> {
        let edge = &self.edges[edge_index];
        slot(edge).ok_or_else(|| BNError::MissingMessage(self.variables[edge.variable].name.clone()))
    }
}
