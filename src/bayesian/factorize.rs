use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use crate::{
    bayesian::evidence::{resolve, Evidence},
    bayesian::network::BayesianNetwork,
    core::{FactorGraph, FactorGraphBuilder, Tensor},
    error::{BNError, BNResult},
};

impl BayesianNetwork {
    /// Materializes the conditional probability table of a node as a tensor
    ///
    /// # Notes
    ///
    /// Axes follow the node's parents in declared order followed by the node
    /// itself; entries are enumerated in row-major order. A missing table entry
    /// results in `BNError::UnknownProbabilityKey`
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::bayesian::{BayesianNetwork, MapProbabilityTable, Node};
    ///
    /// let light: MapProbabilityTable = [
    ///     (vec!["green"], 0.4),
    ///     (vec!["yellow"], 0.25),
    ///     (vec!["red"], 0.35),
    /// ].into_iter().collect();
    /// let network = BayesianNetwork::new(vec![
    ///     Node::new("TrafficLight", ["green", "yellow", "red"], light, Vec::<String>::new()),
    /// ]).unwrap();
    /// let tensor = network.node_tensor(0).unwrap();
    /// assert_eq!(tensor.shape(), &[3]);
    /// assert_eq!(tensor[[1]], 0.25);
    /// ```
    pub fn node_tensor(&self, index: usize) -> BNResult<Tensor> {
        let node = self
            .nodes()
            .get(index)
            .ok_or(BNError::OutOfRangeVariable(self.len(), index))?;
        let domains: Vec<&[String]> = self
            .parent_indices(index)
            .iter()
            .map(|parent| self.nodes()[*parent].domain())
            .chain(std::iter::once(node.domain()))
            .collect();
        let shape: Vec<usize> = domains.iter().map(|d| d.len()).collect();
        let size = shape.iter().product();
        let mut values = Vec::with_capacity(size);
        let mut counters = vec![0usize; domains.len()];
        let mut key: Vec<String> = domains.iter().map(|d| d[0].clone()).collect();
        'enumeration: loop {
            values.push(node.probability(&key)?);
            for position in (0..domains.len()).rev() {
                counters[position] += 1;
                if counters[position] < domains[position].len() {
                    key[position] = domains[position][counters[position]].clone();
                    continue 'enumeration;
                }
                counters[position] = 0;
                key[position] = domains[position][0].clone();
            }
            break;
        }
        ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| BNError::ShapeMismatch {
            operation: "node_tensor",
            expected: size,
            actual: shape.iter().product(),
        })
    }

    /// Builds the factor graph of a network: one variable and one factor per node
    ///
    /// # Notes
    ///
    /// The edges of a node's factor follow its parents in declared order followed
    /// by the node's own variable, matching the axes of `node_tensor`
    pub fn factor_graph(&self) -> BNResult<FactorGraph> {
        let mut fgb = FactorGraphBuilder::with_capacity(self.len(), self.len());
        for (index, node) in self.nodes().iter().enumerate() {
            let variable = fgb.add_variable(node.name(), node.domain().len())?;
            let mut var_indices = self
                .parent_indices(index)
                .iter()
                .map(|parent| {
                    let parent = &self.nodes()[*parent];
                    fgb.add_variable(parent.name(), parent.domain().len())
                })
                .collect::<BNResult<Vec<_>>>()?;
            var_indices.push(variable);
            fgb.add_factor(self.node_tensor(index)?, &var_indices)?;
        }
        let fg = fgb.build();
        debug!(
            variables = fg.variables().len(),
            factors = fg.factors().len(),
            edges = fg.edges().len(),
            "factor graph built"
        );
        Ok(fg)
    }

    /// Builds a factor graph conditioned on evidence
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::bayesian::{BayesianNetwork, Evidence, MapProbabilityTable, Node};
    ///
    /// let light: MapProbabilityTable = [
    ///     (vec!["green"], 0.4),
    ///     (vec!["yellow"], 0.25),
    ///     (vec!["red"], 0.35),
    /// ].into_iter().collect();
    /// let network = BayesianNetwork::new(vec![
    ///     Node::new("TrafficLight", ["green", "yellow", "red"], light, Vec::<String>::new()),
    /// ]).unwrap();
    /// let fg = network
    ///     .conditioned_factor_graph(&[Evidence::new("TrafficLight", "red")])
    ///     .unwrap();
    /// assert_eq!(fg.factors()[0].tensor().as_slice().unwrap(), &[0.35]);
    /// ```
    pub fn conditioned_factor_graph(&self, evidences: &[Evidence]) -> BNResult<FactorGraph> {
        let resolved = resolve(self, evidences)?;
        let mut fg = self.factor_graph()?;
        let observations = resolved
            .iter()
            .map(|(node_index, value_index)| {
                fg.variable_index(self.nodes()[*node_index].name())
                    .map(|var_index| (var_index, *value_index))
            })
            .collect::<BNResult<Vec<_>>>()?;
        fg.apply_evidence(&observations)?;
        Ok(fg)
    }
}
