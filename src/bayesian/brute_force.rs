use tracing::debug;

use crate::{
    bayesian::evidence::{resolve, Evidence},
    bayesian::network::BayesianNetwork,
    error::BNResult,
};

impl BayesianNetwork {
    /// Computes the unnormalized probability of evidence by enumerating
    /// every assignment of the network's variables
    ///
    /// # Notes
    ///
    /// Observed variables are fixed to their values, the product of all
    /// conditional probabilities is summed over the remaining assignments.
    /// The cost is exponential in the number of unobserved variables; the
    /// method serves as a ground truth for message passing.
    /// Empty evidence results in 1 without enumeration.
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
    /// let risk: MapProbabilityTable = [
    ///     (vec!["green", "high"], 0.1),
    ///     (vec!["green", "low"], 0.9),
    ///     (vec!["yellow", "high"], 0.55),
    ///     (vec!["yellow", "low"], 0.45),
    ///     (vec!["red", "high"], 0.95),
    ///     (vec!["red", "low"], 0.05),
    /// ].into_iter().collect();
    /// let network = BayesianNetwork::new(vec![
    ///     Node::new("TrafficLight", ["green", "yellow", "red"], light, Vec::<String>::new()),
    ///     Node::new("Risk", ["high", "low"], risk, ["TrafficLight"]),
    /// ]).unwrap();
    /// let p = network.marginalize(&[Evidence::new("Risk", "high")]).unwrap();
    /// assert!((p - 0.51).abs() < 1e-12);
    /// ```
    pub fn marginalize(&self, evidences: &[Evidence]) -> BNResult<f64> {
        if evidences.is_empty() {
            return Ok(1f64);
        }
        let resolved = resolve(self, evidences)?;
        let mut fixed: Vec<Option<usize>> = vec![None; self.len()];
        for (node_index, value_index) in resolved {
            fixed[node_index] = Some(value_index);
        }
        let domains: Vec<Vec<usize>> = self
            .nodes()
            .iter()
            .zip(&fixed)
            .map(|(node, value)| match value {
                Some(value) => vec![*value],
                None => (0..node.domain().len()).collect(),
            })
            .collect();
        let mut counters = vec![0usize; domains.len()];
        let mut key = Vec::new();
        let mut total = 0f64;
        let mut assignments = 0usize;
        'enumeration: loop {
            let mut p = 1f64;
            for (index, node) in self.nodes().iter().enumerate() {
                key.clear();
                for parent in self.parent_indices(index) {
                    let parent_node = &self.nodes()[*parent];
                    key.push(parent_node.domain()[domains[*parent][counters[*parent]]].clone());
                }
                key.push(node.domain()[domains[index][counters[index]]].clone());
                p *= node.probability(&key)?;
            }
            total += p;
            assignments += 1;
            for position in 0..domains.len() {
                counters[position] += 1;
                if counters[position] < domains[position].len() {
                    continue 'enumeration;
                }
                counters[position] = 0;
            }
            break;
        }
        debug!(assignments, total, "brute force marginalization");
        Ok(total)
    }
}
