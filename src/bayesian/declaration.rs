use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    bayesian::network::{BayesianNetwork, MapProbabilityTable, Node},
    error::{BNError, BNResult},
};

/// One row of a probability declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityRow {
    /// Values of parents in the order of the declaration's parents, empty for roots
    #[serde(default)]
    pub given: Vec<String>,

    /// Probabilities of the variable's values in domain order
    pub values: Vec<f64>,
}

/// A single record of a network definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// Name of a network
    Network { name: String },

    /// A discrete variable with its ordered values
    Variable { name: String, domain: Vec<String> },

    /// A conditional probability table of a variable
    Probability {
        variable: String,
        #[serde(default)]
        parents: Vec<String>,
        rows: Vec<ProbabilityRow>,
    },
}

/// A stream of declarations, e.g. deserialized from YAML or JSON
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub declarations: Vec<Declaration>,
}

impl NetworkDefinition {
    /// Assembles a network out of the definition
    #[inline]
    pub fn into_network(self) -> BNResult<BayesianNetwork> {
        BayesianNetwork::from_declarations(self.declarations)
    }
}

struct PendingNode {
    name: String,
    domain: Vec<String>,
    parents: Vec<String>,
    table: Option<MapProbabilityTable>,
}

impl BayesianNetwork {
    /// Assembles a network out of declarations
    ///
    /// # Notes
    ///
    /// Declarations may come in any order. Nodes are emitted so that parents
    /// always precede children; among nodes whose parents are already emitted
    /// the declaration order wins.
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::bayesian::{BayesianNetwork, Declaration, ProbabilityRow};
    ///
    /// let declarations = vec![
    ///     Declaration::Probability {
    ///         variable: "Risk".into(),
    ///         parents: vec!["TrafficLight".into()],
    ///         rows: vec![
    ///             ProbabilityRow { given: vec!["green".into()], values: vec![0.1, 0.9] },
    ///             ProbabilityRow { given: vec!["red".into()], values: vec![0.95, 0.05] },
    ///         ],
    ///     },
    ///     Declaration::Variable { name: "Risk".into(), domain: vec!["high".into(), "low".into()] },
    ///     Declaration::Variable { name: "TrafficLight".into(), domain: vec!["green".into(), "red".into()] },
    ///     Declaration::Probability {
    ///         variable: "TrafficLight".into(),
    ///         parents: vec![],
    ///         rows: vec![ProbabilityRow { given: vec![], values: vec![0.6, 0.4] }],
    ///     },
    /// ];
    /// let network = BayesianNetwork::from_declarations(declarations).unwrap();
    /// assert_eq!(network.nodes()[0].name(), "TrafficLight");
    /// assert_eq!(network.nodes()[1].name(), "Risk");
    /// ```
    pub fn from_declarations(
        declarations: impl IntoIterator<Item = Declaration>,
    ) -> BNResult<BayesianNetwork> {
        let mut network_name = None;
        let mut pending: Vec<PendingNode> = Vec::new();
        let mut names: HashMap<String, usize> = HashMap::new();
        let mut probabilities = Vec::new();
        for declaration in declarations {
            match declaration {
                Declaration::Network { name } => network_name = Some(name),
                Declaration::Variable { name, domain } => {
                    if names.insert(name.clone(), pending.len()).is_some() {
                        return Err(BNError::DuplicateNode(name));
                    }
                    pending.push(PendingNode {
                        name,
                        domain,
                        parents: Vec::new(),
                        table: None,
                    });
                }
                Declaration::Probability {
                    variable,
                    parents,
                    rows,
                } => probabilities.push((variable, parents, rows)),
            }
        }
        // probabilities are attached once every variable is known
        for (variable, parents, rows) in probabilities {
            let index = *names
                .get(&variable)
                .ok_or_else(|| BNError::UnknownVariable(variable.clone()))?;
            if let Some(parent) = parents.iter().find(|p| !names.contains_key(*p)) {
                return Err(BNError::UnknownParent {
                    node: variable,
                    parent: parent.clone(),
                });
            }
            if pending[index].table.is_some() {
                return Err(BNError::DuplicateNode(variable));
            }
            let domain = &pending[index].domain;
            let mut table = MapProbabilityTable::new();
            for row in rows {
                if row.given.len() != parents.len() {
                    return Err(BNError::ShapeMismatch {
                        operation: "probability declaration parents",
                        expected: parents.len(),
                        actual: row.given.len(),
                    });
                }
                if row.values.len() != domain.len() {
                    return Err(BNError::ShapeMismatch {
                        operation: "probability declaration values",
                        expected: domain.len(),
                        actual: row.values.len(),
                    });
                }
                for (value, p) in domain.iter().zip(&row.values) {
                    let mut key = row.given.clone();
                    key.push(value.clone());
                    table.insert(key, *p);
                }
            }
            pending[index].parents = parents;
            pending[index].table = Some(table);
        }
        if let Some(node) = pending.iter().find(|node| node.table.is_none()) {
            return Err(BNError::MissingProbability(node.name.clone()));
        }
        let order = topological_order(&pending, &names)?;
        let mut slots: Vec<Option<PendingNode>> = pending.into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for index in order {
            if let Some(PendingNode {
                name,
                domain,
                parents,
                table: Some(table),
            }) = slots[index].take()
            {
                nodes.push(Node::new(name, domain, table, parents));
            }
        }
        debug!(
            network = network_name.as_deref().unwrap_or("<unnamed>"),
            nodes = nodes.len(),
            "network assembled from declarations"
        );
        BayesianNetwork::new(nodes)
    }
}

// Picks the first ready node in declaration order until every node is emitted
fn topological_order(
    pending: &[PendingNode],
    names: &HashMap<String, usize>,
) -> BNResult<Vec<usize>> {
    let parents: Vec<Vec<usize>> = pending
        .iter()
        .map(|node| node.parents.iter().filter_map(|p| names.get(p).copied()).collect())
        .collect();
    let mut emitted = vec![false; pending.len()];
    let mut order = Vec::with_capacity(pending.len());
    while order.len() < pending.len() {
        let ready = (0..pending.len())
            .find(|i| !emitted[*i] && parents[*i].iter().all(|p| emitted[*p]));
        match ready {
            Some(index) => {
                emitted[index] = true;
                order.push(index);
            }
            None => {
                return Err(BNError::CyclicNetwork(
                    pending
                        .iter()
                        .zip(&emitted)
                        .filter(|(_, emitted)| !**emitted)
                        .map(|(node, _)| node.name.clone())
                        .collect(),
                ))
            }
        }
    }
    Ok(order)
}
