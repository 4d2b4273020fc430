use std::{collections::HashMap, fmt::Debug};

use crate::error::{BNError, BNResult};

/// A conditional probability table of a node
pub trait ProbabilityTable: Debug + Send + Sync {
    /// Returns the probability of an assignment
    ///
    /// # Arguments
    ///
    /// * `key` - Values of the node's parents in declared order followed by the node's own value
    fn probability(&self, key: &[String]) -> Option<f64>;
}

/// A probability table backed by a hash map
#[derive(Debug, Clone, Default)]
pub struct MapProbabilityTable(HashMap<Vec<String>, f64>);

impl MapProbabilityTable {
    /// Creates an empty table
    #[inline]
    pub fn new() -> Self {
        MapProbabilityTable::default()
    }

    /// Sets the probability of an assignment
    #[inline]
    pub fn insert(&mut self, key: Vec<String>, probability: f64) {
        self.0.insert(key, probability);
    }

    /// Returns the number of stored assignments
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if a table has no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ProbabilityTable for MapProbabilityTable {
    #[inline]
    fn probability(&self, key: &[String]) -> Option<f64> {
        self.0.get(key).copied()
    }
}

impl<K, S> FromIterator<(K, f64)> for MapProbabilityTable
where
    K: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        MapProbabilityTable(
            iter.into_iter()
                .map(|(key, p)| (key.into_iter().map(Into::into).collect(), p))
                .collect(),
        )
    }
}

// ------------------------------------------------------------------------------------------

/// A discrete random variable of a Bayesian network
#[derive(Debug)]
pub struct Node {
    name: String,
    domain: Vec<String>,
    table: Box<dyn ProbabilityTable>,
    parents: Vec<String>,
}

impl Node {
    /// Creates a new node
    ///
    /// # Arguments
    ///
    /// * `name` - A unique name of a node
    /// * `domain` - Distinct values of a node
    /// * `table` - A conditional probability table keyed by parents' values followed by the node's value
    /// * `parents` - Names of parents, the order defines the order of the table's keys
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::bayesian::{MapProbabilityTable, Node};
    ///
    /// let table: MapProbabilityTable = [
    ///     (["true"], 0.2),
    ///     (["false"], 0.8),
    /// ].into_iter().collect();
    /// let rain = Node::new("Rain", ["true", "false"], table, Vec::<String>::new());
    /// assert_eq!(rain.domain(), ["true", "false"]);
    /// ```
    pub fn new<D, P>(
        name: impl Into<String>,
        domain: D,
        table: impl ProbabilityTable + 'static,
        parents: P,
    ) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Node {
            name: name.into(),
            domain: domain.into_iter().map(Into::into).collect(),
            table: Box::new(table),
            parents: parents.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the name of a node
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the values of a node
    #[inline]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Returns the names of parents in declared order
    #[inline]
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Returns the conditional probability table
    #[inline]
    pub fn table(&self) -> &dyn ProbabilityTable {
        self.table.as_ref()
    }

    /// Returns the position of a value in the domain
    #[inline]
    pub fn value_index(&self, value: &str) -> Option<usize> {
        self.domain.iter().position(|x| x == value)
    }

    /// Looks up the probability of an assignment
    #[inline]
    pub(crate) fn probability(&self, key: &[String]) -> BNResult<f64> {
        self.table
            .probability(key)
            .ok_or_else(|| BNError::UnknownProbabilityKey {
                node: self.name.clone(),
                key: key.to_vec(),
            })
    }
}

// ------------------------------------------------------------------------------------------

/// A Bayesian network, immutable once built
#[derive(Debug)]
pub struct BayesianNetwork {
    nodes: Vec<Node>,
    parent_indices: Vec<Vec<usize>>,
    names: HashMap<String, usize>,
}

impl BayesianNetwork {
    /// Creates a network from nodes
    ///
    /// # Notes
    ///
    /// Names must be unique, domains non-empty and free of repeated values,
    /// and each node's parents must precede it
    ///
    /// # Example
    ///
    /// ```
    /// use bnrs::bayesian::{BayesianNetwork, BNError, MapProbabilityTable, Node};
    ///
    /// let orphan = Node::new("Risk", ["high", "low"], MapProbabilityTable::new(), ["TrafficLight"]);
    /// let result = BayesianNetwork::new(vec![orphan]);
    /// assert!(matches!(result, Err(BNError::UnknownParent { .. })));
    /// ```
    pub fn new(nodes: Vec<Node>) -> BNResult<Self> {
        let mut names = HashMap::with_capacity(nodes.len());
        let mut parent_indices = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if node.domain.is_empty() {
                return Err(BNError::EmptyDomain(node.name.clone()));
            }
            for (i, value) in node.domain.iter().enumerate() {
                if node.domain[..i].contains(value) {
                    return Err(BNError::DuplicateDomainValue {
                        node: node.name.clone(),
                        value: value.clone(),
                    });
                }
            }
            let parents = node
                .parents
                .iter()
                .map(|parent| {
                    names
                        .get(parent)
                        .copied()
                        .ok_or_else(|| BNError::UnknownParent {
                            node: node.name.clone(),
                            parent: parent.clone(),
                        })
                })
                .collect::<BNResult<Vec<_>>>()?;
            if names.insert(node.name.clone(), index).is_some() {
                return Err(BNError::DuplicateNode(node.name.clone()));
            }
            parent_indices.push(parents);
        }
        Ok(BayesianNetwork {
            nodes,
            parent_indices,
            names,
        })
    }

    /// Returns nodes in declaration order
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns a node by name
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.names.get(name).map(|index| &self.nodes[*index])
    }

    /// Returns the position of a node by name
    #[inline]
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Returns positions of a node's parents
    #[inline]
    pub fn parent_indices(&self, index: usize) -> &[usize] {
        &self.parent_indices[index]
    }

    /// Returns the number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if a network has no nodes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
