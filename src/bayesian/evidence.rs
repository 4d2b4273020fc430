use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    bayesian::network::BayesianNetwork,
    error::{BNError, BNResult},
};

/// An observed value of a variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evidence {
    /// Name of an observed variable
    pub name: String,

    /// Observed value
    pub value: String,
}

impl Evidence {
    /// Creates a new evidence
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Evidence {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Display for Evidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl FromStr for Evidence {
    type Err = BNError;

    /// Parses `name=value`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() && !value.trim().is_empty() => {
                Ok(Evidence::new(name.trim(), value.trim()))
            }
            _ => Err(BNError::MalformedEvidence(s.to_owned())),
        }
    }
}

/// Resolves evidence against a network into (node index, value index) pairs
///
/// # Notes
///
/// Unknown names, values outside of a domain and one variable observed with
/// two different values are errors; repeated identical items are dropped
pub(crate) fn resolve(
    network: &BayesianNetwork,
    evidences: &[Evidence],
) -> BNResult<Vec<(usize, usize)>> {
    let mut resolved: Vec<(usize, usize)> = Vec::with_capacity(evidences.len());
    for evidence in evidences {
        let node_index = network
            .node_index(&evidence.name)
            .ok_or_else(|| BNError::UnknownVariable(evidence.name.clone()))?;
        let node = &network.nodes()[node_index];
        let value_index =
            node.value_index(&evidence.value)
                .ok_or_else(|| BNError::InvalidEvidenceValue {
                    variable: evidence.name.clone(),
                    value: evidence.value.clone(),
                })?;
        match resolved.iter().find(|(n, _)| *n == node_index) {
            Some((_, v)) if *v == value_index => continue,
            Some((_, v)) => {
                return Err(BNError::ConflictingEvidence {
                    variable: evidence.name.clone(),
                    first: node.domain()[*v].clone(),
                    second: evidence.value.clone(),
                })
            }
            None => resolved.push((node_index, value_index)),
        }
    }
    Ok(resolved)
}
