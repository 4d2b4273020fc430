use std::fmt::Display;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    bayesian::evidence::Evidence,
    bayesian::network::BayesianNetwork,
    core::{LoopyConfig, MessagePassingInfo},
    error::{BNError, BNResult},
};

/// Message passing algorithm used to answer a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMethod {
    /// Exact on tree shaped factor graphs, loopy otherwise
    #[default]
    Auto,
    /// Exact sum-product, fails on factor graphs with cycles
    Exact,
    /// Loopy sum-product
    Loopy,
}

impl Display for InferenceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceMethod::Auto => write!(f, "auto"),
            InferenceMethod::Exact => write!(f, "exact"),
            InferenceMethod::Loopy => write!(f, "loopy"),
        }
    }
}

/// Configuration of inference queries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Requested algorithm
    pub method: InferenceMethod,

    /// Hyper-parameters of loopy message passing
    pub loopy: LoopyConfig,
}

/// Outcome of a single query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Unnormalized probability of the evidence
    pub probability: f64,

    /// Algorithm actually used, never `Auto` unless evidence is empty
    pub method: InferenceMethod,

    /// Loopy message passing info
    pub info: Option<MessagePassingInfo>,

    /// Whether the probability is a loopy approximation on a factor graph with cycles
    pub approximate: bool,
}

impl BayesianNetwork {
    /// Computes the unnormalized probability of evidence with message passing,
    /// choosing exact or loopy message passing by the factor graph's topology
    ///
    /// # Notes
    ///
    /// Divide two such probabilities to get a conditional one, see also
    /// `conditional_probability`. Empty evidence results in 1.
    /// On a factor graph with cycles the result is a loopy approximation and
    /// may differ from the exact value, `infer` reports it as `approximate`.
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
    /// let divisor = network.belief_propagation(&[Evidence::new("Risk", "high")]).unwrap();
    /// let dividend = network.belief_propagation(&[
    ///     Evidence::new("TrafficLight", "yellow"),
    ///     Evidence::new("Risk", "high"),
    /// ]).unwrap();
    /// assert!((dividend / divisor - 0.2696).abs() < 1e-3);
    /// ```
    #[inline]
    pub fn belief_propagation(&self, evidences: &[Evidence]) -> BNResult<f64> {
        Ok(self.infer(evidences, &InferenceConfig::default())?.probability)
    }

    /// Computes the unnormalized probability of evidence with exact message passing
    ///
    /// # Notes
    ///
    /// Fails with `BNError::NotATree` if the network's factor graph has cycles
    #[inline]
    pub fn exact_belief_propagation(&self, evidences: &[Evidence]) -> BNResult<f64> {
        let config = InferenceConfig {
            method: InferenceMethod::Exact,
            ..InferenceConfig::default()
        };
        Ok(self.infer(evidences, &config)?.probability)
    }

    /// Computes the unnormalized probability of evidence with loopy message passing
    #[inline]
    pub fn loopy_belief_propagation(
        &self,
        evidences: &[Evidence],
        loopy: &LoopyConfig,
    ) -> BNResult<f64> {
        let config = InferenceConfig {
            method: InferenceMethod::Loopy,
            loopy: *loopy,
        };
        Ok(self.infer(evidences, &config)?.probability)
    }

    /// Answers a query building a fresh factor graph conditioned on evidence
    ///
    /// # Arguments
    ///
    /// * `evidences` - Observed values, the first one is the reference variable
    ///     of the exact marginal
    /// * `config` - Inference configuration
    pub fn infer(
        &self,
        evidences: &[Evidence],
        config: &InferenceConfig,
    ) -> BNResult<InferenceReport> {
        let Some(reference) = evidences.first() else {
            return Ok(InferenceReport {
                probability: 1f64,
                method: config.method,
                info: None,
                approximate: false,
            });
        };
        let mut fg = self.conditioned_factor_graph(evidences)?;
        let is_tree = fg.is_tree();
        let method = match config.method {
            InferenceMethod::Auto if is_tree => InferenceMethod::Exact,
            InferenceMethod::Auto => InferenceMethod::Loopy,
            other => other,
        };
        let report = match method {
            InferenceMethod::Loopy => {
                let (probability, info) = fg.run_loopy_message_passing(&config.loopy)?;
                if !is_tree {
                    warn!(
                        evidence = ?evidences.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        probability,
                        "factor graph has cycles, loopy estimate may be inexact"
                    );
                }
                InferenceReport {
                    probability,
                    method,
                    info: Some(info),
                    approximate: !is_tree,
                }
            }
            _ => {
                let passes = fg.run_exact_message_passing()?;
                debug!(passes, "exact message passing finished");
                InferenceReport {
                    probability: fg.marginal(&reference.name)?,
                    method,
                    info: None,
                    approximate: false,
                }
            }
        };
        debug!(
            method = %report.method,
            probability = report.probability,
            evidence = evidences.len(),
            "query answered"
        );
        Ok(report)
    }

    /// Computes P(query | given) as the ratio P(query, given) / P(given)
    ///
    /// # Notes
    ///
    /// Fails with `BNError::ZeroProbabilityEvidence` if P(given) is zero
    pub fn conditional_probability(
        &self,
        query: &[Evidence],
        given: &[Evidence],
        config: &InferenceConfig,
    ) -> BNResult<f64> {
        let joint: Vec<Evidence> = query.iter().chain(given).cloned().collect();
        let dividend = self.infer(&joint, config)?.probability;
        let divisor = self.infer(given, config)?.probability;
        if divisor <= 0f64 {
            return Err(BNError::ZeroProbabilityEvidence);
        }
        Ok(dividend / divisor)
    }

    /// Answers independent queries in parallel, each one owns its factor graph
    pub fn infer_batch(
        &self,
        queries: &[Vec<Evidence>],
        config: &InferenceConfig,
    ) -> Vec<BNResult<f64>> {
        queries
            .par_iter()
            .map(|evidences| self.infer(evidences, config).map(|report| report.probability))
            .collect()
    }
}
