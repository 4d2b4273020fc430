use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    core::edge::Edge,
    core::factor_graph::{FactorGraph, MessagePassingInfo},
    core::message::Message,
    core::tensor::{elementwise_multiply, factor_to_variable, initial, Tensor},
    error::{BNError, BNResult},
};

/// Slack allowed above 1 when checking that a probability estimate is sane
const PROBABILITY_BOUND_SLACK: f64 = 1e-9;

/// Hyper-parameters of loopy message passing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopyConfig {
    /// A maximal number of iterations
    pub max_steps: usize,

    /// A minimal number of iterations that is performed disregarding the
    /// convergence criterion
    pub min_steps: usize,

    /// A threshold of both the estimate change and the messages discrepancy
    /// between two subsequent iterations
    pub threshold: f64,
}

impl Default for LoopyConfig {
    fn default() -> Self {
        LoopyConfig {
            max_steps: 100,
            min_steps: 0,
            threshold: 0.001,
        }
    }
}

// ------------------------------------------------------------------------------------------

/// Which messages of an edge are read while computing new ones
#[derive(Debug, Clone, Copy)]
enum Slot {
    Current,
    Previous,
}

impl Slot {
    #[inline(always)]
    fn to_factor(self, edge: &Edge) -> Option<&Tensor> {
        match self {
            Slot::Current => edge.to_factor.as_ref(),
            Slot::Previous => edge.prev_to_factor.as_ref(),
        }
    }

    #[inline(always)]
    fn to_variable(self, edge: &Edge) -> Option<&Tensor> {
        match self {
            Slot::Current => edge.to_variable.as_ref(),
            Slot::Previous => edge.prev_to_variable.as_ref(),
        }
    }
}

impl FactorGraph {
    /// Runs exact sum-product message passing
    ///
    /// Repeated passes over all edges send every message whose inputs are
    /// available until every edge carries both messages. Returns the number
    /// of passes.
    ///
    /// # Notes
    ///
    /// The method fails with `BNError::NotATree` on a factor graph with cycles
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
    /// let prior = ArrayD::from_shape_vec(IxDyn(&[3]), vec![0.4, 0.25, 0.35]).unwrap();
    /// let conditional = ArrayD::from_shape_vec(
    ///     IxDyn(&[3, 2]),
    ///     vec![0.1, 0.9, 0.55, 0.45, 0.95, 0.05],
    /// ).unwrap();
    /// fgb.add_factor(prior, &[light]).unwrap();
    /// fgb.add_factor(conditional, &[light, risk]).unwrap();
    /// let mut fg = fgb.build();
    /// fg.apply_evidence(&[(risk, 0)]).unwrap();
    /// fg.run_exact_message_passing().unwrap();
    /// assert!((fg.variable_marginal(risk).unwrap() - 0.51).abs() < 1e-12);
    /// ```
    pub fn run_exact_message_passing(&mut self) -> BNResult<usize> {
        if !self.is_tree() {
            return Err(BNError::NotATree);
        }
        let edges_number = self.edges.len();
        let mut pass = 0;
        loop {
            pass += 1;
            trace!(pass, "exact message passing");
            let mut changed = false;
            for edge_index in 0..edges_number {
                if self.edges[edge_index].to_factor.is_some() {
                    continue;
                }
                if let Some(message) = self.variable_message(edge_index, Slot::Current)? {
                    self.log_message("v->f", edge_index, &message);
                    self.edges[edge_index].to_factor = Some(message);
                    changed = true;
                }
            }
            for edge_index in 0..edges_number {
                if self.edges[edge_index].to_variable.is_some() {
                    continue;
                }
                if let Some(message) = self.factor_message(edge_index, Slot::Current)? {
                    self.log_message("f->v", edge_index, &message);
                    self.edges[edge_index].to_variable = Some(message);
                    changed = true;
                }
            }
            let pending = self
                .edges
                .iter()
                .map(|e| e.to_factor.is_none() as usize + e.to_variable.is_none() as usize)
                .sum::<usize>();
            if pending == 0 {
                return Ok(pass);
            }
            if !changed {
                return Err(BNError::SchedulerStalled { pending });
            }
        }
    }

    /// Runs loopy sum-product message passing with synchronous updates
    ///
    /// # Arguments
    ///
    /// * `config` - Hyper-parameters of message passing
    ///
    /// # Notes
    ///
    /// Every message starts as a vector of ones. An iteration recomputes all messages
    /// from the previous iteration's ones, normalizes them and then stores them as
    /// previous. After each iteration the Bethe estimate of the observations'
    /// probability is evaluated; the run stops once both the estimate change and
    /// the maximal message discrepancy are below the threshold and the estimate
    /// does not exceed 1. At least one iteration is always performed, so
    /// `max_steps == 0` behaves as 1. Reaching `max_steps` is not an error, the
    /// returned info then reports `converged == false`.
    ///
    /// Returns the final estimate together with the run info.
    pub fn run_loopy_message_passing(
        &mut self,
        config: &LoopyConfig,
    ) -> BNResult<(f64, MessagePassingInfo)> {
        for edge in &mut self.edges {
            let message = initial(self.variables[edge.variable].domain_size);
            edge.to_factor = Some(message.clone());
            edge.to_variable = Some(message.clone());
            edge.prev_to_factor = Some(message.clone());
            edge.prev_to_variable = Some(message);
        }
        let max_steps = config.max_steps.max(1);
        let mut discrepancy_dynamics = Vec::with_capacity(max_steps);
        let mut last_discrepancy = f64::MAX;
        let mut prev_estimate = -1f64;
        let mut estimate = f64::NAN;
        for i in 0..max_steps {
            let updates = (0..self.edges.len())
                .map(|edge_index| {
                    let missing = || {
                        let variable = self.edges[edge_index].variable;
                        BNError::MissingMessage(self.variables[variable].name.clone())
                    };
                    let mut to_factor = self
                        .variable_message(edge_index, Slot::Previous)?
                        .ok_or_else(missing)?;
                    let mut to_variable = self
                        .factor_message(edge_index, Slot::Previous)?
                        .ok_or_else(missing)?;
                    to_factor.normalize();
                    to_variable.normalize();
                    Ok((to_factor, to_variable))
                })
                .collect::<BNResult<Vec<_>>>()?;
            let mut max_discrepancy = 0f64;
            for (edge, (to_factor, to_variable)) in self.edges.iter_mut().zip(updates) {
                if let Some(prev) = &edge.prev_to_factor {
                    max_discrepancy = max_discrepancy.max(to_factor.discrepancy(prev));
                }
                if let Some(prev) = &edge.prev_to_variable {
                    max_discrepancy = max_discrepancy.max(to_variable.discrepancy(prev));
                }
                edge.prev_to_factor = Some(to_factor.clone());
                edge.prev_to_variable = Some(to_variable.clone());
                edge.to_factor = Some(to_factor);
                edge.to_variable = Some(to_variable);
            }
            estimate = self.bethe_estimate()?;
            discrepancy_dynamics.push(max_discrepancy);
            last_discrepancy = max_discrepancy;
            trace!(
                step = i,
                estimate,
                discrepancy = max_discrepancy,
                "loopy message passing"
            );
            if (i + 1 >= config.min_steps)
                && ((estimate - prev_estimate).abs() <= config.threshold)
                && (estimate <= 1f64 + PROBABILITY_BOUND_SLACK)
                && (max_discrepancy <= config.threshold)
            {
                let info = MessagePassingInfo {
                    iterations_number: i + 1,
                    converged: true,
                    last_discrepancy,
                    discrepancy_dynamics,
                };
                debug!("{}", info);
                return Ok((estimate, info));
            }
            prev_estimate = estimate;
        }
        let info = MessagePassingInfo {
            iterations_number: max_steps,
            converged: false,
            last_discrepancy,
            discrepancy_dynamics,
        };
        warn!(estimate, "{}", info);
        Ok((estimate, info))
    }

    // private methods ----------------------------------------------------------------------

    fn variable_message(&self, edge_index: usize, slot: Slot) -> BNResult<Option<Tensor>> {
        let edge = &self.edges[edge_index];
        let variable = &self.variables[edge.variable];
        let mut message = initial(variable.domain_size);
        if variable.degree() == 1 {
            return Ok(Some(message));
        }
        for other in &variable.edges {
            if *other == edge_index {
                continue;
            }
            match slot.to_variable(&self.edges[*other]) {
                Some(incoming) => message = elementwise_multiply(&message, incoming)?,
                None => return Ok(None),
            }
        }
        Ok(Some(message))
    }

    fn factor_message(&self, edge_index: usize, slot: Slot) -> BNResult<Option<Tensor>> {
        let edge = &self.edges[edge_index];
        let factor = &self.factors[edge.factor];
        if factor.degree() == 1 {
            return Ok(Some(factor.tensor.clone()));
        }
        let incoming: Vec<_> = factor
            .edges
            .iter()
            .map(|e| slot.to_factor(&self.edges[*e]))
            .collect();
        let ready = incoming
            .iter()
            .enumerate()
            .all(|(axis, message)| axis == edge.axis || message.is_some());
        if !ready {
            return Ok(None);
        }
        factor_to_variable(&factor.tensor, edge.axis, &incoming).map(Some)
    }

    #[inline(always)]
    fn log_message(&self, direction: &str, edge_index: usize, message: &Tensor) {
        let edge = &self.edges[edge_index];
        debug!(
            direction,
            variable = %self.variables[edge.variable].name,
            factor = edge.factor,
            message = ?message.as_slice(),
            "send message"
        );
    }
}
