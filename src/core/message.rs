use std::fmt::Debug;

use crate::core::tensor::Tensor;

/// A trait providing message's methods
pub trait Message: Debug + Clone + 'static {
    /// Evaluates a distance between messages
    ///
    /// # Arguments
    ///
    /// * `other` - A second message
    ///
    /// # Notes
    ///
    /// This method is used in loopy message passing in order to
    /// define a stopping criterion: when discrepancy is smaller
    /// than some threshold, message passing stops
    fn discrepancy(&self, other: &Self) -> f64;

    /// Rescales a message so that its entries sum to one
    ///
    /// # Notes
    ///
    /// Messages summing to zero are left untouched
    fn normalize(&mut self);
}

impl Message for Tensor {
    #[inline]
    fn discrepancy(&self, other: &Self) -> f64 {
        if self.shape() != other.shape() {
            return f64::INFINITY;
        }
        self.iter()
            .zip(other.iter())
            .map(|(lhs, rhs)| (lhs - rhs).abs())
            .fold(0f64, f64::max)
    }

    #[inline]
    fn normalize(&mut self) {
        let sum = self.sum();
        if sum > 0f64 {
            *self /= sum;
        }
    }
}
