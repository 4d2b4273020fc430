use crate::core::tensor::Tensor;

/// A factor node of a factor graph, axes of its tensor follow the order of its edges
#[derive(Debug, Clone)]
pub struct FactorNode {
    pub(crate) tensor: Tensor,
    pub(crate) edges: Vec<usize>,
}

impl FactorNode {
    #[inline(always)]
    pub(super) fn new_disconnected(tensor: Tensor) -> Self {
        FactorNode {
            tensor,
            edges: Vec::new(),
        }
    }

    /// Returns a factor's tensor
    #[inline]
    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    /// Returns indices of adjoint edges ordered by tensor axes
    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Returns a degree (number of adjoint variables)
    #[inline(always)]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}
