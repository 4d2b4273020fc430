use crate::core::tensor::Tensor;

/// An edge connecting a factor and a variable
///
/// Messages flow in both directions: `to_factor` is sent by the variable,
/// `to_variable` is sent by the factor. The `prev_*` slots hold the
/// previous iteration's messages of loopy message passing.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) factor: usize,
    pub(crate) variable: usize,
    pub(crate) axis: usize,
    pub(crate) to_factor: Option<Tensor>,
    pub(crate) to_variable: Option<Tensor>,
    pub(crate) prev_to_factor: Option<Tensor>,
    pub(crate) prev_to_variable: Option<Tensor>,
}

impl Edge {
    #[inline(always)]
    pub(super) fn new(factor: usize, variable: usize, axis: usize) -> Self {
        Edge {
            factor,
            variable,
            axis,
            to_factor: None,
            to_variable: None,
            prev_to_factor: None,
            prev_to_variable: None,
        }
    }

    /// Index of the factor end
    #[inline]
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Index of the variable end
    #[inline]
    pub fn variable(&self) -> usize {
        self.variable
    }

    /// Position of the variable's axis in the factor's tensor
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Variable to factor message if it has been sent
    #[inline]
    pub fn to_factor(&self) -> Option<&Tensor> {
        self.to_factor.as_ref()
    }

    /// Factor to variable message if it has been sent
    #[inline]
    pub fn to_variable(&self) -> Option<&Tensor> {
        self.to_variable.as_ref()
    }

    #[inline(always)]
    pub(crate) fn clear_messages(&mut self) {
        self.to_factor = None;
        self.to_variable = None;
        self.prev_to_factor = None;
        self.prev_to_variable = None;
    }
}
