/// A variable node of a factor graph
#[derive(Debug, Clone)]
pub struct VariableNode {
    pub(crate) name: String,
    pub(crate) domain_size: usize,
    pub(crate) evidence_index: Option<usize>,
    pub(crate) edges: Vec<usize>,
}

impl VariableNode {
    #[inline(always)]
    pub(super) fn new_disconnected(name: String, domain_size: usize) -> Self {
        VariableNode {
            name,
            domain_size,
            evidence_index: None,
            edges: Vec::new(),
        }
    }

    /// Returns the name of a variable
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current domain size, 1 once a variable is observed
    #[inline]
    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    /// Returns the index of an observed value if any
    #[inline]
    pub fn evidence_index(&self) -> Option<usize> {
        self.evidence_index
    }

    /// Returns indices of adjoint edges
    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Returns a degree (number of adjoint factors)
    #[inline(always)]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}
