use thiserror::Error;

/// Errors that could appear while building networks, factor graphs or running inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BNError {
    /// An evidence or query name has no matching variable or node
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// An observed value is absent from the variable's domain
    #[error("variable {variable} does not contain value {value}")]
    InvalidEvidenceValue { variable: String, value: String },

    /// One variable is observed with two different values
    #[error("variable {variable} is observed both as {first} and as {second}")]
    ConflictingEvidence {
        variable: String,
        first: String,
        second: String,
    },

    /// A conditional probability table has no entry for a required assignment
    #[error("probability table of node {node} has no entry for key [{}]", .key.join(", "))]
    UnknownProbabilityKey { node: String, key: Vec<String> },

    /// Operands of a tensor operation have inconsistent axis lengths
    #[error("shape mismatch in {operation}: expected {expected}, got {actual}")]
    ShapeMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Index of a variable is out of range
    #[error("index of a variable {1} is out of range of [0..{0}] variables")]
    OutOfRangeVariable(usize, usize),

    /// Two nodes of a network share one name
    #[error("node {0} is declared twice")]
    DuplicateNode(String),

    /// A parent is not declared before its child
    #[error("node {node} refers to undeclared parent {parent}")]
    UnknownParent { node: String, parent: String },

    /// A node has no values
    #[error("domain of node {0} is empty")]
    EmptyDomain(String),

    /// A value label appears twice in one domain
    #[error("domain of node {node} contains value {value} twice")]
    DuplicateDomainValue { node: String, value: String },

    /// A declared variable has no probability declaration
    #[error("variable {0} has no probability declaration")]
    MissingProbability(String),

    /// Parent relations of declarations form a directed cycle
    #[error("parent relations form a cycle through: {}", .0.join(", "))]
    CyclicNetwork(Vec<String>),

    /// Exact message passing was requested on a factor graph with cycles
    #[error("factor graph contains cycles, exact message passing is not applicable")]
    NotATree,

    /// The exact scheduler made no progress while messages were still missing
    #[error("exact message passing stalled with {pending} messages pending")]
    SchedulerStalled { pending: usize },

    /// A marginal was requested before the required messages were sent
    #[error("messages around variable {0} have not been computed")]
    MissingMessage(String),

    /// A conditional probability was requested given evidence of probability zero
    #[error("conditioning evidence has zero probability")]
    ZeroProbabilityEvidence,

    /// Evidence text is not of the form `name=value`
    #[error("malformed evidence '{0}', expected name=value")]
    MalformedEvidence(String),
}

/// Result type of the crate's methods
pub type BNResult<T> = Result<T, BNError>;
