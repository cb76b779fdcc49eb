use thiserror::Error;

/// Why a correlation matrix failed validation (data model invariants i–v:
/// square, symmetric, unit diagonal, bounded off-diagonal, positive
/// semi-definite).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationFault {
    NonSquare,
    Asymmetric,
    NonUnitDiagonal,
    OutOfBounds,
    NotPositiveSemiDefinite(String),
}

impl std::fmt::Display for CorrelationFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationFault::NonSquare => write!(f, "matrix is not square"),
            CorrelationFault::Asymmetric => write!(f, "matrix is not symmetric"),
            CorrelationFault::NonUnitDiagonal => write!(f, "diagonal entries are not all 1.0"),
            CorrelationFault::OutOfBounds => write!(f, "off-diagonal entries outside [-1, 1]"),
            CorrelationFault::NotPositiveSemiDefinite(detail) => {
                write!(f, "not positive semi-definite: {detail}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("At least one iteration is required")]
    InsufficientIterations,

    #[error("At least one simulation input is required")]
    NoInputs,

    #[error("Model returned a non-finite value at iteration {iteration}: {reason}")]
    InvalidModel { iteration: usize, reason: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid correlation matrix: {cause}")]
    InvalidCorrelationMatrix { cause: CorrelationFault },

    #[error("Data contains a non-finite value (NaN or infinite)")]
    NonFinite,

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid parameters for {distribution}: {reason}")]
    InvalidDistributionParameters { distribution: String, reason: String },

    #[error("Scenario '{scenario}' is missing configuration for input '{missing}'")]
    MissingInputConfiguration { scenario: String, missing: String },

    #[error("Scenario '{scenario}' references unknown input '{name}'")]
    UnknownInput { scenario: String, name: String },

    #[error("At least one scenario is required")]
    NoScenarios,

    #[error("Unknown metric '{metric}' requested for scenario comparison")]
    UnknownMetric { metric: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::SerializationError(err.to_string())
    }
}

pub type SimResult<T> = Result<T, SimError>;
