use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything a resampling or filtering call can fail with.
///
/// Errors are detected at the call boundary (input validation) or at the
/// first numeric impossibility and handed straight back to the caller.
#[derive(Error, Debug)]
pub enum ResampleError {
    /// Malformed input: bad grid bounds, mismatched lengths, descending
    /// abscissae, broken offset tables.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input that is well-formed but makes a formula divide by zero or
    /// produce a meaningless width.
    #[error("numerically degenerate input: {0}")]
    NumericDegenerate(String),

    /// A scratch buffer could not be reserved.
    #[error("could not reserve scratch space for {requested} values")]
    ResourceExhausted { requested: usize },

    /// A serialized plan could not be decoded.
    #[error("invalid resample plan: {0}")]
    InvalidPlan(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResampleError>;
