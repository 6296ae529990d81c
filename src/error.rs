//! Error types for benchmark runs and reporting

use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors surfaced by the benchmark runner
#[derive(Debug, Error)]
pub enum BenchError {
    /// A run was requested with an unusable argument
    #[error("invalid argument '{parameter}': {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: String,
    },

    /// A report was requested before anything was measured
    #[error("no benchmark results to report")]
    EmptyResultSet,

    /// The workload under test failed; the run was abandoned
    #[error("workload '{name}' failed")]
    Workload {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl BenchError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        BenchError::InvalidArgument {
            parameter,
            reason: reason.into(),
        }
    }

    /// Name of the workload that failed, if this is a workload failure
    pub fn workload_name(&self) -> Option<&str> {
        match self {
            BenchError::Workload { name, .. } => Some(name),
            _ => None,
        }
    }
}
