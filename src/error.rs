use crate::core::CpuId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The record cannot be held in the process table.
    #[error("Process {name:?} cannot be represented: {reason}")]
    AllocationFailure { name: String, reason: String },

    #[error("Malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CPU-{} timeline overflowed", .cpu + 1)]
    TimelineOverflow { cpu: CpuId },

    #[error("Trace sink failed: {0}")]
    Io(#[from] std::io::Error),
}
