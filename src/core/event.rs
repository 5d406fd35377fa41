use std::fmt;

use crate::core::{CpuId, Ticks};

/// One line of the run trace. `Display` renders the exact line text; CPUs
/// print 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Queued { name: String },
    Assigned { name: String, cpu: CpuId },
    Started {
        name: String,
        time: Ticks,
        cpu: CpuId,
    },
    Completes { name: String, time: Ticks },
    Terminated { name: String },
    Released { name: String },
    // Always followed by `Queued`
    Rejected { name: String },
    QuantumExpired { name: String },
}

impl TraceEvent {
    pub fn name(&self) -> &str {
        match self {
            Self::Queued { name }
            | Self::Assigned { name, .. }
            | Self::Started { name, .. }
            | Self::Completes { name, .. }
            | Self::Terminated { name }
            | Self::Released { name }
            | Self::Rejected { name }
            | Self::QuantumExpired { name } => name,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued { name } => {
                write!(f, "Process {name} is queued due to insufficient RAM.")
            }
            Self::Assigned { name, cpu } => {
                write!(f, "Process {name} is assigned to CPU-{}.", cpu + 1)
            }
            Self::Started { name, time, cpu } => {
                write!(f, "Process {name} starts at time {time} on CPU-{}.", cpu + 1)
            }
            Self::Completes { name, time } => {
                write!(f, "Process {name} completes at time {time}.")
            }
            Self::Terminated { name } => {
                write!(f, "Process {name} is completed and terminated.")
            }
            Self::Released { name } => write!(f, "Process {name} releases RAM."),
            Self::Rejected { name } => write!(
                f,
                "Process {name} could not be assigned due to insufficient RAM."
            ),
            Self::QuantumExpired { name } => write!(
                f,
                "Process {name} ran until the defined quantum time and is queued again because the process is not completed."
            ),
        }
    }
}
