pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use crate::core::{SchedCore, TraceEvent, TraceSink};
pub use error::SimError;
pub use scheduler::Discipline;
pub use sim::{Job, Sim, SimConfig, SimOutcome, simulate};
