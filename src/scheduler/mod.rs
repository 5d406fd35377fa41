pub mod admission;
pub mod drain;
pub mod fcfs;
pub mod report;
pub mod round_robin;
pub mod sjf;

use crate::{
    core::{ProcessTable, SchedCore, Timelines, TraceSink},
    error::SimError,
};
pub use admission::{AdmissionPass, AdmissionPolicy};
pub use drain::DrainPass;
pub use fcfs::FcfsScheduler;
pub use report::{Dispatch, PassKind, PassReport};
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;

/// One pass over the process table. Passes run one after another against
/// the same `SchedCore`; each decides for itself which records it visits.
pub trait Discipline {
    fn kind(&self) -> PassKind;

    fn run<T: TraceSink>(
        &mut self,
        core: &mut SchedCore<T>,
        table: &ProcessTable,
        timelines: &mut Timelines,
    ) -> Result<PassReport, SimError>;
}
