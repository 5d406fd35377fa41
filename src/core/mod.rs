pub mod driver;
pub mod event;
pub mod memory;
pub mod observer;
pub mod queue;
pub mod state;
pub mod trace;

pub use driver::SchedCore;
pub use event::TraceEvent;
pub use memory::{MemoryPool, Reservation};
pub use observer::Observer;
pub use queue::{ReadyQueue, RejectedQueue};
pub use state::{
    CpuId, CpuTimeline, MemoryUnits, PRIMARY_CPU, PriorityClass, ProcessKey, ProcessRecord,
    ProcessTable, SECONDARY_CPU, Ticks, Timelines,
};
pub use trace::{LineWriter, TraceSink};
