use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::error::SimError;

pub type Ticks = u64;
pub type CpuId = usize;
pub type MemoryUnits = u64;

// CPU-1 and CPU-2 in the trace
pub const PRIMARY_CPU: CpuId = 0;
pub const SECONDARY_CPU: CpuId = 1;

new_key_type! {
    pub struct ProcessKey;
}

/// Fixed group deciding which discipline handles a process. Level 0 is the
/// highest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriorityClass {
    Realtime,
    Interactive,
    Normal,
    Batch,
}

impl PriorityClass {
    pub const ALL: [PriorityClass; 4] = [
        PriorityClass::Realtime,
        PriorityClass::Interactive,
        PriorityClass::Normal,
        PriorityClass::Batch,
    ];

    pub fn level(self) -> u8 {
        match self {
            Self::Realtime => 0,
            Self::Interactive => 1,
            Self::Normal => 2,
            Self::Batch => 3,
        }
    }

    /// CPU a process of this class runs on outside the admission pass.
    pub fn home_cpu(self) -> CpuId {
        match self {
            Self::Realtime => PRIMARY_CPU,
            _ => SECONDARY_CPU,
        }
    }
}

impl TryFrom<u8> for PriorityClass {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(level as usize).copied().ok_or(level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub name: String,
    pub arrival_time: Ticks,
    pub priority: PriorityClass,
    pub burst_time: Ticks,
    pub ram_required: MemoryUnits,
    // Carried through from input, never read by the scheduler
    pub cpu_usage: u64,
}

#[derive(Debug, Default)]
pub struct ProcessTable {
    records: SlotMap<ProcessKey, ProcessRecord>,
    order: Vec<ProcessKey>,
    by_name: FxHashMap<String, ProcessKey>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ProcessRecord) -> Result<ProcessKey, SimError> {
        let reason = if record.name.is_empty() {
            Some("name is empty")
        } else if record.name.contains(',') {
            Some("name contains a comma")
        } else if self.by_name.contains_key(&record.name) {
            Some("name is already in use")
        } else if record.burst_time == 0 {
            Some("burst time must be positive")
        } else if record.ram_required == 0 {
            Some("RAM requirement must be positive")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(SimError::AllocationFailure {
                name: record.name,
                reason: reason.to_string(),
            });
        }

        let name = record.name.clone();
        let key = self.records.insert(record);
        self.order.push(key);
        self.by_name.insert(name, key);
        Ok(key)
    }

    pub fn get(&self, key: ProcessKey) -> &ProcessRecord {
        &self.records[key]
    }

    pub fn find(&self, name: &str) -> Option<ProcessKey> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in input order (or arrival order after `sort_by_arrival`).
    pub fn iter(&self) -> impl Iterator<Item = (ProcessKey, &ProcessRecord)> + '_ {
        self.order.iter().map(|&key| (key, &self.records[key]))
    }

    pub fn of_class(
        &self,
        class: PriorityClass,
    ) -> impl Iterator<Item = (ProcessKey, &ProcessRecord)> + '_ {
        self.iter().filter(move |(_, record)| record.priority == class)
    }

    // Stable, so equal arrivals keep input order
    pub fn sort_by_arrival(&mut self) {
        let records = &self.records;
        self.order.sort_by_key(|&key| records[key].arrival_time);
    }
}

#[derive(Debug, Clone)]
pub struct CpuTimeline {
    pub id: CpuId,
    now: Ticks,
}

impl CpuTimeline {
    pub fn new(id: CpuId) -> Self {
        Self { id, now: 0 }
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    /// Idles forward to `time`. Never moves the clock back.
    pub fn advance_to(&mut self, time: Ticks) {
        self.now = self.now.max(time);
    }

    /// Runs `length` ticks of work from the current clock. Returns (start, end).
    pub fn occupy(&mut self, length: Ticks) -> Result<(Ticks, Ticks), SimError> {
        let start = self.now;
        let end = start
            .checked_add(length)
            .ok_or(SimError::TimelineOverflow { cpu: self.id })?;
        self.now = end;
        Ok((start, end))
    }
}

#[derive(Debug, Clone)]
pub struct Timelines {
    cpus: Vec<CpuTimeline>,
}

impl Timelines {
    pub fn new(num_cpus: usize) -> Self {
        Self {
            cpus: (0..num_cpus).map(CpuTimeline::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpus.is_empty()
    }

    pub fn now(&self, cpu: CpuId) -> Ticks {
        self.cpus[cpu].now()
    }

    pub fn occupy(&mut self, cpu: CpuId, length: Ticks) -> Result<(Ticks, Ticks), SimError> {
        self.cpus[cpu].occupy(length)
    }
}
