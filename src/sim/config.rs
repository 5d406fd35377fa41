use crate::{
    core::{MemoryUnits, Ticks},
    error::SimError,
};

pub const DEFAULT_TOTAL_MEMORY: MemoryUnits = 2048;
pub const DEFAULT_PRIMARY_BUDGET: MemoryUnits = 512;
pub const DEFAULT_NUM_CPUS: usize = 2;
pub const DEFAULT_SHORT_QUANTUM: Ticks = 8;
pub const DEFAULT_LONG_QUANTUM: Ticks = 16;

/// How CPU clocks relate between passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Every pass starts its CPU clocks at 0.
    #[default]
    Independent,
    /// Admission, FCFS, round-robin and drain passes continue from the
    /// clocks the previous pass left. SJF still keeps its own clock.
    Carried,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub total_memory: MemoryUnits,
    /// CPU-1's admission quota; CPU-2 gets the rest.
    pub primary_budget: MemoryUnits,
    pub num_cpus: usize,
    pub short_quantum: Ticks,
    pub long_quantum: Ticks,
    pub clock_mode: ClockMode,
    pub sort_by_arrival: bool,
    pub drain_rejected: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            primary_budget: DEFAULT_PRIMARY_BUDGET,
            num_cpus: DEFAULT_NUM_CPUS,
            short_quantum: DEFAULT_SHORT_QUANTUM,
            long_quantum: DEFAULT_LONG_QUANTUM,
            clock_mode: ClockMode::Independent,
            sort_by_arrival: false,
            drain_rejected: false,
        }
    }
}

impl SimConfig {
    pub fn secondary_budget(&self) -> MemoryUnits {
        self.total_memory.saturating_sub(self.primary_budget)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let problem = if self.total_memory == 0 {
            Some("total memory must be positive".to_string())
        } else if self.primary_budget > self.total_memory {
            Some(format!(
                "CPU-1 budget {} exceeds total memory {}",
                self.primary_budget, self.total_memory
            ))
        } else if self.num_cpus < DEFAULT_NUM_CPUS {
            Some(format!("need at least 2 CPUs, got {}", self.num_cpus))
        } else if self.short_quantum == 0 || self.long_quantum == 0 {
            Some("quanta must be positive".to_string())
        } else {
            None
        };

        match problem {
            Some(problem) => Err(SimError::InvalidConfig(problem)),
            None => Ok(()),
        }
    }
}
