use log::info;

use super::{
    config::{ClockMode, SimConfig},
    job::Job,
};
use crate::{
    core::{PriorityClass, ProcessTable, SchedCore, Timelines, TraceEvent, TraceSink},
    error::SimError,
    scheduler::{
        AdmissionPass, AdmissionPolicy, Discipline, DrainPass, FcfsScheduler, PassReport,
        RoundRobinScheduler, SjfScheduler,
    },
};

#[derive(Debug, Clone)]
pub struct SimOutcome {
    /// In run order: admission, FCFS, SJF, short RR, long RR, then drain
    /// when enabled.
    pub passes: Vec<PassReport>,
    /// Names left in the rejected queue, oldest first.
    pub waiting: Vec<String>,
}

/// Runs the fixed pass sequence over one batch of jobs.
pub struct Sim<T: TraceSink> {
    pub core: SchedCore<T>,
    pub table: ProcessTable,
    config: SimConfig,
}

impl<T: TraceSink> Sim<T> {
    pub fn new(jobs: Vec<Job>, config: SimConfig, sink: T) -> Result<Self, SimError> {
        config.validate()?;

        let mut table = ProcessTable::new();
        for job in jobs {
            table.insert(job.into_record()?)?;
        }
        if config.sort_by_arrival {
            table.sort_by_arrival();
        }

        Ok(Self {
            core: SchedCore::new(config.total_memory, sink),
            table,
            config,
        })
    }

    pub fn run(&mut self) -> Result<SimOutcome, SimError> {
        let config = &self.config;
        let mut timelines = Timelines::new(config.num_cpus);
        let mut passes = Vec::new();

        let policy = AdmissionPolicy::new(config.primary_budget, config.secondary_budget());
        passes.push(self.run_pass(AdmissionPass::new(policy), &mut timelines)?);
        passes.push(self.run_pass(FcfsScheduler, &mut timelines)?);
        passes.push(self.run_pass(SjfScheduler, &mut timelines)?);

        let short = RoundRobinScheduler::new(PriorityClass::Normal, self.config.short_quantum);
        let long = RoundRobinScheduler::new(PriorityClass::Batch, self.config.long_quantum);
        passes.push(self.run_pass(short, &mut timelines)?);
        passes.push(self.run_pass(long, &mut timelines)?);

        if self.config.drain_rejected {
            passes.push(self.run_pass(DrainPass, &mut timelines)?);
        }

        let waiting = self
            .core
            .rejected()
            .iter()
            .map(|key| self.table.get(key).name.clone())
            .collect();
        info!(
            "run finished: {} trace lines, {} processes waiting",
            self.core.observer().steps(),
            self.core.rejected().len()
        );

        Ok(SimOutcome { passes, waiting })
    }

    fn run_pass<D: Discipline>(
        &mut self,
        mut pass: D,
        timelines: &mut Timelines,
    ) -> Result<PassReport, SimError> {
        if self.config.clock_mode == ClockMode::Independent {
            *timelines = Timelines::new(self.config.num_cpus);
        }
        pass.run(&mut self.core, &self.table, timelines)
    }

    pub fn into_sink(self) -> T {
        self.core.into_sink()
    }
}

/// Runs `jobs` and captures the trace in memory.
pub fn simulate(
    jobs: Vec<Job>,
    config: SimConfig,
) -> Result<(Vec<TraceEvent>, SimOutcome), SimError> {
    let mut sim = Sim::new(jobs, config, Vec::new())?;
    let outcome = sim.run()?;
    Ok((sim.into_sink(), outcome))
}
