pub mod config;
pub mod driver;
pub mod job;
pub mod workload;

pub use config::{ClockMode, SimConfig};
pub use driver::{Sim, SimOutcome, simulate};
pub use job::{Job, parse_jobs};
pub use workload::random_jobs;
