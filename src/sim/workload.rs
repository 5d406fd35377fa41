use rand::prelude::*;

use super::job::Job;

/// Reproducible random workload: `count` jobs named `P1..`, spread over all
/// four priority classes, with arrivals inside `0..2*count`.
pub fn random_jobs(count: usize, seed: u64) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    let horizon = (count as u64).saturating_mul(2).max(1);

    (1..=count)
        .map(|n| Job {
            name: format!("P{n}"),
            arrival_time: rng.random_range(0..horizon),
            priority: rng.random_range(0..4),
            burst_time: rng.random_range(1..=40),
            // Occasionally more than the whole default pool
            ram_required: if rng.random::<f64>() < 0.05 {
                rng.random_range(2049..=4096)
            } else {
                rng.random_range(16..=640)
            },
            cpu_usage: rng.random_range(1..=100),
        })
        .collect()
}
