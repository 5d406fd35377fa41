use std::{
    env,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use env_logger::Builder;
use memsched::{
    Sim, SimConfig,
    core::LineWriter,
    sim::{ClockMode, parse_jobs, random_jobs},
};

const USAGE: &str = "\
usage: memsched <input> [output] [--memory N] [--cpu1-budget N] [--cpus N]
                [--short-quantum N] [--long-quantum N]
                [--carry-clocks] [--sort-arrival] [--drain]
       memsched --generate <count> [seed]";

enum Command {
    Run {
        input: PathBuf,
        output: PathBuf,
        config: SimConfig,
    },
    Generate {
        count: usize,
        seed: u64,
    },
}

fn main() -> Result<()> {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    match parse_args(env::args().skip(1))? {
        Command::Generate { count, seed } => {
            for job in random_jobs(count, seed) {
                println!("{job}");
            }
            Ok(())
        }
        Command::Run {
            input,
            output,
            config,
        } => run(input, output, config),
    }
}

fn run(input: PathBuf, output: PathBuf, config: SimConfig) -> Result<()> {
    let reader = File::open(&input)
        .with_context(|| format!("Error opening input file {}", input.display()))?;
    let jobs = parse_jobs(BufReader::new(reader))
        .with_context(|| format!("Error reading {}", input.display()))?;

    let writer = File::create(&output)
        .with_context(|| format!("Error opening output file {}", output.display()))?;
    let mut sim = Sim::new(jobs, config, LineWriter::new(BufWriter::new(writer)))?;
    let outcome = sim.run()?;

    for pass in &outcome.passes {
        println!("{}", pass.summary_line(&sim.table));
    }
    for pass in &outcome.passes {
        let (Some(turnaround), Some(response)) = (
            pass.mean_turnaround(&sim.table),
            pass.mean_response(&sim.table),
        ) else {
            continue;
        };
        println!(
            "{} average turnaround {turnaround:.2} ticks, average response {response:.2} ticks",
            pass.kind.label().trim_end_matches(':'),
        );
    }
    if !outcome.waiting.is_empty() {
        println!("Still waiting: {}", outcome.waiting.join(", "));
    }

    sim.into_sink()
        .into_inner()
        .with_context(|| format!("Error writing {}", output.display()))?;
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut positional = Vec::new();
    let mut config = SimConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--generate" => {
                let count = number(args.next(), "--generate")?;
                let seed = match args.next() {
                    Some(seed) => seed.parse().context("seed must be an integer")?,
                    None => 0,
                };
                return Ok(Command::Generate { count, seed });
            }
            "--memory" => config.total_memory = number(args.next(), "--memory")?,
            "--cpu1-budget" => config.primary_budget = number(args.next(), "--cpu1-budget")?,
            "--cpus" => config.num_cpus = number(args.next(), "--cpus")?,
            "--short-quantum" => config.short_quantum = number(args.next(), "--short-quantum")?,
            "--long-quantum" => config.long_quantum = number(args.next(), "--long-quantum")?,
            "--carry-clocks" => config.clock_mode = ClockMode::Carried,
            "--sort-arrival" => config.sort_by_arrival = true,
            "--drain" => config.drain_rejected = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ => positional.push(PathBuf::from(&arg)),
        }
    }

    let mut positional = positional.into_iter();
    let Some(input) = positional.next() else {
        bail!("{USAGE}");
    };
    let output = positional
        .next()
        .unwrap_or_else(|| PathBuf::from("output.txt"));
    if positional.next().is_some() {
        bail!("too many arguments\n{USAGE}");
    }

    Ok(Command::Run {
        input,
        output,
        config,
    })
}

fn number<N: std::str::FromStr>(value: Option<String>, flag: &str) -> Result<N> {
    let Some(value) = value else {
        bail!("{flag} needs a value");
    };
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("{flag} expects a non-negative integer, got {value:?}"))
}
