//! Thrust planning demo.
//!
//! Samples the variational ansatz, seeds the refiner with the most frequent
//! bitstring and prints the refined schedule.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;

use vela_hybrid::{HybridConfig, ThrustResult, ThrustRunner};
use vela_demos::{
    create_spinner, format_controls, init_logging, print_header, print_info, print_result,
    print_section, print_success, print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-thrust")]
#[command(about = "Plan a thrust schedule from a sampled variational seed")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of time steps (one qubit each)
    #[arg(short = 'n', long)]
    steps: Option<u32>,

    /// Number of cost/mixing rounds
    #[arg(short, long)]
    depth: Option<u32>,

    /// Shots sampled from the circuit
    #[arg(short, long)]
    shots: Option<u32>,

    /// Random seed for the sampler
    #[arg(long, env = "VELA_SEED")]
    seed: Option<u64>,

    /// Write a JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    config: &'a HybridConfig,
    result: &'a ThrustResult,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = HybridConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(steps) = args.steps {
        config.problem.num_steps = steps;
    }
    if let Some(depth) = args.depth {
        config.ansatz.depth = depth;
    }
    if let Some(shots) = args.shots {
        config.sampler.shots = shots;
    }
    if args.seed.is_some() {
        config.sampler.seed = args.seed;
    }

    print_header("Hybrid Thrust Planning Demo");

    print_section("Problem Setup");
    print_result("Time steps", config.problem.num_steps);
    print_result("Fuel rate", config.problem.fuel_rate);
    print_result(
        "Velocity",
        format!(
            "{} → {}",
            config.problem.initial_velocity, config.problem.target_velocity
        ),
    );
    print_result("Ansatz depth", config.ansatz.depth);
    print_result("Shots", config.sampler.shots);
    match config.sampler.seed {
        Some(seed) => print_result("Seed", seed),
        None => print_result("Seed", "entropy"),
    }

    let runner = ThrustRunner::new(config.clone())?;
    let circuit = runner.build_circuit()?;

    print_section("Variational Circuit");
    print_result("Instructions", circuit.len());
    print_result("Depth", circuit.depth());
    print_result(
        "Parameters",
        circuit.parameters().into_iter().collect::<Vec<_>>().join(", "),
    );

    let spinner = create_spinner("Sampling and refining...");
    let result = runner.run();
    spinner.finish_and_clear();
    let result = result.context("thrust planning failed")?;

    print_section("Sampled Distribution");
    for (bits, count) in result.histogram.sorted().into_iter().take(5) {
        print_result(bits, count);
    }
    print_result("Distinct outcomes", result.histogram.len());
    print_result("Seed bitstring", &result.seed_bitstring);

    print_section("Refined Schedule");
    print_result("Controls", format_controls(&result.controls));
    print_result("Fuel used", format!("{:.6}", result.objective));
    print_result("Constraint residual", format!("{:.3e}", result.constraint_residual));
    let final_velocity = result.trajectory.last().copied().unwrap_or_default();
    print_result("Final velocity", format!("{final_velocity:.6}"));
    print_result("Iterations", result.iterations);
    print_result("Objective evaluations", result.evaluations);

    println!();
    if result.converged {
        print_success(&result.message);
    } else {
        print_warning(&result.message);
        print_info("The schedule above is the best point found.");
    }

    if let Some(path) = &args.report {
        let report = Report {
            generated_at: Utc::now(),
            config: &config,
            result: &result,
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
        print_info(&format!("Report written to {}", path.display()));
    }

    Ok(())
}
