//! Entangled-pair key agreement demo.

use anyhow::Result;
use clap::Parser;

use vela_demos::protocols::EntangledKeyExchange;
use vela_demos::{
    create_progress_bar, init_logging, print_header, print_info, print_result, print_section,
    print_success, print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-keygen")]
#[command(about = "Simulate key agreement over entangled pairs")]
struct Args {
    /// Number of entangled pairs to measure
    #[arg(short, long, default_value = "32")]
    rounds: usize,

    /// Random seed for basis choice and measurement
    #[arg(long)]
    seed: Option<u64>,

    /// Show the circuit of the first round
    #[arg(long)]
    show_circuit: bool,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn bits(key: &[u8]) -> String {
    key.iter().map(|b| if *b == 1 { '1' } else { '0' }).collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    print_header("Entangled Key Agreement Demo");

    print_section("Protocol");
    println!("  Each round prepares a Bell pair (H, CX).");
    println!("  Alice and Bob pick Z or X at random and measure once.");
    println!("  Only rounds with matching bases keep their bit.");

    let mut exchange = EntangledKeyExchange::new(args.rounds, args.seed)?;
    let pb = create_progress_bar(args.rounds as u64, "Measuring pairs...");
    let report = exchange.run_with_progress(|_| pb.inc(1))?;
    pb.finish_with_message("Measurement complete");

    if args.show_circuit {
        if let Some(first) = report.rounds.first() {
            print_section("First Round Circuit");
            let circuit = EntangledKeyExchange::round_circuit(first.alice_basis, first.bob_basis)?;
            println!("{circuit}");
        }
    }

    print_section("Rounds");
    for (i, r) in report.rounds.iter().enumerate().take(16) {
        let mark = if r.is_sifted() { "keep" } else { "drop" };
        println!(
            "  {:>3}  {}/{}  {} {}  {}",
            i, r.alice_basis, r.bob_basis, r.alice_bit, r.bob_bit, mark
        );
    }
    if report.rounds.len() > 16 {
        println!("  ... {} more", report.rounds.len() - 16);
    }

    print_section("Sifted Keys");
    print_result("Alice", bits(&report.alice_key));
    print_result("Bob", bits(&report.bob_key));
    print_result("Key length", report.alice_key.len());
    print_result("Mismatch rate", format!("{:.1}%", report.mismatch_rate * 100.0));

    println!();
    if report.keys_match() {
        print_success("Keys match. Shared key established.");
    } else {
        print_warning("Keys differ. Possible eavesdropping.");
    }
    print_info("Error correction and privacy amplification are not applied.");

    Ok(())
}
