//! Qubridge demo runner.
//!
//! Runs small circuits on a qulacs backend picked from the registry.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qubridge_adapter_qulacs::register_backends;
use qubridge_demos::{
    H2_GROUND_ENERGY, H2_OPTIMAL_THETA, minimum, print_header, print_result, print_section,
    scan_h2_energy,
};
use qubridge_hal::{Backend, BackendConfig, BackendRegistry, RunMode};
use qubridge_ir::Circuit;

#[derive(Parser)]
#[command(name = "qubridge-demo")]
#[command(about = "Run circuits on the qulacs backend")]
struct Cli {
    /// Backend to run on (qulacs, qulacs-gpu)
    #[arg(short, long, default_value = "qulacs", global = true)]
    backend: String,

    /// Execution library (cpu, gpu)
    #[arg(long, env = "QUBRIDGE_DEVICE", global = true)]
    device: Option<String>,

    /// Result type of the backend (statevector, density_matrix)
    #[arg(long, default_value = "statevector", global = true)]
    result_type: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a measured Bell pair
    Bell {
        /// Number of shots
        #[arg(short, long, default_value = "1000")]
        shots: usize,

        /// Sampling seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Scan the H2 ansatz energy
    H2 {
        /// Number of scan points
        #[arg(short, long, default_value = "21")]
        steps: usize,
    },
    /// List registered backends
    Backends,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let mut registry = BackendRegistry::new();
    register_backends(&mut registry);

    if let Commands::Backends = cli.command {
        print_header("Registered backends");
        for name in registry.available_backends() {
            println!("  {name}");
        }
        return Ok(());
    }

    let mut config = BackendConfig::new(cli.backend.as_str())
        .with_extra("result_type", cli.result_type.as_str().into());
    if let Some(device) = &cli.device {
        config = config.with_extra("device", device.as_str().into());
    }
    let backend = registry
        .create(&cli.backend, config)
        .with_context(|| format!("creating backend '{}'", cli.backend))?;

    match cli.command {
        Commands::Bell { shots, seed } => bell(backend.as_ref(), shots, seed),
        Commands::H2 { steps } => h2(backend.as_ref(), steps),
        Commands::Backends => Ok(()),
    }
}

fn bell(backend: &dyn Backend, shots: usize, seed: Option<u64>) -> anyhow::Result<()> {
    print_header("Bell pair sampling");
    let circuit = Circuit::bell()?;

    let mode = match seed {
        Some(seed) => RunMode::seeded_shots(shots, seed),
        None => RunMode::shots(shots),
    };
    let result = backend.process(&circuit, &mode)?;
    let counts = result.counts().context("backend returned no shots")?;

    print_section("Setup");
    print_result("Backend", backend.name());
    print_result("Shots", shots);
    if let Some(seed) = result.metadata.seed {
        print_result("Seed", seed);
    }

    print_section("Counts");
    for (bits, count) in counts.iter() {
        print_result(bits, count);
    }
    Ok(())
}

fn h2(backend: &dyn Backend, steps: usize) -> anyhow::Result<()> {
    print_header("H2 ground-state energy scan");
    let points = scan_h2_energy(backend, -0.5, 0.5, steps)?;
    let best = minimum(&points).context("empty scan")?;

    print_section("Setup");
    print_result("Backend", backend.name());
    print_result("Scan points", points.len());

    print_section("Energies");
    for point in &points {
        println!("  theta = {:+.4}  E = {:.8} Ha", point.theta, point.energy);
    }

    print_section("Result");
    print_result("Best theta", format!("{:+.6}", best.theta));
    print_result("Best energy", format!("{:.10} Ha", best.energy));
    print_result("Optimal theta", format!("{H2_OPTIMAL_THETA:+.6}"));
    print_result("Exact energy", format!("{H2_GROUND_ENERGY:.10} Ha"));
    print_result(
        "Error",
        format!("{:.2e} Ha", (best.energy - H2_GROUND_ENERGY).abs()),
    );
    Ok(())
}
