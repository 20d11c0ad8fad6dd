//! Run one thermodynamics evaluation of an input case on local ranks.
//!
//! ```text
//! les case.ini --ranks 4
//! mpiexec -n 4 les case.ini --mpi      # built with --features mpi
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use les_rs::logging;
use les_rs::parallel::{Communicator, LocalWorld};
use les_rs::{Input, Model};

/// Domain-decomposed LES core
#[derive(Parser)]
#[command(name = "les")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate buoyancy tendencies of an LES case", long_about = None)]
struct Cli {
    /// Input file (.ini)
    input: PathBuf,

    /// Number of ranks; defaults to npx * npy from the input
    #[arg(short, long)]
    ranks: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Use the MPI processes of the launcher instead of local threads
    #[cfg(feature = "mpi")]
    #[arg(long, conflicts_with = "ranks")]
    mpi: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::parse_level(&cli.log_level))?;

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot read {}", cli.input.display()))?;

    #[cfg(feature = "mpi")]
    if cli.mpi {
        return run_mpi(&text);
    }

    let input: Input = text.parse()?;
    let npx: usize = input.get_item_or("master", "npx", None, 1)?;
    let npy: usize = input.get_item_or("master", "npy", None, 1)?;
    let ranks = cli.ranks.unwrap_or(npx * npy);
    if ranks == 0 {
        bail!("at least one rank is required");
    }

    // a failing rank hangs up, so peers waiting on it fail too and every
    // rank returns
    let results = LocalWorld::run(ranks, |comm| {
        let rank = comm.rank();
        let result = run_rank(&text, comm);
        if let Err(err) = &result {
            tracing::error!(rank, "{}", err);
        }
        result
    });

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        bail!("{} of {} ranks failed", failed, ranks);
    }
    Ok(())
}

/// One rank per MPI process. A failing rank aborts the whole run.
#[cfg(feature = "mpi")]
fn run_mpi(text: &str) -> Result<()> {
    use les_rs::parallel::MpiComm;

    let universe = mpi::initialize().context("MPI was already initialized")?;
    let world = MpiComm::new(universe.world());
    let rank = world.rank();
    if let Err(err) = run_rank(text, MpiComm::new(universe.world())) {
        tracing::error!(rank, "{}", err);
        world.abort(1);
    }
    Ok(())
}

/// Work of a single rank; every rank parses its own copy of the input.
fn run_rank<C: Communicator>(text: &str, comm: C) -> les_rs::Result<()> {
    let input: Input = text.parse()?;
    let mut model = Model::from_input(&input, comm)?;
    let reporter = *model.group.reporter();

    model.exec_thermo()?;
    for stats in model.tendency_stats()? {
        reporter.message(&format!("max |{}| = {:.6e}", stats.name, stats.max_abs));
    }

    for (block, item) in input.unused_items() {
        reporter.warning(&format!("item [{}] {} is not used", block, item));
    }
    if model.group.at_wall_clock_limit()? {
        reporter.warning("wall clock limit reached");
    }
    reporter.message(&format!(
        "done in {:.3} s",
        model.group.wall_clock_time()
    ));
    Ok(())
}
