//! Structural-sharing statistics for the BDD engine.
//!
//! Builds the same parity formula in two different association orders and
//! shows that both land on one canonical handle, then reports how much the
//! interning store and the memo cache absorbed along the way.
//!
//! Run with:
//! ```bash
//! cargo run --release --example sharing_stats -- [max atoms]
//! ```

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use termdd::bdd::Bdd;

#[derive(Debug, Parser)]
#[command(about = "Structural-sharing statistics for the BDD engine")]
struct Cli {
    /// Largest number of atoms to build the parity chain over
    #[arg(default_value = "12")]
    max_atoms: usize,

    /// Log every ITE rule application
    #[arg(long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    println!(
        "{:>6} {:>8} {:>10} {:>10} {:>9}",
        "atoms", "terms", "hits", "misses", "hit rate"
    );
    println!("{}", "-".repeat(48));

    for n in (4..=cli.max_atoms).step_by(4) {
        let bdd = Bdd::default();
        let atoms: Vec<_> = (0..n).map(|i| bdd.atom(&format!("x{}", i))).collect();

        let mut forward = bdd.zero;
        for &x in &atoms {
            forward = bdd.xor(forward, x);
        }
        let mut backward = bdd.zero;
        for &x in atoms.iter().rev() {
            backward = bdd.xor(backward, x);
        }
        assert_eq!(forward, backward, "parity must canonicalize");

        let hits = bdd.cache_hits();
        let misses = bdd.cache_misses();
        let total = hits + misses;
        let hit_rate = if total > 0 {
            100.0 * hits as f64 / total as f64
        } else {
            0.0
        };

        println!(
            "{:>6} {:>8} {:>10} {:>10} {:>8.1}%",
            n,
            bdd.node_count(),
            hits,
            misses,
            hit_rate
        );
    }

    Ok(())
}
