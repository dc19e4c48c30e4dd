//! zxport Command-Line Interface
//!
//! Converts OpenQASM 2.0 files through the zxport circuit IR.
//!
//! ```text
//! zxport convert -i bell.qasm -o out.qasm --no-y --bind theta=0.5
//! zxport inspect -i bell.qasm --json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{common, convert, inspect, version};

/// zxport - OpenQASM 2.0 import, rewriting and export
#[derive(Parser, Debug)]
#[command(name = "zxport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a circuit and export it again as OpenQASM 2.0
    Convert {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Accept input without the OPENQASM header
        #[arg(long)]
        relaxed: bool,

        /// Rewrite Y and Ry gates into X and Z rotations
        #[arg(long = "no-y")]
        no_y: bool,

        /// Bind a free variable (repeatable)
        #[arg(short, long = "bind", value_name = "NAME=VALUE", value_parser = common::parse_binding)]
        bind: Vec<(String, f64)>,

        /// JSON file of variable bindings: {"name": value, ...}
        #[arg(long, value_name = "FILE")]
        bindings: Option<PathBuf>,
    },

    /// Summarize an OpenQASM 2.0 file
    Inspect {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Accept input without the OPENQASM header
        #[arg(long)]
        relaxed: bool,

        /// Print the gate list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            relaxed,
            no_y,
            bind,
            bindings,
        } => convert::execute(
            &input,
            output.as_deref(),
            relaxed,
            no_y,
            &bind,
            bindings.as_deref(),
        ),

        Commands::Inspect {
            input,
            relaxed,
            json,
        } => inspect::execute(&input, relaxed, json),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
