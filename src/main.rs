//! Circuit Grid CLI
//!
//! Usage:
//!   circuit-grid [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --catalog <FILE>   Gate catalog file (TOML format)
//!   -r, --rows <N>         Number of qubit tracks
//!   -C, --columns <N>      Number of time steps
//!   -k, --keep-going       Report refused commands and carry on
//!   -v, --verbose          Log layout decisions to stderr
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use circuit_grid::{run_with_config, GateCatalog, GridSpec, Outcome, RunConfig, ScriptError};

#[derive(Parser)]
#[command(name = "circuit-grid")]
#[command(about = "Occupancy-aware layout engine for quantum circuit grids")]
struct Cli {
    /// Script file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Gate catalog file (TOML format), replaces the built-in catalog
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Number of qubit tracks
    #[arg(short, long, default_value_t = 3)]
    rows: u32,

    /// Number of time steps
    #[arg(short = 'C', long, default_value_t = 10)]
    columns: u32,

    /// Report refused commands and carry on
    #[arg(short, long)]
    keep_going: bool,

    /// Log layout decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let grid = match GridSpec::default()
        .with_rows(cli.rows)
        .and_then(|grid| grid.with_columns(cli.columns))
    {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Load catalog
    let catalog = match &cli.catalog {
        Some(path) => match GateCatalog::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading catalog '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => GateCatalog::builtin(),
    };

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = RunConfig::new()
        .with_grid(grid)
        .with_catalog(catalog)
        .with_keep_going(cli.keep_going);
    match run_with_config(&source, config) {
        Ok(report) => {
            for outcome in &report.outcomes {
                match outcome {
                    Outcome::Shown(snapshot) => println!("{}", snapshot),
                    Outcome::Rejected(err) => report_error(err, &source, &filename),
                    _ => {}
                }
            }
            print!("{}", report.snapshot);
        }
        Err(e) => {
            for err in e.script_errors() {
                report_error(err, &source, &filename);
            }
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "circuit_grid=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn report_error(err: &ScriptError, source: &str, filename: &str) {
    eprint!("{}", err.format(source, filename));
}

fn print_intro() {
    println!(
        r#"Circuit Grid - occupancy-aware layout for quantum circuit grids

USAGE:
    circuit-grid [OPTIONS] [FILE]
    echo '<commands>' | circuit-grid

OPTIONS:
    -c, --catalog      Custom gate catalog (TOML file)
    -r, --rows         Number of qubit tracks (default 3)
    -C, --columns      Number of time steps (default 10)
    -k, --keep-going   Report refused commands and carry on
    -v, --verbose      Log layout decisions to stderr
    -h, --help         Print help

COMMANDS:
    insert <TYPE> <X> <Y> [as <NAME>]   Drop a gate (alias: drop)
    move <GATE> <X> <Y>                 Drag a gate (alias: drag)
    expand <GATE>                       Show a composite gate's contents
    collapse <GATE>                     Fold it back
    toggle <GATE>                       Flip expansion
    show                                Print the grid
    check                               Verify no gates overlap

    <GATE> is an id like g1 or a name bound with `as`.

QUICK START:
    printf 'insert BELL 0 0 as b\ninsert H 1 0\nexpand b\n' | circuit-grid"#
    );
}
