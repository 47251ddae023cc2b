//! Circuit Grid - an occupancy-aware layout engine for quantum circuit editors
//!
//! Gates sit on a grid of qubit tracks (rows) and time steps (columns). The
//! engine accepts or rejects drops and drags so that no two gates ever share
//! a cell, and expands composite gates in place by shifting their neighbours
//! right, putting them back on collapse.
//!
//! # Example
//!
//! ```rust
//! use circuit_grid::{Circuit, GridSpec};
//!
//! let mut circuit = Circuit::new(GridSpec::new(3, 10).unwrap());
//! let bell = circuit.insert("BELL", 0, 0).unwrap().id;
//! let h = circuit.insert("H", 1, 0).unwrap().id;
//!
//! circuit.set_expanded(bell, true).unwrap();
//! assert_eq!(circuit.gate(h).unwrap().x, 2);
//!
//! circuit.set_expanded(bell, false).unwrap();
//! assert_eq!(circuit.gate(h).unwrap().x, 1);
//! ```

pub mod catalog;
pub mod circuit;
pub mod error;
pub mod layout;
pub mod script;

pub use catalog::{Catalog, CatalogError, GateCatalog, GateDefinition, SubComponent};
pub use circuit::Circuit;
pub use error::ScriptError;
pub use layout::{
    ExpansionState, Footprint, GateId, GridSpec, LayoutError, LayoutStore, PlacedGate, Position,
    ShiftRecord, Snapshot,
};
pub use script::{parse, Command, Interpreter, Outcome};

use thiserror::Error;

/// Errors that can occur while running a script
#[derive(Debug, Error)]
pub enum RunError {
    /// The script did not parse
    #[error("parse errors: {}", format_script_errors(.0))]
    Parse(Vec<ScriptError>),

    /// A command failed while running
    #[error("{0}")]
    Script(#[from] ScriptError),
}

impl From<Vec<ScriptError>> for RunError {
    fn from(errors: Vec<ScriptError>) -> Self {
        RunError::Parse(errors)
    }
}

impl RunError {
    /// All script errors carried, for reporting against the source
    pub fn script_errors(&self) -> Vec<&ScriptError> {
        match self {
            RunError::Parse(errors) => errors.iter().collect(),
            RunError::Script(err) => vec![err],
        }
    }
}

fn format_script_errors(errors: &[ScriptError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for running a script
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Grid dimensions
    pub grid: GridSpec,
    /// Gate definitions
    pub catalog: GateCatalog,
    /// Record refused commands and carry on instead of stopping
    pub keep_going: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            catalog: GateCatalog::builtin(),
            keep_going: false,
        }
    }
}

impl RunConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid dimensions
    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    /// Set the gate catalog
    pub fn with_catalog(mut self, catalog: GateCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Enable or disable keep-going mode
    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }
}

/// Result of a complete run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// One entry per command, in order
    pub outcomes: Vec<Outcome>,
    /// The layout after the last command
    pub snapshot: Snapshot,
}

impl RunReport {
    /// Commands refused under keep-going
    pub fn rejections(&self) -> impl Iterator<Item = &ScriptError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            Outcome::Rejected(err) => Some(err),
            _ => None,
        })
    }
}

/// Run a script on the default 3x10 grid with the built-in catalog
///
/// # Example
///
/// ```rust
/// use circuit_grid::run;
///
/// let report = run("insert CNOT 0 0\ninsert H 1 0\n").unwrap();
/// assert_eq!(report.snapshot.entries.len(), 2);
/// ```
pub fn run(source: &str) -> Result<RunReport, RunError> {
    run_with_config(source, RunConfig::new())
}

/// Run a script with custom configuration
///
/// # Example
///
/// ```rust
/// use circuit_grid::{run_with_config, GridSpec, RunConfig};
///
/// let config = RunConfig::new()
///     .with_grid(GridSpec::new(2, 4).unwrap())
///     .with_keep_going(true);
///
/// let report = run_with_config("insert H 9 0\ninsert H 3 1\n", config).unwrap();
/// assert_eq!(report.rejections().count(), 1);
/// ```
pub fn run_with_config(source: &str, config: RunConfig) -> Result<RunReport, RunError> {
    let commands = parse(source)?;

    let circuit = Circuit::with_catalog(config.grid, config.catalog);
    let mut interpreter = Interpreter::new(circuit);
    let outcomes = interpreter.run(&commands, config.keep_going)?;

    Ok(RunReport {
        outcomes,
        snapshot: interpreter.circuit().snapshot(),
    })
}
