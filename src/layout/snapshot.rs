//! Read-only snapshots of a layout, for renderers
//!
//! The `Display` impl draws the grid as text, one line per qubit track:
//! the gate type at a gate's anchor, `|` in the rest of a collapsed gate,
//! sub-component types inside an expanded gate with `~` filling the gaps,
//! and `.` for free cells.

use std::fmt;

use crate::catalog::Catalog;

use super::occupancy::{expanded_components, visual_footprint, PlacedComponent};
use super::store::LayoutStore;
use super::types::{Cell, ExpansionState, Footprint, GateId, GridSpec, PlacedGate};

const CELL_WIDTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub gate: PlacedGate,
    pub state: ExpansionState,
    /// Cells the gate covers right now
    pub footprint: Footprint,
    /// Sub-components on the grid, empty unless expanded
    pub components: Vec<PlacedComponent>,
}

/// Every gate with its expansion state, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: GridSpec,
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn capture<C: Catalog + ?Sized>(store: &LayoutStore, grid: &GridSpec, catalog: &C) -> Self {
        let entries = store
            .gates()
            .map(|gate| {
                let definition = catalog.definition_of(&gate.gate_type);
                let state = store.expansion_state(gate.id);
                let components = match (definition, state) {
                    (Some(def), ExpansionState::Expanded) => expanded_components(gate, def),
                    _ => Vec::new(),
                };
                SnapshotEntry {
                    gate: gate.clone(),
                    state,
                    footprint: visual_footprint(gate, definition, state),
                    components,
                }
            })
            .collect();
        Self { grid: *grid, entries }
    }

    pub fn get(&self, id: GateId) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|entry| entry.gate.id == id)
    }

    /// `(gate, state)` pairs in insertion order
    pub fn states(&self) -> impl Iterator<Item = (&PlacedGate, ExpansionState)> {
        self.entries.iter().map(|entry| (&entry.gate, entry.state))
    }

    fn label_at(&self, cell: Cell) -> &str {
        let Some(entry) = self.entries.iter().find(|e| e.footprint.contains(cell)) else {
            return ".";
        };
        if entry.state.is_expanded() && !entry.components.is_empty() {
            return match entry.components.iter().find(|c| c.footprint.contains(cell)) {
                Some(c) if c.footprint.x == cell.col && c.footprint.y == cell.row => c.gate.as_str(),
                Some(_) => "|",
                None => "~",
            };
        }
        if cell.col == entry.footprint.x && cell.row == entry.footprint.y {
            entry.gate.gate_type.as_str()
        } else {
            "|"
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.grid.rows() {
            let mut line = format!("q{row}:");
            for col in 0..self.grid.columns() {
                let label: String = self.label_at(Cell::new(col, row)).chars().take(CELL_WIDTH - 1).collect();
                line.push(' ');
                line.push_str(&format!("{label:<width$}", width = CELL_WIDTH - 1));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
