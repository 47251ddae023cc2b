//! A layout session: one grid, one catalog, one store
//!
//! `Circuit` is what a presentation layer talks to. Each method is one user
//! intent (drop, drag-stop, expand toggle) applied synchronously against the
//! store; a rejected intent leaves the layout exactly as it was.

use crate::catalog::{Catalog, GateCatalog};
use crate::layout::{
    expansion, occupancy, overlap, placement, ExpansionState, GateId, GridSpec, LayoutError,
    LayoutStore, PlacedComponent, PlacedGate, Position, Snapshot,
};

#[derive(Debug, Clone)]
pub struct Circuit<C: Catalog = GateCatalog> {
    grid: GridSpec,
    catalog: C,
    store: LayoutStore,
}

impl Circuit<GateCatalog> {
    /// Empty circuit using the built-in catalog
    pub fn new(grid: GridSpec) -> Self {
        Self::with_catalog(grid, GateCatalog::builtin())
    }
}

impl Default for Circuit<GateCatalog> {
    fn default() -> Self {
        Self::new(GridSpec::default())
    }
}

impl<C: Catalog> Circuit<C> {
    pub fn with_catalog(grid: GridSpec, catalog: C) -> Self {
        Self {
            grid,
            catalog,
            store: LayoutStore::new(),
        }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Drop a new gate with its anchor at `(x, y)`
    pub fn insert(&mut self, gate_type: &str, x: u32, y: u32) -> Result<PlacedGate, LayoutError> {
        placement::try_insert(
            &mut self.store,
            &self.grid,
            &self.catalog,
            gate_type,
            Position::new(x, y),
        )
    }

    /// Drag an existing gate to `(x, y)`
    pub fn move_gate(&mut self, id: GateId, x: u32, y: u32) -> Result<(), LayoutError> {
        placement::try_move(&mut self.store, &self.grid, &self.catalog, id, Position::new(x, y))
    }

    /// Expand or collapse a gate
    ///
    /// Expansion shifts neighbours out of the way and fails with
    /// [`LayoutError::Blocked`] when they cannot all move.
    pub fn set_expanded(&mut self, id: GateId, expanded: bool) -> Result<(), LayoutError> {
        if expanded {
            expansion::request_expand(&mut self.store, &self.grid, &self.catalog, id)
        } else {
            expansion::request_collapse(&mut self.store, &self.grid, &self.catalog, id)
        }
    }

    /// Flip a gate's expansion, pre-flighting with [`Circuit::can_expand`]
    pub fn toggle_expanded(&mut self, id: GateId) -> Result<ExpansionState, LayoutError> {
        expansion::toggle(&mut self.store, &self.grid, &self.catalog, id)
    }

    /// Whether the cells of the gate's expanded view are free right now
    pub fn can_expand(&self, id: GateId) -> bool {
        expansion::can_expand(&self.store, &self.grid, &self.catalog, id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.store, &self.grid, &self.catalog)
    }

    pub fn gate(&self, id: GateId) -> Option<&PlacedGate> {
        self.store.get(id)
    }

    pub fn expansion_state(&self, id: GateId) -> ExpansionState {
        self.store.expansion_state(id)
    }

    /// Sub-components of a gate as they would sit on the grid when expanded
    pub fn expanded_components(&self, id: GateId) -> Vec<PlacedComponent> {
        self.store
            .get(id)
            .and_then(|gate| {
                self.catalog
                    .definition_of(&gate.gate_type)
                    .map(|def| occupancy::expanded_components(gate, def))
            })
            .unwrap_or_default()
    }

    /// Pairs of gates sharing a cell and gates off the grid
    ///
    /// Both lists are empty for every layout this type lets you build.
    pub fn violations(&self) -> (Vec<(GateId, GateId)>, Vec<GateId>) {
        let layout = occupancy::footprints(&self.store, &self.catalog);
        let outside = layout
            .iter()
            .filter(|(_, fp)| !self.grid.contains(fp))
            .map(|(id, _)| *id)
            .collect();
        (overlap::conflicts(&layout), outside)
    }
}
