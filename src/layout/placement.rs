//! Placement engine: validated insert and move
//!
//! Both operations check bounds and overlap against the live store and
//! either commit in full or return an error with the store untouched.

use tracing::debug;

use crate::catalog::Catalog;

use super::error::LayoutError;
use super::occupancy::{footprints, visual_footprint};
use super::overlap::first_overlap;
use super::store::LayoutStore;
use super::types::{Footprint, GateId, GridSpec, PlacedGate, Position};

/// Drop a new gate of type `gate_type` with its anchor at `(x, y)`
///
/// The new gate starts collapsed; inserting never displaces other gates.
pub fn try_insert<C: Catalog + ?Sized>(
    store: &mut LayoutStore,
    grid: &GridSpec,
    catalog: &C,
    gate_type: &str,
    position: Position,
) -> Result<PlacedGate, LayoutError> {
    let definition = catalog
        .definition_of(gate_type)
        .ok_or_else(|| LayoutError::UnknownGate(gate_type.to_string()))?;

    let candidate = Footprint::new(position.x, position.y, 1, definition.height);
    check_bounds(grid, &candidate)?;

    let layout = footprints(store, catalog);
    if let Some(with) = first_overlap(&candidate, None, &layout) {
        return Err(LayoutError::Overlap {
            footprint: candidate,
            with,
        });
    }

    let gate = store.push(gate_type, position, definition.height);
    debug!(id = %gate.id, gate_type, x = position.x, y = position.y, "inserted gate");
    Ok(gate)
}

/// Drag gate `id` so its anchor lands on `(x, y)`
///
/// The gate keeps its expansion state, so an expanded gate needs room for
/// its whole visual footprint at the destination.
pub fn try_move<C: Catalog + ?Sized>(
    store: &mut LayoutStore,
    grid: &GridSpec,
    catalog: &C,
    id: GateId,
    position: Position,
) -> Result<(), LayoutError> {
    let gate = store.get(id).ok_or(LayoutError::UnknownElement(id))?;
    let state = store.expansion_state(id);
    let candidate = visual_footprint(gate, catalog.definition_of(&gate.gate_type), state).at(position);
    check_bounds(grid, &candidate)?;

    let layout = footprints(store, catalog);
    if let Some(with) = first_overlap(&candidate, Some(id), &layout) {
        return Err(LayoutError::Overlap {
            footprint: candidate,
            with,
        });
    }

    store.relocate(id, position);
    debug!(%id, x = position.x, y = position.y, expanded = state.is_expanded(), "moved gate");
    Ok(())
}

pub(crate) fn check_bounds(grid: &GridSpec, footprint: &Footprint) -> Result<(), LayoutError> {
    if grid.contains(footprint) {
        Ok(())
    } else {
        Err(LayoutError::OutOfBounds {
            footprint: *footprint,
            rows: grid.rows(),
            columns: grid.columns(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GateCatalog, GateDefinition, SubComponent};

    fn catalog() -> GateCatalog {
        GateCatalog::new()
            .with_definition(GateDefinition::new("H", 1))
            .unwrap()
            .with_definition(GateDefinition::new("CNOT", 2))
            .unwrap()
            .with_definition(GateDefinition::new("WIDE", 1).with_components(vec![
                SubComponent::new("H", 0, 0),
                SubComponent::new("H", 2, 0),
            ]))
            .unwrap()
    }

    fn grid() -> GridSpec {
        GridSpec::new(3, 10).unwrap()
    }

    #[test]
    fn test_insert_then_collide() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        let gate = try_insert(&mut store, &grid(), &catalog, "H", Position::new(0, 0)).unwrap();
        assert_eq!(gate.position(), Position::new(0, 0));

        let err = try_insert(&mut store, &grid(), &catalog, "H", Position::new(0, 0)).unwrap_err();
        assert!(matches!(err, LayoutError::Overlap { with, .. } if with == gate.id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_too_tall_is_out_of_bounds() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        let err = try_insert(&mut store, &grid(), &catalog, "CNOT", Position::new(0, 2)).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_past_last_column() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        assert!(try_insert(&mut store, &grid(), &catalog, "H", Position::new(9, 0)).is_ok());
        let err = try_insert(&mut store, &grid(), &catalog, "H", Position::new(10, 0)).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
    }

    #[test]
    fn test_insert_unknown_type() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        let err = try_insert(&mut store, &grid(), &catalog, "NOPE", Position::new(0, 0)).unwrap_err();
        assert_eq!(err, LayoutError::UnknownGate("NOPE".to_string()));
    }

    #[test]
    fn test_insert_uses_collapsed_width() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        try_insert(&mut store, &grid(), &catalog, "WIDE", Position::new(0, 0)).unwrap();
        assert!(try_insert(&mut store, &grid(), &catalog, "H", Position::new(1, 0)).is_ok());
    }

    #[test]
    fn test_move_excludes_itself() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        let cnot = try_insert(&mut store, &grid(), &catalog, "CNOT", Position::new(3, 0)).unwrap();
        try_move(&mut store, &grid(), &catalog, cnot.id, Position::new(3, 1)).unwrap();
        let moved = store.get(cnot.id).unwrap();
        assert_eq!(moved.position(), Position::new(3, 1));
        assert_eq!((moved.logical_width, moved.logical_height), (1, 2));
    }

    #[test]
    fn test_rejected_move_leaves_store_unchanged() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        let a = try_insert(&mut store, &grid(), &catalog, "H", Position::new(0, 0)).unwrap();
        try_insert(&mut store, &grid(), &catalog, "CNOT", Position::new(1, 0)).unwrap();
        let before = store.clone();

        let err = try_move(&mut store, &grid(), &catalog, a.id, Position::new(1, 1)).unwrap_err();
        assert!(matches!(err, LayoutError::Overlap { .. }));
        let err = try_move(&mut store, &grid(), &catalog, a.id, Position::new(12, 0)).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_move_unknown_gate() {
        let catalog = catalog();
        let mut store = LayoutStore::new();
        let err = try_move(&mut store, &grid(), &catalog, GateId(9), Position::new(0, 0)).unwrap_err();
        assert_eq!(err, LayoutError::UnknownElement(GateId(9)));
    }
}
