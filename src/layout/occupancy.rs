//! Occupancy model: which cells a gate covers
//!
//! Collision checks always use the visual footprint. Logical width only
//! anchors the gate to its column.

use crate::catalog::{Catalog, GateDefinition};

use super::store::LayoutStore;
use super::types::{Cell, ExpansionState, Footprint, GateId, PlacedGate};

/// A sub-component of an expanded gate, placed on the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedComponent {
    pub gate: String,
    pub footprint: Footprint,
}

/// Footprint of a gate at rest: its anchor column, every spanned row
pub fn logical_footprint(gate: &PlacedGate) -> Footprint {
    Footprint::new(gate.x, gate.y, gate.logical_width, gate.logical_height)
}

pub fn logical_cells(gate: &PlacedGate) -> Vec<Cell> {
    logical_footprint(gate).cells().collect()
}

/// Columns a gate covers in the given state
///
/// Never less than the logical width of 1.
pub fn visual_width(definition: Option<&GateDefinition>, state: ExpansionState) -> u32 {
    match (definition, state) {
        (Some(def), ExpansionState::Expanded) => def.expanded_width().max(1),
        _ => 1,
    }
}

pub fn visual_footprint(
    gate: &PlacedGate,
    definition: Option<&GateDefinition>,
    state: ExpansionState,
) -> Footprint {
    Footprint::new(
        gate.x,
        gate.y,
        visual_width(definition, state).max(gate.logical_width),
        gate.logical_height,
    )
}

pub fn visual_cells(
    gate: &PlacedGate,
    definition: Option<&GateDefinition>,
    state: ExpansionState,
) -> Vec<Cell> {
    visual_footprint(gate, definition, state).cells().collect()
}

/// Current visual footprint of every gate in the store, in store order
pub fn footprints<C: Catalog + ?Sized>(store: &LayoutStore, catalog: &C) -> Vec<(GateId, Footprint)> {
    store
        .gates()
        .map(|gate| {
            let definition = catalog.definition_of(&gate.gate_type);
            (gate.id, visual_footprint(gate, definition, store.expansion_state(gate.id)))
        })
        .collect()
}

/// Where each sub-component lands when the gate is expanded
///
/// Component offsets are normalized against the smallest offset in the set,
/// so the leftmost/topmost component sits on the gate's anchor.
pub fn expanded_components(gate: &PlacedGate, definition: &GateDefinition) -> Vec<PlacedComponent> {
    if !definition.expandable {
        return Vec::new();
    }
    let (min_x, min_y) = definition.component_origin();
    definition
        .components
        .iter()
        .map(|component| PlacedComponent {
            gate: component.gate.clone(),
            footprint: Footprint::new(
                gate.x.saturating_add(offset(component.x, min_x)),
                gate.y.saturating_add(offset(component.y, min_y)),
                component.width,
                component.height,
            ),
        })
        .collect()
}

fn offset(value: i32, origin: i32) -> u32 {
    u32::try_from(i64::from(value) - i64::from(origin)).unwrap_or(u32::MAX)
}
