//! Expansion scheduler: expand and collapse gates, shifting neighbours
//!
//! Expanding a gate widens its visual footprint to the span of its
//! sub-components. Gates standing in the way (in the new columns, on the
//! gate's rows or anywhere below them) are pushed right together, and the
//! positions they came from are kept in a [`ShiftRecord`] so that collapsing
//! puts them back.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::catalog::Catalog;

use super::error::LayoutError;
use super::occupancy::{expanded_components, footprints, visual_footprint, visual_width};
use super::overlap::{conflicts, first_overlap, first_overlap_by};
use super::store::LayoutStore;
use super::types::{ExpansionState, Footprint, GateId, GridSpec, Position, ShiftRecord};

/// A validated expansion, ready to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionPlan {
    pub id: GateId,
    /// Visual footprint of the gate once expanded
    pub footprint: Footprint,
    /// Final positions of displaced gates
    pub moves: Vec<(GateId, Position)>,
    /// Pre-shift positions of displaced gates
    pub record: ShiftRecord,
}

/// Work out which gates an expansion of `id` displaces, and check it fits
///
/// Returns `Ok(None)` for gates that have nothing to expand into.
pub fn plan_expansion<C: Catalog + ?Sized>(
    store: &LayoutStore,
    grid: &GridSpec,
    catalog: &C,
    id: GateId,
) -> Result<Option<ExpansionPlan>, LayoutError> {
    let gate = store.get(id).ok_or(LayoutError::UnknownElement(id))?;
    let definition = match catalog.definition_of(&gate.gate_type) {
        Some(def) if def.expandable => def,
        _ => return Ok(None),
    };

    let width = visual_width(Some(definition), ExpansionState::Expanded);
    let expanded = Footprint::new(gate.x, gate.y, width, gate.logical_height);
    let anchor = gate.x;
    let layout = footprints(store, catalog);

    // Gates already in the anchor column stay put. Everything else with a
    // cell in the new columns, on the expansion rows or below them, moves.
    let to_shift: Vec<(GateId, Footprint)> = layout
        .iter()
        .filter(|(other, fp)| *other != id && !(fp.x <= anchor && anchor < fp.right()))
        .filter(|(_, fp)| {
            fp.cells()
                .any(|cell| cell.col > anchor && cell.col < expanded.right() && cell.row >= expanded.y)
        })
        .copied()
        .collect();
    let shifting: HashSet<GateId> = to_shift.iter().map(|(other, _)| *other).collect();
    trace!(%id, width, displaced = to_shift.len(), "planning expansion");

    for (other, fp) in &to_shift {
        let probe = fp.at(Position::new(fp.x.saturating_add(width), fp.y));
        if probe.right() > grid.columns() {
            return Err(blocked(
                id,
                format!("gate {other} cannot be pushed past column {}", grid.columns()),
            ));
        }
        if let Some(with) =
            first_overlap_by(&probe, &layout, |g| g == id || shifting.contains(&g))
        {
            return Err(blocked(
                id,
                format!("gate {other} would be pushed into gate {with}"),
            ));
        }
    }

    // The anchor column already holds one unit of the expansion
    let moves: Vec<(GateId, Position)> = to_shift
        .iter()
        .map(|(other, fp)| (*other, Position::new(fp.x + width - 1, fp.y)))
        .collect();
    let record = ShiftRecord::new(
        to_shift
            .iter()
            .map(|(other, fp)| (*other, Position::new(fp.x, fp.y)))
            .collect(),
    );

    // The committed layout must still be valid on its own
    if !grid.contains(&expanded) {
        return Err(blocked(id, "expanded view does not fit on the grid".to_string()));
    }
    let prospective: Vec<(GateId, Footprint)> = layout
        .iter()
        .map(|(other, fp)| {
            if *other == id {
                return (*other, expanded);
            }
            match moves.iter().find(|(moved, _)| moved == other) {
                Some((_, position)) => (*other, fp.at(*position)),
                None => (*other, *fp),
            }
        })
        .collect();
    if let Some((a, b)) = conflicts(&prospective).first() {
        return Err(blocked(id, format!("gates {a} and {b} would overlap")));
    }
    if let Some((other, _)) = prospective.iter().find(|(_, fp)| !grid.contains(fp)) {
        return Err(blocked(id, format!("gate {other} would leave the grid")));
    }

    Ok(Some(ExpansionPlan {
        id,
        footprint: expanded,
        moves,
        record,
    }))
}

fn blocked(id: GateId, reason: String) -> LayoutError {
    LayoutError::Blocked { id, reason }
}

/// Expand gate `id`, displacing neighbours as needed
///
/// Gates that cannot expand, and gates already expanded, are left alone.
/// When the shift is infeasible the gate stays collapsed, nothing moves, and
/// [`LayoutError::Blocked`] is returned.
pub fn request_expand<C: Catalog + ?Sized>(
    store: &mut LayoutStore,
    grid: &GridSpec,
    catalog: &C,
    id: GateId,
) -> Result<(), LayoutError> {
    if store.get(id).is_none() {
        return Err(LayoutError::UnknownElement(id));
    }
    if store.expansion_state(id).is_expanded() {
        return Ok(());
    }

    match plan_expansion(store, grid, catalog, id) {
        Ok(Some(plan)) => {
            debug!(%id, width = plan.footprint.width, displaced = plan.moves.len(), "expanded gate");
            store.apply_expansion(id, &plan.moves, plan.record);
            Ok(())
        }
        Ok(None) => {
            trace!(%id, "gate has no expanded view");
            Ok(())
        }
        Err(err) => {
            warn!(%id, "{err}");
            Err(err)
        }
    }
}

/// Collapse gate `id` and return displaced gates to where they were
///
/// A displaced gate whose old spot has since been taken stays where it is.
pub fn request_collapse<C: Catalog + ?Sized>(
    store: &mut LayoutStore,
    grid: &GridSpec,
    catalog: &C,
    id: GateId,
) -> Result<(), LayoutError> {
    let gate = store.get(id).ok_or(LayoutError::UnknownElement(id))?;
    if !store.expansion_state(id).is_expanded() {
        return Ok(());
    }

    let collapsed = visual_footprint(
        gate,
        catalog.definition_of(&gate.gate_type),
        ExpansionState::Collapsed,
    );
    let current: Vec<(GateId, Footprint)> = footprints(store, catalog)
        .into_iter()
        .map(|(other, fp)| if other == id { (other, collapsed) } else { (other, fp) })
        .collect();

    let mut restores: Vec<(GateId, Position)> = store
        .shift_record(id)
        .map(|record| {
            record
                .iter()
                .filter(|(other, _)| store.get(*other).is_some())
                .copied()
                .collect()
        })
        .unwrap_or_default();

    // Drop restores that no longer fit until the remaining set is consistent
    loop {
        let target: Vec<(GateId, Footprint)> = current
            .iter()
            .map(|(other, fp)| match restores.iter().find(|(moved, _)| moved == other) {
                Some((_, position)) => (*other, fp.at(*position)),
                None => (*other, *fp),
            })
            .collect();
        let stuck: Vec<GateId> = restores
            .iter()
            .filter_map(|(other, _)| {
                let fp = target.iter().find(|(g, _)| g == other).map(|(_, fp)| *fp)?;
                let fits = grid.contains(&fp) && first_overlap(&fp, Some(*other), &target).is_none();
                (!fits).then_some(*other)
            })
            .collect();
        if stuck.is_empty() {
            break;
        }
        for other in &stuck {
            warn!(%id, gate = %other, "original position is taken, leaving gate in place");
        }
        restores.retain(|(other, _)| !stuck.contains(other));
    }

    debug!(%id, restored = restores.len(), "collapsed gate");
    store.apply_collapse(id, &restores);
    Ok(())
}

/// Whether the cells of the expanded view are free right now
///
/// Checks every sub-component cell against the other gates' current
/// footprints and the grid edge. This does not consider shifting; an
/// expansion may still be blocked when this returns true.
pub fn can_expand<C: Catalog + ?Sized>(
    store: &LayoutStore,
    grid: &GridSpec,
    catalog: &C,
    id: GateId,
) -> bool {
    let Some(gate) = store.get(id) else {
        return false;
    };
    let definition = match catalog.definition_of(&gate.gate_type) {
        Some(def) if def.expandable => def,
        _ => return true,
    };
    let layout = footprints(store, catalog);
    expanded_components(gate, definition)
        .iter()
        .all(|component| {
            grid.contains(&component.footprint)
                && first_overlap(&component.footprint, Some(id), &layout).is_none()
        })
}

/// Flip the expansion of gate `id` the way a toggle control does
///
/// Before expanding, the free-cells check runs first and a failure is
/// reported as [`LayoutError::Blocked`] without touching the layout.
/// Returns the state the gate ends up in.
pub fn toggle<C: Catalog + ?Sized>(
    store: &mut LayoutStore,
    grid: &GridSpec,
    catalog: &C,
    id: GateId,
) -> Result<ExpansionState, LayoutError> {
    if store.get(id).is_none() {
        return Err(LayoutError::UnknownElement(id));
    }
    if store.expansion_state(id).is_expanded() {
        request_collapse(store, grid, catalog, id)?;
    } else {
        if !can_expand(store, grid, catalog, id) {
            let err = blocked(id, "expanded view would cover occupied cells".to_string());
            warn!(%id, "{err}");
            return Err(err);
        }
        request_expand(store, grid, catalog, id)?;
    }
    Ok(store.expansion_state(id))
}
