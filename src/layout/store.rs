//! Layout store: the single source of truth for placed gates
//!
//! Reads are open to everyone. Writes are crate-private and each one applies
//! a whole, already validated operation.

use std::collections::HashMap;

use super::types::{ExpansionState, GateId, PlacedGate, Position, ShiftRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutStore {
    gates: Vec<PlacedGate>,
    expansion: HashMap<GateId, ExpansionState>,
    shifts: HashMap<GateId, ShiftRecord>,
    next_id: u64,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gates in insertion order
    pub fn gates(&self) -> impl Iterator<Item = &PlacedGate> {
        self.gates.iter()
    }

    pub fn get(&self, id: GateId) -> Option<&PlacedGate> {
        self.gates.iter().find(|gate| gate.id == id)
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Expansion state of a gate; unknown ids read as collapsed
    pub fn expansion_state(&self, id: GateId) -> ExpansionState {
        self.expansion.get(&id).copied().unwrap_or_default()
    }

    /// Shift record left by the expansion of `id`, if it displaced anything
    pub fn shift_record(&self, id: GateId) -> Option<&ShiftRecord> {
        self.shifts.get(&id)
    }

    /// Append a new gate with a fresh id
    pub(crate) fn push(&mut self, gate_type: &str, position: Position, height: u32) -> PlacedGate {
        self.next_id += 1;
        let gate = PlacedGate {
            id: GateId(self.next_id),
            gate_type: gate_type.to_string(),
            x: position.x,
            y: position.y,
            logical_width: 1,
            logical_height: height,
        };
        self.gates.push(gate.clone());
        gate
    }

    /// Move a gate the user dragged
    ///
    /// The gate stops being tracked by any shift record: it now has a home
    /// of its own and a later collapse must leave it there.
    pub(crate) fn relocate(&mut self, id: GateId, position: Position) {
        self.set_position(id, position);
        for record in self.shifts.values_mut() {
            record.forget(id);
        }
        self.shifts.retain(|_, record| !record.is_empty());
    }

    /// Mark `id` expanded, displacing gates as planned
    pub(crate) fn apply_expansion(
        &mut self,
        id: GateId,
        moves: &[(GateId, Position)],
        record: ShiftRecord,
    ) {
        for (moved, position) in moves {
            self.set_position(*moved, *position);
        }
        if record.is_empty() {
            self.shifts.remove(&id);
        } else {
            self.shifts.insert(id, record);
        }
        self.expansion.insert(id, ExpansionState::Expanded);
    }

    /// Mark `id` collapsed, putting displaced gates back and dropping its record
    pub(crate) fn apply_collapse(&mut self, id: GateId, restores: &[(GateId, Position)]) {
        for (moved, position) in restores {
            self.set_position(*moved, *position);
        }
        self.shifts.remove(&id);
        self.expansion.remove(&id);
    }

    fn set_position(&mut self, id: GateId, position: Position) {
        if let Some(gate) = self.gates.iter_mut().find(|gate| gate.id == id) {
            gate.x = position.x;
            gate.y = position.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_fresh_ids() {
        let mut store = LayoutStore::new();
        let a = store.push("H", Position::new(0, 0), 1);
        let b = store.push("CNOT", Position::new(1, 0), 2);
        assert_ne!(a.id, b.id);
        assert_eq!(b.logical_height, 2);
        assert_eq!(b.logical_width, 1);
        let order: Vec<_> = store.gates().map(|g| g.id).collect();
        assert_eq!(order, vec![a.id, b.id]);
    }

    #[test]
    fn test_absent_entries_read_as_defaults() {
        let store = LayoutStore::new();
        assert_eq!(store.expansion_state(GateId(42)), ExpansionState::Collapsed);
        assert!(store.shift_record(GateId(42)).is_none());
    }

    #[test]
    fn test_expansion_and_collapse_bookkeeping() {
        let mut store = LayoutStore::new();
        let x = store.push("X", Position::new(2, 1), 1);
        let y = store.push("Y", Position::new(4, 1), 1);

        let record = ShiftRecord::new(vec![(y.id, Position::new(4, 1))]);
        store.apply_expansion(x.id, &[(y.id, Position::new(6, 1))], record);
        assert_eq!(store.expansion_state(x.id), ExpansionState::Expanded);
        assert_eq!(store.get(y.id).map(|g| g.position()), Some(Position::new(6, 1)));
        assert_eq!(store.shift_record(x.id).map(|r| r.len()), Some(1));

        store.apply_collapse(x.id, &[(y.id, Position::new(4, 1))]);
        assert_eq!(store.expansion_state(x.id), ExpansionState::Collapsed);
        assert_eq!(store.get(y.id).map(|g| g.position()), Some(Position::new(4, 1)));
        assert!(store.shift_record(x.id).is_none());
    }

    #[test]
    fn test_empty_record_is_not_kept() {
        let mut store = LayoutStore::new();
        let x = store.push("X", Position::new(2, 1), 1);
        store.apply_expansion(x.id, &[], ShiftRecord::default());
        assert!(store.shift_record(x.id).is_none());
        assert!(store.expansion_state(x.id).is_expanded());
    }

    #[test]
    fn test_relocate_forgets_displacement() {
        let mut store = LayoutStore::new();
        let x = store.push("X", Position::new(2, 1), 1);
        let y = store.push("Y", Position::new(4, 1), 1);
        let record = ShiftRecord::new(vec![(y.id, Position::new(4, 1))]);
        store.apply_expansion(x.id, &[(y.id, Position::new(6, 1))], record);

        store.relocate(y.id, Position::new(9, 0));
        assert_eq!(store.get(y.id).map(|g| g.position()), Some(Position::new(9, 0)));
        assert!(store.shift_record(x.id).is_none());
    }
}
