//! Runs parsed commands against a [`Circuit`]

use std::collections::HashMap;

use tracing::{debug, trace};

use super::{Command, GateRef, Spanned};
use crate::catalog::{find_similar, Catalog, GateCatalog};
use crate::circuit::Circuit;
use crate::error::{ScriptError, Span};
use crate::layout::{ExpansionState, GateId, LayoutError, PlacedGate, Position, Snapshot};

/// What one command did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Inserted {
        gate: PlacedGate,
        name: Option<String>,
    },
    Moved {
        id: GateId,
        to: Position,
    },
    Expansion {
        id: GateId,
        state: ExpansionState,
    },
    Shown(Snapshot),
    Checked,
    /// A command the layout refused, skipped because of keep-going
    Rejected(ScriptError),
}

/// Executes commands in order, tracking `as` names
pub struct Interpreter<C: Catalog = GateCatalog> {
    circuit: Circuit<C>,
    names: HashMap<String, GateId>,
}

impl<C: Catalog> Interpreter<C> {
    pub fn new(circuit: Circuit<C>) -> Self {
        Self {
            circuit,
            names: HashMap::new(),
        }
    }

    pub fn circuit(&self) -> &Circuit<C> {
        &self.circuit
    }

    /// Gate bound to `name` by an earlier insert
    pub fn lookup(&self, name: &str) -> Option<GateId> {
        self.names.get(name).copied()
    }

    /// Run `commands` in order
    ///
    /// A refused command stops the run unless `keep_going` is set, in which
    /// case it is recorded as [`Outcome::Rejected`] and the run continues.
    /// A failed `check` always stops the run.
    pub fn run(
        &mut self,
        commands: &[Spanned<Command>],
        keep_going: bool,
    ) -> Result<Vec<Outcome>, ScriptError> {
        let mut outcomes = Vec::with_capacity(commands.len());
        for command in commands {
            match self.execute(command) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err @ ScriptError::Inconsistent { .. }) => return Err(err),
                Err(err) if keep_going => {
                    debug!(error = %err, "skipping refused command");
                    outcomes.push(Outcome::Rejected(err));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(outcomes)
    }

    /// Execute a single command
    pub fn execute(&mut self, command: &Spanned<Command>) -> Result<Outcome, ScriptError> {
        trace!(?command.node, "execute");
        let span = command.span.clone();
        match &command.node {
            Command::Insert {
                gate_type,
                x,
                y,
                name,
            } => {
                let gate = self
                    .circuit
                    .insert(&gate_type.node, *x, *y)
                    .map_err(|err| self.rejected(gate_type.span.clone(), err))?;
                if let Some(name) = name {
                    if let Some(previous) = self.names.insert(name.node.clone(), gate.id) {
                        debug!(name = %name.node, %previous, id = %gate.id, "name rebound");
                    }
                }
                Ok(Outcome::Inserted {
                    gate,
                    name: name.as_ref().map(|n| n.node.clone()),
                })
            }
            Command::Move { gate, x, y } => {
                let id = self.resolve(gate)?;
                self.circuit
                    .move_gate(id, *x, *y)
                    .map_err(|err| self.rejected(span, err))?;
                Ok(Outcome::Moved {
                    id,
                    to: Position::new(*x, *y),
                })
            }
            Command::Expand(gate) | Command::Collapse(gate) => {
                let id = self.resolve(gate)?;
                let expanded = matches!(command.node, Command::Expand(_));
                self.circuit
                    .set_expanded(id, expanded)
                    .map_err(|err| self.rejected(span, err))?;
                Ok(Outcome::Expansion {
                    id,
                    state: self.circuit.expansion_state(id),
                })
            }
            Command::Toggle(gate) => {
                let id = self.resolve(gate)?;
                let state = self
                    .circuit
                    .toggle_expanded(id)
                    .map_err(|err| self.rejected(span, err))?;
                Ok(Outcome::Expansion { id, state })
            }
            Command::Show => Ok(Outcome::Shown(self.circuit.snapshot())),
            Command::Check => self.check(span),
        }
    }

    fn resolve(&self, gate: &Spanned<GateRef>) -> Result<GateId, ScriptError> {
        match &gate.node {
            GateRef::Id(id) => Ok(*id),
            GateRef::Name(name) => self.lookup(name).ok_or_else(|| ScriptError::UnknownReference {
                span: gate.span.clone(),
                name: name.clone(),
            }),
        }
    }

    fn rejected(&self, span: Span, source: LayoutError) -> ScriptError {
        let suggestions = match &source {
            LayoutError::UnknownGate(name) => {
                find_similar(&self.circuit.catalog().gate_types(), name, 2)
                    .into_iter()
                    .map(String::from)
                    .collect()
            }
            _ => Vec::new(),
        };
        ScriptError::Rejected {
            span,
            source,
            suggestions,
        }
    }

    fn check(&self, span: Span) -> Result<Outcome, ScriptError> {
        let (conflicts, outside) = self.circuit.violations();
        let mut problems: Vec<String> = conflicts
            .iter()
            .map(|(a, b)| format!("{a} overlaps {b}"))
            .collect();
        problems.extend(outside.iter().map(|id| format!("{id} leaves the grid")));
        if problems.is_empty() {
            Ok(Outcome::Checked)
        } else {
            Err(ScriptError::Inconsistent {
                span,
                detail: problems.join(", "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout::GridSpec;
    use crate::script::parse;

    fn run(source: &str, keep_going: bool) -> (Interpreter, Result<Vec<Outcome>, ScriptError>) {
        let commands = parse(source).expect("Should parse");
        let mut interpreter = Interpreter::new(Circuit::new(GridSpec::new(3, 10).unwrap()));
        let result = interpreter.run(&commands, keep_going);
        (interpreter, result)
    }

    #[test]
    fn test_named_gates() {
        let (interp, result) = run("insert BELL 0 0 as bell\ninsert H 2 0\nexpand bell\n", false);
        let outcomes = result.unwrap();
        let bell = interp.lookup("bell").unwrap();
        assert_eq!(
            outcomes[2],
            Outcome::Expansion {
                id: bell,
                state: ExpansionState::Expanded
            }
        );
        assert_eq!(interp.circuit().expansion_state(bell), ExpansionState::Expanded);
    }

    #[test]
    fn test_ids_address_gates() {
        let (interp, result) = run("insert H 0 0\nmove g1 4 2\n", false);
        assert_eq!(
            result.unwrap()[1],
            Outcome::Moved {
                id: GateId(1),
                to: Position::new(4, 2)
            }
        );
        assert_eq!(
            interp.circuit().gate(GateId(1)).unwrap().position(),
            Position::new(4, 2)
        );
    }

    #[test]
    fn test_rejection_stops_run() {
        let (interp, result) = run("insert H 0 0\ninsert X 0 0\ninsert Y 1 0\n", false);
        let err = result.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.span(), &(20..21));
        assert_eq!(interp.circuit().store().len(), 1);
    }

    #[test]
    fn test_keep_going_records_rejections() {
        let (interp, result) = run("insert H 0 0\ninsert X 0 0\ninsert Y 1 0\n", true);
        let outcomes = result.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[1], Outcome::Rejected(_)));
        assert_eq!(interp.circuit().store().len(), 2);
    }

    #[test]
    fn test_unknown_name() {
        let (_, result) = run("expand nobody\n", false);
        assert_eq!(
            result.unwrap_err(),
            ScriptError::UnknownReference {
                span: 7..13,
                name: "nobody".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_gate_type_suggests() {
        let (_, result) = run("insert CNOTT 0 0\n", false);
        match result.unwrap_err() {
            ScriptError::Rejected { suggestions, .. } => {
                assert_eq!(suggestions.first().map(String::as_str), Some("CNOT"));
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_toggle_and_check() {
        let (_, result) = run("insert GHZ 0 0 as ghz\ntoggle ghz\ncheck\ntoggle ghz\ncheck\n", false);
        let outcomes = result.unwrap();
        assert!(matches!(
            outcomes[1],
            Outcome::Expansion {
                state: ExpansionState::Expanded,
                ..
            }
        ));
        assert_eq!(outcomes[2], Outcome::Checked);
        assert!(matches!(
            outcomes[3],
            Outcome::Expansion {
                state: ExpansionState::Collapsed,
                ..
            }
        ));
    }

    #[test]
    fn test_show_captures_snapshot() {
        let (_, result) = run("insert H 1 1\nshow\n", false);
        match &result.unwrap()[1] {
            Outcome::Shown(snapshot) => assert_eq!(snapshot.entries.len(), 1),
            other => panic!("Expected snapshot, got {:?}", other),
        }
    }
}
