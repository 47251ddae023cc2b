//! Core types for the grid layout

use std::fmt;

use super::error::LayoutError;

/// Number of qubit tracks in the default grid
pub const DEFAULT_ROWS: u32 = 3;

/// Number of time steps in the default grid
pub const DEFAULT_COLUMNS: u32 = 10;

/// Fixed grid dimensions for a layout session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    rows: u32,
    columns: u32,
}

impl GridSpec {
    /// Create a grid, rejecting zero dimensions
    pub fn new(rows: u32, columns: u32) -> Result<Self, LayoutError> {
        if rows == 0 || columns == 0 {
            return Err(LayoutError::InvalidGrid { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    /// Qubit tracks
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Time steps
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Check that a footprint lies entirely inside `[0, columns) × [0, rows)`
    pub fn contains(&self, footprint: &Footprint) -> bool {
        footprint.width >= 1
            && footprint.height >= 1
            && footprint.right() <= self.columns
            && footprint.bottom() <= self.rows
    }

    /// Set the number of rows
    pub fn with_rows(self, rows: u32) -> Result<Self, LayoutError> {
        Self::new(rows, self.columns)
    }

    /// Set the number of columns
    pub fn with_columns(self, columns: u32) -> Result<Self, LayoutError> {
        Self::new(self.rows, columns)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
}

impl Cell {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Anchor position of a gate: column `x`, row `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular cell footprint anchored at `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the rightmost column
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// One past the lowest row
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Same footprint anchored elsewhere
    pub fn at(&self, position: Position) -> Footprint {
        Footprint::new(position.x, position.y, self.width, self.height)
    }

    /// Check whether a cell lies inside this footprint
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= self.x && cell.col < self.right() && cell.row >= self.y && cell.row < self.bottom()
    }

    /// Check whether the row spans intersect
    pub fn rows_overlap(&self, other: &Footprint) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }

    /// Check whether the column spans intersect
    pub fn columns_overlap(&self, other: &Footprint) -> bool {
        self.x < other.right() && other.x < self.right()
    }

    /// Every covered cell, column-major
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.x..self.right())
            .flat_map(move |col| (self.y..self.bottom()).map(move |row| Cell::new(col, row)))
    }
}

/// Stable identifier of a placed gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(pub u64);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A gate placed on the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedGate {
    pub id: GateId,
    /// Catalog type this gate was created from
    pub gate_type: String,
    pub x: u32,
    pub y: u32,
    /// Always 1; expansion widens the visual footprint only
    pub logical_width: u32,
    /// Rows spanned, copied from the definition at creation
    pub logical_height: u32,
}

impl PlacedGate {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Whether a gate shows its compact or its inspected view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpansionState {
    #[default]
    Collapsed,
    Expanded,
}

impl ExpansionState {
    pub fn is_expanded(self) -> bool {
        matches!(self, ExpansionState::Expanded)
    }
}

impl From<bool> for ExpansionState {
    fn from(expanded: bool) -> Self {
        if expanded {
            ExpansionState::Expanded
        } else {
            ExpansionState::Collapsed
        }
    }
}

impl fmt::Display for ExpansionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionState::Collapsed => write!(f, "collapsed"),
            ExpansionState::Expanded => write!(f, "expanded"),
        }
    }
}

/// Gates displaced by one expansion and where they stood before
///
/// Entries keep the order in which gates were displaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftRecord {
    displaced: Vec<(GateId, Position)>,
}

impl ShiftRecord {
    pub fn new(displaced: Vec<(GateId, Position)>) -> Self {
        Self { displaced }
    }

    pub fn is_empty(&self) -> bool {
        self.displaced.is_empty()
    }

    pub fn len(&self) -> usize {
        self.displaced.len()
    }

    /// Pre-shift position of a displaced gate
    pub fn original_position(&self, id: GateId) -> Option<Position> {
        self.displaced
            .iter()
            .find(|(displaced, _)| *displaced == id)
            .map(|(_, pos)| *pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(GateId, Position)> {
        self.displaced.iter()
    }

    /// Drop a gate from the record, returning whether it was listed
    pub(crate) fn forget(&mut self, id: GateId) -> bool {
        let before = self.displaced.len();
        self.displaced.retain(|(displaced, _)| *displaced != id);
        self.displaced.len() != before
    }
}
