//! Error types for the layout engine

use thiserror::Error;

use super::types::{Footprint, GateId};

/// Errors that can occur while mutating a layout
///
/// Every variant is recoverable: the rejected operation simply does not take
/// effect and the layout is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Candidate footprint extends past the grid
    #[error(
        "footprint at ({}, {}) spanning {}x{} leaves the {columns}x{rows} grid",
        footprint.x, footprint.y, footprint.width, footprint.height
    )]
    OutOfBounds {
        footprint: Footprint,
        rows: u32,
        columns: u32,
    },

    /// Candidate footprint intersects another gate
    #[error("footprint at ({}, {}) overlaps gate {with}", footprint.x, footprint.y)]
    Overlap { footprint: Footprint, with: GateId },

    /// Expansion cannot make room without breaking the layout
    #[error("expanding gate {id} is blocked: {reason}")]
    Blocked { id: GateId, reason: String },

    /// No gate with this id is placed
    #[error("unknown gate {0}")]
    UnknownElement(GateId),

    /// Catalog has no definition for this gate type
    #[error("unknown gate type '{0}'")]
    UnknownGate(String),

    /// Grid dimensions must be positive
    #[error("invalid grid {columns}x{rows}: dimensions must be positive")]
    InvalidGrid { rows: u32, columns: u32 },
}

impl LayoutError {
    /// Whether the caller should present transient "blocked" feedback
    pub fn is_blocked(&self) -> bool {
        matches!(self, LayoutError::Blocked { .. })
    }
}
