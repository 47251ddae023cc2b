//! Grid layout engine for placing gates on qubit tracks
//!
//! The store owns the layout; everything else is a function over a store
//! snapshot. Insert and move go through [`placement`], expand and collapse
//! through [`expansion`]. Both consult [`occupancy`] and [`overlap`] against
//! the live store before committing.

pub mod error;
pub mod expansion;
pub mod occupancy;
pub mod overlap;
pub mod placement;
pub mod snapshot;
pub mod store;
pub mod types;

pub use error::LayoutError;
pub use expansion::{can_expand, plan_expansion, request_collapse, request_expand, ExpansionPlan};
pub use occupancy::PlacedComponent;
pub use placement::{try_insert, try_move};
pub use snapshot::{Snapshot, SnapshotEntry};
pub use store::LayoutStore;
pub use types::*;
