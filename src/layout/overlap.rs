//! Overlap detection between candidate footprints and placed gates

use super::types::{Footprint, GateId};

/// Check whether two footprints share a cell
///
/// Row and column spans are compared first; only when both intersect are the
/// actual cells compared.
pub fn footprints_intersect(a: &Footprint, b: &Footprint) -> bool {
    if !a.rows_overlap(b) || !a.columns_overlap(b) {
        return false;
    }
    a.cells().any(|cell| b.contains(cell))
}

/// First gate, in layout order, whose footprint intersects `candidate`
///
/// Gates for which `skip` returns true are ignored.
pub fn first_overlap_by<F>(
    candidate: &Footprint,
    layout: &[(GateId, Footprint)],
    skip: F,
) -> Option<GateId>
where
    F: Fn(GateId) -> bool,
{
    layout
        .iter()
        .filter(|(id, _)| !skip(*id))
        .find(|(_, footprint)| footprints_intersect(candidate, footprint))
        .map(|(id, _)| *id)
}

/// First gate other than `exclude` whose footprint intersects `candidate`
pub fn first_overlap(
    candidate: &Footprint,
    exclude: Option<GateId>,
    layout: &[(GateId, Footprint)],
) -> Option<GateId> {
    first_overlap_by(candidate, layout, |id| Some(id) == exclude)
}

/// Whether `candidate` conflicts with any gate other than `exclude`
pub fn overlaps(candidate: &Footprint, exclude: Option<GateId>, layout: &[(GateId, Footprint)]) -> bool {
    first_overlap(candidate, exclude, layout).is_some()
}

/// Pairs of gates whose footprints intersect
///
/// Used to audit a whole layout; a valid layout returns nothing.
pub fn conflicts(layout: &[(GateId, Footprint)]) -> Vec<(GateId, GateId)> {
    let mut found = Vec::new();
    for (i, (a, fa)) in layout.iter().enumerate() {
        for (b, fb) in &layout[i + 1..] {
            if footprints_intersect(fa, fb) {
                found.push((*a, *b));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::layout::types::Cell;

    fn naive_intersect(a: &Footprint, b: &Footprint) -> bool {
        let cells: HashSet<Cell> = a.cells().collect();
        b.cells().any(|c| cells.contains(&c))
    }

    #[test]
    fn test_prefilter_matches_naive_intersection() {
        let probes = [
            Footprint::new(0, 0, 1, 1),
            Footprint::new(1, 0, 3, 1),
            Footprint::new(2, 1, 1, 2),
            Footprint::new(3, 0, 2, 3),
            Footprint::new(4, 2, 1, 1),
            Footprint::new(0, 1, 5, 1),
        ];
        for a in &probes {
            for b in &probes {
                assert_eq!(
                    footprints_intersect(a, b),
                    naive_intersect(a, b),
                    "{:?} vs {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_excluded_gate_is_ignored() {
        let layout = vec![(GateId(1), Footprint::new(0, 0, 1, 1))];
        let candidate = Footprint::new(0, 0, 1, 1);
        assert!(overlaps(&candidate, None, &layout));
        assert!(!overlaps(&candidate, Some(GateId(1)), &layout));
        assert!(overlaps(&candidate, Some(GateId(2)), &layout));
    }

    #[test]
    fn test_first_overlap_reports_layout_order() {
        let layout = vec![
            (GateId(4), Footprint::new(5, 0, 1, 1)),
            (GateId(2), Footprint::new(3, 0, 3, 1)),
            (GateId(1), Footprint::new(4, 0, 1, 1)),
        ];
        let candidate = Footprint::new(4, 0, 2, 1);
        assert_eq!(first_overlap(&candidate, None, &layout), Some(GateId(4)));
        assert_eq!(
            first_overlap_by(&candidate, &layout, |id| id == GateId(4) || id == GateId(2)),
            Some(GateId(1))
        );
    }

    #[test]
    fn test_vertical_neighbours_do_not_overlap() {
        let layout = vec![(GateId(1), Footprint::new(2, 0, 1, 2))];
        assert!(!overlaps(&Footprint::new(2, 2, 1, 1), None, &layout));
        assert!(overlaps(&Footprint::new(2, 1, 1, 2), None, &layout));
    }

    #[test]
    fn test_conflicts() {
        let layout = vec![
            (GateId(1), Footprint::new(0, 0, 2, 1)),
            (GateId(2), Footprint::new(1, 0, 1, 2)),
            (GateId(3), Footprint::new(5, 0, 1, 1)),
        ];
        assert_eq!(conflicts(&layout), vec![(GateId(1), GateId(2))]);
        assert!(conflicts(&layout[..1]).is_empty());
    }
}
