//! Half-open interval overlap. This predicate is the single source of truth
//! for "do two bookings conflict"; the repository overlap guards and the
//! slot-grid affordances both reduce to it, never the reverse.

/// True iff `[a.0, a.1)` and `[b.0, b.1)` intersect. Abutting intervals
/// (`a.1 == b.0`) do not overlap.
pub fn overlaps(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

pub fn has_conflict(candidate: (u32, u32), existing: &[(u32, u32)]) -> bool {
    existing.iter().any(|e| overlaps(candidate, *e))
}

/// The subset of `existing` that overlaps `candidate`, for diagnostics.
pub fn find_conflicts(candidate: (u32, u32), existing: &[(u32, u32)]) -> Vec<(u32, u32)> {
    existing
        .iter()
        .copied()
        .filter(|e| overlaps(candidate, *e))
        .collect()
}
