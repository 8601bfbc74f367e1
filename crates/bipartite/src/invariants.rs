//! Debug assertion macros for the index invariants documented in `spec.md`.
//!
//! These are `debug_assert!`-based (zero cost in release builds) and check
//! the algorithm's *internal* bookkeeping, not the caller-facing contract
//! violations in [`crate::config`], which go through the always-on assertion
//! hook instead.

// =============================================================================
// Invariant 1: Bounded Indices
// =============================================================================

/// Assert that an index never exceeds the buffer size.
///
/// **Invariant**: `0 <= index <= size` (spec.md §3, invariant 1; §8, invariant 1).
macro_rules! debug_assert_index_bounded {
    ($name:literal, $index:expr, $size:expr) => {
        debug_assert!(
            $index <= $size,
            "index invariant violated: {} = {} exceeds size {}",
            $name,
            $index,
            $size
        )
    };
}

// =============================================================================
// Invariant 3: Reservation
// =============================================================================

/// Assert the one-slot reservation: free space never reaches the full size.
///
/// **Invariant**: `free(w, r, N) <= N - 1` (spec.md §8, invariant 3).
macro_rules! debug_assert_reservation {
    ($free:expr, $size:expr) => {
        debug_assert!(
            $free < $size,
            "reservation invariant violated: free {} exceeds size - 1 ({})",
            $free,
            $size - 1
        )
    };
}

// =============================================================================
// Invalidate-mark steady state
// =============================================================================

/// Assert that `i` never trails `w` in steady state.
///
/// **Invariant**: `i >= w` except transiently during a wrap (spec.md §3,
/// invariant 3).
macro_rules! debug_assert_invalidate_ahead {
    ($i:expr, $w:expr) => {
        debug_assert!(
            $i >= $w,
            "invalidate-mark invariant violated: i {} < w {}",
            $i,
            $w
        )
    };
}

// =============================================================================
// Release must not exceed its matching acquire
// =============================================================================

/// Assert a release does not commit more than its matching acquire returned.
///
/// This is a genuine contract violation (spec.md §6/§7) as well as an
/// internal bookkeeping check; the reservation guards enforce it via the
/// always-on assertion hook, this macro is the debug-only belt-and-braces
/// version used inside the core index algebra.
macro_rules! debug_assert_release_fits {
    ($committed:expr, $acquired:expr) => {
        debug_assert!(
            $committed <= $acquired,
            "release invariant violated: committing {} exceeds acquired {}",
            $committed,
            $acquired
        )
    };
}

pub(crate) use debug_assert_index_bounded;
pub(crate) use debug_assert_invalidate_ahead;
pub(crate) use debug_assert_release_fits;
pub(crate) use debug_assert_reservation;
