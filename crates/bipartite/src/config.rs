//! Runtime configuration and the assertion-hook contract.
//!
//! `spec.md` §6 distinguishes two very different kinds of failure: a
//! capacity miss or an empty read are ordinary, expected outcomes and are
//! reported as `None` (see `spec.md` §7); a *contract violation*, a zero-
//! length buffer at init, or a release larger than its matching acquire, is a
//! programmer error and is reported through an assertion hook that
//! "implementations may make configurable", defaulting to aborting the
//! process. This module owns that hook and the handful of ambient knobs
//! (metrics on/off) that don't belong on the hot path itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use thiserror::Error;

/// A contract violation detected by the core (spec.md §6, §7).
///
/// Never returned from the hot-path operations themselves; only ever
/// passed to the assertion hook, which by default turns it into a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// `release(k)` committed more bytes than its matching `acquire` returned.
    #[error("release of {committed} bytes exceeds the {acquired}-byte acquire it matches")]
    ReleaseExceedsAcquire {
        /// Bytes the caller attempted to release.
        committed: usize,
        /// Bytes made available by the matching acquire.
        acquired: usize,
    },
    /// The write index would advance past the buffer's capacity.
    #[error("write index {index} would exceed capacity {capacity}")]
    IndexExceedsCapacity {
        /// The index after the attempted advance.
        index: usize,
        /// The buffer's capacity.
        capacity: usize,
    },
}

type Hook = Box<dyn Fn(ContractViolation) + Send + Sync>;

static HOOK: OnceLock<Hook> = OnceLock::new();

/// Installs a custom assertion hook, replacing the default (panic) one.
///
/// Only the first call takes effect, matching `OnceLock`'s semantics, so
/// this is meant to be called once, early, by an application that wants
/// contract violations reported some other way (e.g. logged and aborted
/// explicitly, or turned into a structured crash report) rather than via a
/// bare panic.
pub fn set_assert_hook<F>(hook: F)
where
    F: Fn(ContractViolation) + Send + Sync + 'static,
{
    let _ = HOOK.set(Box::new(hook));
}

pub(crate) fn violate(violation: ContractViolation) -> ! {
    match HOOK.get() {
        Some(hook) => {
            hook(violation);
            // A custom hook that doesn't abort leaves the core in an
            // undefined state; spec.md §6 requires this to be fatal.
            panic!("assertion hook returned after a contract violation: {violation}");
        }
        None => panic!("{violation}"),
    }
}

/// Error returned when constructing a [`crate::BipartiteBuffer`] from data
/// that cannot back one.
///
/// This is the one place in the crate where a precondition failure is
/// surfaced as an ordinary `Result` rather than through the assertion hook:
/// constructing the instance has not yet established the invariants the
/// hook protects, so there is nothing to abort out of; returning `Err` is
/// the idiomatic Rust equivalent of "fail before the object exists."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    /// `spec.md` §3: `size >= 1` is required (zero-sized backing storage
    /// cannot disambiguate empty from full).
    #[error("bipartite buffer requires a non-empty backing slice")]
    EmptyData,
}

/// Ambient, non-algorithmic configuration.
///
/// Everything that actually drives the index algebra (cache-line padding
/// width, whether padding happens at all) is a Cargo feature, see the
/// crate's `layout` module, because those are compile-time choices in the
/// original C library. What's left here is the kind of knob that's
/// legitimately a runtime choice: whether to pay for the metrics counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Enables the counters in [`MetricsSnapshot`](crate::MetricsSnapshot).
    /// Off by default; a lock-free SPSC primitive's fast path should not pay
    /// for bookkeeping nobody asked for.
    pub metrics: bool,
}

impl Config {
    /// Returns the default configuration (metrics disabled).
    #[must_use]
    pub const fn new() -> Self {
        Self { metrics: false }
    }
}

/// Internal flag, one per buffer instance, so metrics can be toggled
/// per-instance rather than crate-wide.
#[derive(Debug, Default)]
pub(crate) struct MetricsGate(AtomicBool);

impl MetricsGate {
    pub(crate) fn new(enabled: bool) -> Self {
        Self(AtomicBool::new(enabled))
    }

    #[inline]
    pub(crate) fn enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_disables_metrics() {
        assert!(!Config::default().metrics);
    }

    #[test]
    fn contract_violation_messages_are_descriptive() {
        let v = ContractViolation::ReleaseExceedsAcquire {
            committed: 10,
            acquired: 4,
        };
        assert!(v.to_string().contains("10"));
        assert!(v.to_string().contains('4'));
    }
}
