//! Cache-line placement for the three shared indices.
//!
//! Corresponds to the original C library's `LFBB_MULTICORE_HOSTED` /
//! `LFBB_CACHELINE_LENGTH` compile-time configuration: on a hosted multicore
//! system, `r`, `w` and `i` must each live in their own cache line or the
//! producer and consumer will ping-pong the same line between cores on every
//! acquire/release. On a single-core embedded target there is nothing to
//! false-share against, so the padding is pure overhead and can be compiled
//! out.
//!
//! Both knobs are Cargo features rather than `Config` fields because they
//! are exactly that in the original: a build-time choice, not a runtime one
//! (alignment can't be changed after the struct is laid out).

use std::ops::Deref;
use std::sync::atomic::AtomicUsize;

/// Wrapper ensuring its contents do not share a cache line with a
/// neighboring field.
///
/// With `cache-padding` disabled this degrades to a transparent, unpadded
/// wrapper, matching `LFBB_MULTICORE_HOSTED == false`.
#[cfg(all(feature = "cache-padding", not(feature = "cacheline-128")))]
#[repr(align(64))]
pub(crate) struct Padded<T>(T);

#[cfg(all(feature = "cache-padding", feature = "cacheline-128"))]
#[repr(align(128))]
pub(crate) struct Padded<T>(T);

#[cfg(not(feature = "cache-padding"))]
#[repr(transparent)]
pub(crate) struct Padded<T>(T);

impl<T> Padded<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for Padded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

pub(crate) type Index = Padded<AtomicUsize>;
