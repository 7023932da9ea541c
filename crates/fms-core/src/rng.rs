//! Injectable random sources.
//!
//! # Determinism strategy
//!
//! Every random decision in the simulator is derived from a single primitive,
//! [`RandomSource::next_unit`], which yields one `f64` in `[0, 1)`.  Ranges,
//! coin flips and probability checks are computed from that value by the
//! provided trait methods, so the *sequence of unit draws* fully determines a
//! run.  This means:
//!
//! - A seeded [`SimRng`] reproduces a run exactly.
//! - A [`RecordingRng`] captures the draws of any run, and a [`ReplayRng`]
//!   fed the same draws reproduces it bit-for-bit without `rand` involved.
//! - Tests can pin behaviour with [`ReplayRng::constant`] (e.g. `0.99` makes
//!   every low-probability event fail).
//!
//! Components consume draws in a fixed, documented order; a draw is consumed
//! even when the outcome is irrelevant (e.g. the driver-swap roll), except
//! where a cheaper precondition is checked first.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RandomSource ──────────────────────────────────────────────────────────────

/// A stream of uniform draws in `[0, 1)` plus helpers built on top of it.
pub trait RandomSource {
    /// The next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform `f64` in `[lo, hi)`.
    #[inline]
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }

    /// `true` with probability `p`.
    #[inline]
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Uniform integer in the inclusive range `lo..=hi`.
    ///
    /// Returns `lo` when `hi < lo`.
    fn int_in(&mut self, lo: u32, hi: u32) -> u32 {
        let u = self.next_unit();
        if hi <= lo {
            return lo;
        }
        let span = u64::from(hi - lo) + 1;
        let k = ((u * span as f64) as u64).min(span - 1);
        lo + k as u32
    }

    /// `+1.0` or `-1.0` with equal probability.
    #[inline]
    fn sign(&mut self) -> f64 {
        if self.chance(0.5) { 1.0 } else { -1.0 }
    }

    /// Choose an element of `items`; `None` if the slice is empty.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let last = u32::try_from(items.len() - 1).unwrap_or(u32::MAX);
        items.get(self.int_in(0, last) as usize)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seeded pseudo-random source backed by `SmallRng`.
///
/// Used only in single-threaded contexts.  If an independent stream is needed
/// (e.g. for output-side noise that must not disturb the vehicle stream),
/// derive one with [`SimRng::child`].
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

// ── RecordingRng ──────────────────────────────────────────────────────────────

/// Wraps another source and records every unit draw it hands out.
pub struct RecordingRng<R> {
    inner: R,
    draws: Vec<f64>,
}

impl<R: RandomSource> RecordingRng<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, draws: Vec::new() }
    }

    /// Draws handed out so far, in order.
    pub fn draws(&self) -> &[f64] {
        &self.draws
    }

    pub fn into_draws(self) -> Vec<f64> {
        self.draws
    }
}

impl<R: RandomSource> RandomSource for RecordingRng<R> {
    fn next_unit(&mut self) -> f64 {
        let u = self.inner.next_unit();
        self.draws.push(u);
        u
    }
}

// ── ReplayRng ─────────────────────────────────────────────────────────────────

/// Replays a fixed list of unit draws.
///
/// Wraps around to the first draw when the list is exhausted, so it never
/// fails.  An empty list yields `0.0` forever.
#[derive(Clone, Debug)]
pub struct ReplayRng {
    draws: Vec<f64>,
    pos:   usize,
}

impl ReplayRng {
    /// Values outside `[0, 1)` are clamped into it.
    pub fn new(draws: Vec<f64>) -> Self {
        let draws = draws
            .into_iter()
            .map(|u| u.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { draws, pos: 0 }
    }

    /// A source that returns `u` on every draw.
    pub fn constant(u: f64) -> Self {
        Self::new(vec![u])
    }

    /// Number of draws consumed so far (not reset by wrap-around).
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ReplayRng {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let u = self.draws[self.pos % self.draws.len()];
        self.pos += 1;
        u
    }
}
