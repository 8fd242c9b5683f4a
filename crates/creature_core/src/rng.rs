//! Injectable randomness for battle resolution.
//!
//! Battles only ever ask for two kinds of draw, so the seam is a small trait
//! rather than a concrete generator. Every `rand` generator implements it, and
//! [`ScriptedRandom`] replays fixed draws so a battle can be forced down a
//! particular branch.

use rand::{Rng, RngCore};
use std::collections::VecDeque;

pub trait RandomSource {
    /// A draw from the continuous uniform distribution on `[lo, hi]`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// `true` with probability `p`.
    fn bernoulli(&mut self, p: f64) -> bool;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.gen_range(lo..=hi)
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        self.gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Replays queued draws, then falls back to fixed defaults.
///
/// Uniform draws are clamped into the requested range. Once a queue runs dry
/// `uniform` returns the top of the range and `bernoulli` returns `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    uniforms: VecDeque<f64>,
    flips: VecDeque<bool>,
    uniform_calls: usize,
    flip_calls: usize,
}

impl ScriptedRandom {
    /// No queued draws: maximum roll and no successes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    pub fn with_flips(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.flips.extend(values);
        self
    }

    /// Number of `uniform` draws served so far.
    pub fn uniform_calls(&self) -> usize {
        self.uniform_calls
    }

    /// Number of `bernoulli` draws served so far.
    pub fn flip_calls(&self) -> usize {
        self.flip_calls
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.uniform_calls += 1;
        match self.uniforms.pop_front() {
            Some(v) => v.clamp(lo, hi),
            None => hi,
        }
    }

    fn bernoulli(&mut self, _p: f64) -> bool {
        self.flip_calls += 1;
        self.flips.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "rng_tests.rs"]
mod rng_tests;
