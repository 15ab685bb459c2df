//! Host-supplied randomness
//!
//! The generator and the crumble hazard only need uniform samples in
//! `[0, 1)`. Hosts pass a seeded `Pcg32` for reproducible runs; tests can
//! replay an exact sequence with [`SequenceSource`].

use rand::Rng;
use rand_pcg::Pcg32;

/// A uniform `[0, 1)` sample stream
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[-radius, radius]`. Negative radii act as zero.
    fn next_offset(&mut self, radius: i32) -> i32 {
        let radius = i64::from(radius.max(0));
        let span = 2 * radius + 1;
        let pick = ((self.next_unit() * span as f64).floor() as i64).clamp(0, span - 1);
        (pick - radius) as i32
    }
}

impl UniformSource for Pcg32 {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Values are clamped into `[0, 1)`. An empty list yields zeros.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// The same sample forever
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }
}

impl UniformSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        v
    }
}
