//! Multi-octave value noise on a fixed grid.
//!
//! The base octave is a uniform-random grid at full resolution. Each further
//! octave `o` draws a coarser grid of `ceil(W/2^o) x ceil(H/2^o)` values,
//! scales it by `persistence`, and adds it back through nearest-neighbor
//! block replication. The sum is then rescaled to [0, 1].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Parameters controlling noise synthesis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub octaves: u32,      // Total octaves including the base layer
    pub persistence: f64,  // Amplitude of every coarse octave
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            seed: 42,
            octaves: 4,
            persistence: 0.5,
        }
    }
}

/// A W x H grid of values in [0, 1], indexed `[x][y]`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl NoiseField {
    /// Generate a normalized field.
    ///
    /// The field depends only on `params`: every octave draws from one RNG
    /// seeded with `params.seed`. An `octaves` of 0 behaves like 1.
    /// A flat accumulated grid (zero variance) yields an all-zero field.
    pub fn generate(params: &NoiseParams) -> Self {
        let NoiseParams { width, height, .. } = *params;
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

        let mut values: Vec<f64> = (0..width * height).map(|_| rng.random::<f64>()).collect();

        for octave in 1..params.octaves.max(1) {
            let scale = 2usize.saturating_pow(octave);
            let coarse_w = width.div_ceil(scale);
            let coarse_h = height.div_ceil(scale);
            let coarse: Vec<f64> = (0..coarse_w * coarse_h)
                .map(|_| rng.random::<f64>() * params.persistence)
                .collect();

            for x in 0..width {
                for y in 0..height {
                    values[x * height + y] += coarse[(x / scale) * coarse_h + y / scale];
                }
            }
        }

        let mut field = Self { width, height, values };
        field.normalize();
        field
    }

    fn normalize(&mut self) {
        if self.values.is_empty() {
            return;
        }

        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        if range <= 0.0 {
            log::warn!(
                "Noise field {}x{} has zero variance, emitting all-zero field",
                self.width, self.height
            );
            self.values.iter_mut().for_each(|v| *v = 0.0);
            return;
        }

        self.values.iter_mut().for_each(|v| *v = (*v - min) / range);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside {}x{} field", self.width, self.height);
        self.values[x * self.height + y]
    }

    /// Column of values for a fixed `x`.
    pub fn column(&self, x: usize) -> &[f64] {
        &self.values[x * self.height..(x + 1) * self.height]
    }

    /// Raw values, `x`-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Copy out as nested `[x][y]` vectors.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        (0..self.width).map(|x| self.column(x).to_vec()).collect()
    }
}

/// Serializes as `[[f64; height]; width]`.
impl Serialize for NoiseField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.width))?;
        for x in 0..self.width {
            seq.serialize_element(self.column(x))?;
        }
        seq.end()
    }
}
