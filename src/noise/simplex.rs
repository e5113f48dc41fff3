//! Two-dimensional simplex gradient noise.

use crate::random::RandomSource;

/// Gradient set shared by every simplex corner; only the x/y components
/// participate in the 2D dot product.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Number of distinct permutation entries.
pub const PERMUTATION_SIZE: usize = 256;

/// Skew factor from input space onto the triangular lattice.
const F2: f64 = 0.366_025_403_784_438_6; // (sqrt(3) - 1) / 2
/// Unskew factor from the lattice back to input space.
const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

/// Lattice hashing table: 256 values duplicated to 512 so corner lookups
/// never need to wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    perm: Box<[u8; PERMUTATION_SIZE * 2]>,
}

impl PermutationTable {
    /// Builds a table from explicit values.
    pub fn from_values(values: [u8; PERMUTATION_SIZE]) -> Self {
        let mut perm = Box::new([0u8; PERMUTATION_SIZE * 2]);
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = values[i & (PERMUTATION_SIZE - 1)];
        }
        Self { perm }
    }

    /// Fills a table with random values in `[0, 256)`.
    ///
    /// Values are drawn independently, so repeats are possible.
    pub fn random(rng: &mut (impl RandomSource + ?Sized)) -> Self {
        let mut values = [0u8; PERMUTATION_SIZE];
        for v in &mut values {
            *v = rng.next_int(PERMUTATION_SIZE as u32) as u8;
        }
        Self::from_values(values)
    }

    /// Identity table `[0, 1, ..., 255]`.
    pub fn identity() -> Self {
        let mut values = [0u8; PERMUTATION_SIZE];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self::from_values(values)
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        self.perm[index] as usize
    }

    /// Returns the 512-entry wrap table.
    pub fn as_slice(&self) -> &[u8] {
        &self.perm[..]
    }
}

/// Deterministic 2D simplex noise field.
///
/// The field owns its permutation table; once constructed it is read-only
/// and can be shared across threads.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    table: PermutationTable,
}

impl SimplexNoise {
    /// Creates a noise field with a table drawn from `rng`.
    pub fn new(rng: &mut (impl RandomSource + ?Sized)) -> Self {
        Self::with_table(PermutationTable::random(rng))
    }

    /// Creates a noise field over a fixed permutation table.
    pub fn with_table(table: PermutationTable) -> Self {
        Self { table }
    }

    /// The permutation table backing this field.
    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    /// Samples the noise field at `(x, y)`.
    ///
    /// Output is band-limited and roughly within `[-1, 1]` after scaling;
    /// the raw corner sum is returned without rescaling.
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();

        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Lower triangle when x0 > y0, upper otherwise.
        let (i1, j1) = if x0 > y0 { (1usize, 0usize) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & (PERMUTATION_SIZE as i64 - 1)) as usize;
        let jj = (j as i64 & (PERMUTATION_SIZE as i64 - 1)) as usize;
        let perm = &self.table;
        let gi0 = perm.get(ii + perm.get(jj)) % 12;
        let gi1 = perm.get(ii + i1 + perm.get(jj + j1)) % 12;
        let gi2 = perm.get(ii + 1 + perm.get(jj + 1)) % 12;

        corner(gi0, x0, y0) + corner(gi1, x1, y1) + corner(gi2, x2, y2)
    }
}

/// Contribution of a single simplex corner with radial falloff `(0.5 - d^2)^4`.
#[inline]
fn corner(gradient: usize, x: f64, y: f64) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    let g = &GRAD3[gradient];
    t2 * t2 * (g[0] * x + g[1] * y)
}
