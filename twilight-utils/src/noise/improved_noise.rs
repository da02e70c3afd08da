//! Improved Perlin noise, the single-octave base generator.
//!
//! This is the building block used by `PerlinNoise` for octave-based noise.

use rand::Rng;

use crate::math::{floor, lerp3, smoothstep};

/// Gradient vectors for Perlin noise.
///
/// The first twelve are the cube edge midpoints; the last four repeat four of
/// them so that `hash & 15` can index directly.
const GRADIENT: [[i32; 3]; 16] = [
    [1, 1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, -1, 1],
    [0, 1, -1],
    [0, -1, -1],
    [1, 1, 0],
    [0, -1, 1],
    [-1, 1, 0],
    [0, -1, -1],
];

/// Improved Perlin noise generator.
///
/// Each instance has a permutation table and offset values initialized from
/// a random source.
#[derive(Debug, Clone)]
pub struct ImprovedNoise {
    /// Permutation table (256 bytes)
    p: [u8; 256],
    /// X offset for the noise coordinates
    pub xo: f64,
    /// Y offset for the noise coordinates
    pub yo: f64,
    /// Z offset for the noise coordinates
    pub zo: f64,
}

impl ImprovedNoise {
    /// Creates a new `ImprovedNoise` from a random source.
    ///
    /// Draws three coordinate offsets, then shuffles the permutation table.
    pub fn new<R: Rng + ?Sized>(random: &mut R) -> Self {
        let xo = random.random::<f64>() * 256.0;
        let yo = random.random::<f64>() * 256.0;
        let zo = random.random::<f64>() * 256.0;

        let mut p = [0u8; 256];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates, walking forward
        for i in 0..256 {
            let offset = random.random_range(0..256 - i);
            p.swap(i, i + offset);
        }

        Self { p, xo, yo, zo }
    }

    /// Sample noise at the given coordinates.
    #[must_use]
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let x = x + self.xo;
        let y = y + self.yo;
        let z = z + self.zo;

        let xf = floor(x);
        let yf = floor(y);
        let zf = floor(z);

        self.sample_and_lerp(
            xf,
            yf,
            zf,
            x - f64::from(xf),
            y - f64::from(yf),
            z - f64::from(zf),
        )
    }

    /// Look up the permutation value at index x.
    #[inline]
    const fn p(&self, x: i32) -> i32 {
        self.p[(x & 255) as usize] as i32
    }

    /// Sample noise at grid point and interpolate.
    #[allow(clippy::many_single_char_names)]
    fn sample_and_lerp(&self, x: i32, y: i32, z: i32, xr: f64, yr: f64, zr: f64) -> f64 {
        let x0 = self.p(x);
        let x1 = self.p(x + 1);
        let xy00 = self.p(x0 + y);
        let xy01 = self.p(x0 + y + 1);
        let xy10 = self.p(x1 + y);
        let xy11 = self.p(x1 + y + 1);

        let d000 = grad_dot(self.p(xy00 + z), xr, yr, zr);
        let d100 = grad_dot(self.p(xy10 + z), xr - 1.0, yr, zr);
        let d010 = grad_dot(self.p(xy01 + z), xr, yr - 1.0, zr);
        let d110 = grad_dot(self.p(xy11 + z), xr - 1.0, yr - 1.0, zr);
        let d001 = grad_dot(self.p(xy00 + z + 1), xr, yr, zr - 1.0);
        let d101 = grad_dot(self.p(xy10 + z + 1), xr - 1.0, yr, zr - 1.0);
        let d011 = grad_dot(self.p(xy01 + z + 1), xr, yr - 1.0, zr - 1.0);
        let d111 = grad_dot(self.p(xy11 + z + 1), xr - 1.0, yr - 1.0, zr - 1.0);

        lerp3(
            smoothstep(xr),
            smoothstep(yr),
            smoothstep(zr),
            d000,
            d100,
            d010,
            d110,
            d001,
            d101,
            d011,
            d111,
        )
    }
}

/// Dot product of the hashed gradient vector and the offset vector.
#[inline]
fn grad_dot(hash: i32, x: f64, y: f64, z: f64) -> f64 {
    let g = &GRADIENT[(hash & 15) as usize];
    f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z
}
