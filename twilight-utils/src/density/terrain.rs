//! Twilight terrain shaping nodes.
//!
//! The exact curves of the router blend, the focus falloff and the hollow hill
//! shell are placeholders until they are checked against reference terrain.
//! The unit tests below pin their current values.

use crate::biome::BiomeGridRef;
use crate::density::types::{DensityContext, NodeId, NoiseHolder};
use crate::math::{clamp, lerp2};

/// Weight of the surface noise inside the router blend.
pub const ROUTER_NOISE_WEIGHT: f64 = 0.125;

/// Turns the biome influence grid into the raw terrain density signal.
///
/// The grid is read at quart resolution (every 4 blocks), box-averaged over
/// `(2r + 1)^2` quarts with `r = round(smoothing)`, and bilinearly blended
/// between the four surrounding quart corners so the signal is continuous in
/// x and z. The result does not depend on y.
#[derive(Debug, Clone)]
pub struct TerrainDensityRouter {
    /// Biome influence grid
    pub grid: BiomeGridRef,
    /// Surface noise blended into the signal
    pub noise: NoiseHolder,
    /// Lowest output value
    pub lower_density_bound: f64,
    /// Highest output value
    pub upper_density_bound: f64,
    /// Box-average radius in quarts
    pub smoothing: f64,
    /// Multiplier node, evaluated at y = 0
    pub frequency: NodeId,
    /// Offset node, evaluated at y = 0
    pub offset: NodeId,
}

impl TerrainDensityRouter {
    /// Box-average radius in quarts.
    #[must_use]
    pub fn smoothing_radius(&self) -> i32 {
        self.smoothing.max(0.0).round() as i32
    }

    /// Smoothed biome signal at block column `(x, z)`.
    #[must_use]
    pub fn biome_density(&self, x: i32, z: i32) -> f64 {
        let qx = x >> 2;
        let qz = z >> 2;
        let fx = f64::from(x & 3) / 4.0;
        let fz = f64::from(z & 3) / 4.0;
        let r = self.smoothing_radius();

        lerp2(
            fx,
            fz,
            self.quart_average(qx, qz, r),
            self.quart_average(qx + 1, qz, r),
            self.quart_average(qx, qz + 1, r),
            self.quart_average(qx + 1, qz + 1, r),
        )
    }

    fn quart_average(&self, qx: i32, qz: i32, r: i32) -> f64 {
        let mut sum = 0.0;
        for dx in -r..=r {
            for dz in -r..=r {
                sum += self.grid.sample((qx + dx) << 2, (qz + dz) << 2);
            }
        }
        let side = f64::from(2 * r + 1);
        sum / (side * side)
    }

    /// Final blend given the smoothed biome signal, the adjustment values and a noise sample.
    #[must_use]
    pub fn blend(&self, biome: f64, frequency: f64, offset: f64, noise: f64) -> f64 {
        clamp(
            frequency * (biome + offset + ROUTER_NOISE_WEIGHT * noise),
            self.lower_density_bound,
            self.upper_density_bound,
        )
    }
}

/// Adds a smooth bump of `strength` centered on a focus point.
///
/// `input + strength * k(d / radius)` with `k(s) = (1 - s^2)^2` inside the
/// radius and 0 outside. Negative strength carves instead of raises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusedDensity {
    /// The density being shaped
    pub input: NodeId,
    /// Focus point X
    pub focus_x: f64,
    /// Focus point Y
    pub focus_y: f64,
    /// Focus point Z
    pub focus_z: f64,
    /// Falloff radius
    pub radius: f64,
    /// Bump height at the focus point
    pub strength: f64,
}

impl FocusedDensity {
    /// Falloff weight in [0, 1] at a position.
    #[must_use]
    pub fn falloff(&self, ctx: &DensityContext) -> f64 {
        let dx = f64::from(ctx.x) - self.focus_x;
        let dy = f64::from(ctx.y) - self.focus_y;
        let dz = f64::from(ctx.z) - self.focus_z;
        let s = (dx * dx + dy * dy + dz * dz).sqrt() / self.radius;
        if s < 1.0 {
            let t = 1.0 - s * s;
            t * t
        } else {
            0.0
        }
    }

    /// Applies the bump to an already evaluated input.
    #[must_use]
    pub fn apply(&self, input: f64, ctx: &DensityContext) -> f64 {
        input + self.strength * self.falloff(ctx)
    }
}

/// An ellipsoidal shell: positive inside the wall, negative in the hollow and outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HollowHill {
    /// Center X
    pub center_x: f64,
    /// Center Y
    pub center_y: f64,
    /// Center Z
    pub center_z: f64,
    /// Outer radius
    pub radius: f64,
    /// Wall thickness, in (0, radius]
    pub thickness: f64,
    /// Vertical stretch of the ellipsoid
    pub y_scale: f64,
}

impl HollowHill {
    /// Shell density in [-1, 1] at a position.
    #[must_use]
    pub fn density(&self, ctx: &DensityContext) -> f64 {
        let dx = f64::from(ctx.x) - self.center_x;
        let dy = (f64::from(ctx.y) - self.center_y) / self.y_scale;
        let dz = f64::from(ctx.z) - self.center_z;
        let d = (dx * dx + dy * dy + dz * dz).sqrt();
        let inner = self.radius - self.thickness;
        let wall = (self.radius - d).min(d - inner);
        clamp(wall / (self.thickness / 2.0), -1.0, 1.0)
    }
}

/// Signed offset of the input from one of two reference bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsoluteDifference {
    /// The value being measured
    pub input: NodeId,
    /// First reference bound
    pub lower: f64,
    /// Second reference bound
    pub upper: f64,
}

impl AbsoluteDifference {
    /// Offset from the nearer bound. Ties go to `lower`.
    #[must_use]
    pub fn nearest(&self, v: f64) -> f64 {
        let from_lower = v - self.lower;
        let from_upper = v - self.upper;
        if from_lower.abs() <= from_upper.abs() {
            from_lower
        } else {
            from_upper
        }
    }

    /// Offset from the farther bound. Ties go to `upper`.
    #[must_use]
    pub fn farthest(&self, v: f64) -> f64 {
        let from_lower = v - self.lower;
        let from_upper = v - self.upper;
        if from_upper.abs() >= from_lower.abs() {
            from_upper
        } else {
            from_lower
        }
    }

    /// Range of either result for an input range.
    #[must_use]
    pub fn bounds(&self, (min, max): (f64, f64)) -> (f64, f64) {
        (
            (min - self.lower).min(min - self.upper),
            (max - self.lower).max(max - self.upper),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::biome::BiomeInfluenceSource;
    use crate::noise::NormalNoise;
    use crate::random::RandomSplitter;

    /// 0.25 west of x = 0, 8 from there east.
    struct Step;

    impl BiomeInfluenceSource for Step {
        fn sample(&self, x: i32, _z: i32) -> f64 {
            if x < 0 { 0.25 } else { 8.0 }
        }

        fn range(&self) -> (f64, f64) {
            (0.25, 8.0)
        }
    }

    fn step_router() -> TerrainDensityRouter {
        let splitter = RandomSplitter::from_seed(0);
        let silent = NormalNoise::create(&splitter, "silent", 0, &[0.0]);
        TerrainDensityRouter {
            grid: BiomeGridRef::new("test:step", Arc::new(Step)),
            noise: NoiseHolder::new("silent", Arc::new(silent)),
            lower_density_bound: -31.0,
            upper_density_bound: 64.0,
            smoothing: 1.0,
            frequency: NodeId::new(0),
            offset: NodeId::new(1),
        }
    }

    fn hill() -> HollowHill {
        HollowHill {
            center_x: 0.0,
            center_y: 0.0,
            center_z: 0.0,
            radius: 10.0,
            thickness: 4.0,
            y_scale: 1.0,
        }
    }

    #[test]
    fn test_hollow_hill_profile() {
        let hill = hill();
        assert!((hill.density(&DensityContext::new(0, 0, 0)) + 1.0).abs() < 1e-10);
        assert!((hill.density(&DensityContext::new(8, 0, 0)) - 1.0).abs() < 1e-10);
        assert!((hill.density(&DensityContext::new(7, 0, 0)) - 0.5).abs() < 1e-10);
        assert!((hill.density(&DensityContext::new(20, 0, 0)) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_hollow_hill_y_scale_stretches_vertically() {
        let hill = HollowHill {
            y_scale: 2.0,
            ..hill()
        };
        // dy = 16 / 2 = 8, the middle of the wall
        assert!((hill.density(&DensityContext::new(0, 16, 0)) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_focused_falloff() {
        let focused = FocusedDensity {
            input: NodeId::new(0),
            focus_x: 0.0,
            focus_y: 64.0,
            focus_z: 0.0,
            radius: 10.0,
            strength: 2.0,
        };
        let at_focus = DensityContext::new(0, 64, 0);
        assert!((focused.apply(0.5, &at_focus) - 2.5).abs() < 1e-10);

        // s = 0.5: (1 - 0.25)^2 = 0.5625
        let halfway = DensityContext::new(5, 64, 0);
        assert!((focused.falloff(&halfway) - 0.5625).abs() < 1e-10);

        let outside = DensityContext::new(0, 64, 10);
        assert!((focused.apply(0.5, &outside) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_focused_negative_strength_carves() {
        let focused = FocusedDensity {
            input: NodeId::new(0),
            focus_x: 0.0,
            focus_y: 0.0,
            focus_z: 0.0,
            radius: 4.0,
            strength: -1.0,
        };
        assert!((focused.apply(0.0, &DensityContext::new(0, 0, 0)) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_absolute_difference() {
        let diff = AbsoluteDifference {
            input: NodeId::new(0),
            lower: 0.0,
            upper: 10.0,
        };
        assert!((diff.nearest(3.0) - 3.0).abs() < 1e-10);
        assert!((diff.farthest(3.0) + 7.0).abs() < 1e-10);

        // Equidistant
        assert!((diff.nearest(5.0) - 5.0).abs() < 1e-10);
        assert!((diff.farthest(5.0) + 5.0).abs() < 1e-10);

        let (min, max) = diff.bounds((0.0, 10.0));
        assert!((min + 10.0).abs() < 1e-10);
        assert!((max - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_router_biome_density_values() {
        let router = step_router();
        // Quart averages over three columns: q <= -2 is 0.25, q = -1 mixes one
        // east column in, q = 0 mixes one west column in, q >= 1 is 8.
        let west_edge = 8.5 / 3.0;
        let east_edge = 16.25 / 3.0;
        let expected = [
            (-8, 0.25),
            (-5, 0.25 + 0.75 * (west_edge - 0.25)),
            (-4, west_edge),
            (-2, 4.125),
            (-1, west_edge + 0.75 * (east_edge - west_edge)),
            (0, east_edge),
            (2, (east_edge + 8.0) / 2.0),
            (4, 8.0),
            (37, 8.0),
        ];
        for (x, want) in expected {
            for z in [-7, 0, 13] {
                let got = router.biome_density(x, z);
                assert!((got - want).abs() < 1e-12, "x={x} z={z}: {got} != {want}");
            }
        }
    }

    #[test]
    fn test_router_blend_values() {
        let router = step_router();
        assert!((router.blend(2.0, 8.0, -1.25, 0.0) - 6.0).abs() < 1e-12);
        assert!((router.blend(2.0, 8.0, -1.25, 1.0) - 7.0).abs() < 1e-12);
        assert!((router.blend(0.0, 8.0, -1.25, 0.0) + 10.0).abs() < 1e-12);
        assert_eq!(router.blend(20.0, 8.0, -1.25, 0.0), 64.0);
        assert_eq!(router.blend(-10.0, 8.0, -1.25, 0.0), -31.0);
        assert_eq!(router.noise.sample(123.0, 0.0, -45.0), 0.0);
    }
}
