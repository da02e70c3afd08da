//! Math utilities for noise generation and density evaluation.

/// Smoothstep - quintic Hermite interpolation (NOT cubic!)
///
/// Formula: 6x^5 - 15x^4 + 10x^3
///
/// This is the fade curve used by improved Perlin noise.
#[inline]
#[must_use]
pub fn smoothstep(x: f64) -> f64 {
    x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// Floor of a double as an `i32`.
///
/// A plain `as i32` cast truncates toward zero, so negative values with a
/// fractional part need one subtracted.
#[inline]
#[must_use]
pub fn floor(v: f64) -> i32 {
    let i = v as i32;
    if v < f64::from(i) { i - 1 } else { i }
}

/// Integer division rounding toward negative infinity.
#[inline]
#[must_use]
pub const fn floor_div(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Linear interpolation.
///
/// Formula: a + alpha * (b - a)
#[inline]
#[must_use]
pub fn lerp(alpha: f64, a: f64, b: f64) -> f64 {
    a + alpha * (b - a)
}

/// Bilinear interpolation between 4 values in a 2D grid.
#[inline]
#[must_use]
pub fn lerp2(a1: f64, a2: f64, x00: f64, x10: f64, x01: f64, x11: f64) -> f64 {
    lerp(a2, lerp(a1, x00, x10), lerp(a1, x01, x11))
}

/// Trilinear interpolation between 8 values in a 3D grid.
#[inline]
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn lerp3(
    a1: f64,
    a2: f64,
    a3: f64,
    x000: f64,
    x100: f64,
    x010: f64,
    x110: f64,
    x001: f64,
    x101: f64,
    x011: f64,
    x111: f64,
) -> f64 {
    lerp(
        a3,
        lerp2(a1, a2, x000, x100, x010, x110),
        lerp2(a1, a2, x001, x101, x011, x111),
    )
}

/// Clamped linear interpolation.
///
/// Clamps the interpolation factor to [0, 1] before interpolating.
#[inline]
#[must_use]
pub fn clamped_lerp(min: f64, max: f64, factor: f64) -> f64 {
    if factor < 0.0 {
        min
    } else if factor > 1.0 {
        max
    } else {
        lerp(factor, min, max)
    }
}

/// Clamp a value to the range [min, max].
///
/// Unlike [`f64::clamp`] this never panics when `min > max`: values below `min`
/// become `min` and everything else becomes `max`.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Map a value from one range to another with clamped lerp.
///
/// Used for Y-clamped gradients in density functions.
#[inline]
#[must_use]
pub fn map_clamped(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    let t = (value - from_min) / (from_max - from_min);
    clamped_lerp(to_min, to_max, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor() {
        assert_eq!(floor(1.5), 1);
        assert_eq!(floor(1.0), 1);
        assert_eq!(floor(0.5), 0);
        assert_eq!(floor(0.0), 0);
        assert_eq!(floor(-0.5), -1);
        assert_eq!(floor(-1.0), -1);
        assert_eq!(floor(-1.5), -2);
    }

    #[test]
    fn test_floor_div() {
        assert_eq!(floor_div(16, 8), 2);
        assert_eq!(floor_div(15, 8), 1);
        assert_eq!(floor_div(0, 8), 0);
        assert_eq!(floor_div(-1, 8), -1);
        assert_eq!(floor_div(-8, 8), -1);
        assert_eq!(floor_div(-9, 8), -2);
    }

    #[test]
    fn test_smoothstep() {
        assert!((smoothstep(0.0) - 0.0).abs() < 1e-10);
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-10);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 10.0, 20.0) - 10.0).abs() < 1e-10);
        assert!((lerp(1.0, 10.0, 20.0) - 20.0).abs() < 1e-10);
        assert!((lerp(0.5, 10.0, 20.0) - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_clamp_extremes() {
        assert!((clamp(f64::MAX, -1.0, 1.0) - 1.0).abs() < f64::EPSILON);
        assert!((clamp(f64::MIN, -1.0, 1.0) + 1.0).abs() < f64::EPSILON);
        assert!((clamp(f64::INFINITY, 0.0, 2.0) - 2.0).abs() < f64::EPSILON);
        assert!(clamp(f64::NEG_INFINITY, 0.0, 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_inverted_bounds() {
        assert!((clamp(0.0, 1.0, -1.0) - 1.0).abs() < f64::EPSILON);
        assert!((clamp(5.0, 1.0, -1.0) + 1.0).abs() < f64::EPSILON);
        assert!((clamp(1.0, 1.0, -1.0) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_map_clamped() {
        assert!((map_clamped(-40.0, -31.0, 256.0, 31.0, -256.0) - 31.0).abs() < 1e-10);
        assert!((map_clamped(300.0, -31.0, 256.0, 31.0, -256.0) + 256.0).abs() < 1e-10);
        assert!((map_clamped(0.0, -31.0, 256.0, 31.0, -256.0)).abs() < 1e-10);
    }
}
