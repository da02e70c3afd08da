//! This module contains math related utilities.
pub mod noise_math;

pub use noise_math::{
    clamp, clamped_lerp, floor, floor_div, lerp, lerp2, lerp3, map_clamped, smoothstep,
};
