mod gradient;
mod hue;
mod utils;

pub use gradient::{Gradient, GradientRange};
use smart_leds::RGB8;
pub use utils::{rgb_from_u32, rgb_to_u32};

use crate::fixed::{FIXMAX, Fixed, fixed_lerp_fast, fixed_mul};

/// 8-bit color as sent to the LED hardware
pub type Rgb = RGB8;

const FIXMAX_U32: u32 = FIXMAX as u32;

/// Color with fixed-range channels (`0..=FIXMAX`)
///
/// Every operation saturates; nothing wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: Fixed,
    pub g: Fixed,
    pub b: Fixed,
}

impl Color {
    pub const BLACK: Self = Self::splat(0);
    pub const WHITE: Self = Self::splat(FIXMAX);

    pub const fn new(r: Fixed, g: Fixed, b: Fixed) -> Self {
        Self { r, g, b }
    }

    /// Gray with all channels at `value`
    pub const fn splat(value: Fixed) -> Self {
        Self::new(value, value, value)
    }

    /// Color of the given hue with constant total brightness
    ///
    /// `sat = 0` yields an even gray, `sat = FIXMAX` the pure hue.
    pub const fn from_hue_sat(hue: Fixed, sat: Fixed) -> Self {
        let pure = hue::constant_hue(hue);
        let gray = Self::splat(FIXMAX / 3);
        gray.lerp(pure, sat)
    }

    /// Multiply every channel by `scale`
    pub const fn scale(self, scale: Fixed) -> Self {
        Self::new(
            fixed_mul(self.r, scale),
            fixed_mul(self.g, scale),
            fixed_mul(self.b, scale),
        )
    }

    pub const fn saturating_add(self, other: Self) -> Self {
        Self::new(
            add_channel(self.r, other.r),
            add_channel(self.g, other.g),
            add_channel(self.b, other.b),
        )
    }

    pub const fn saturating_sub(self, other: Self) -> Self {
        Self::new(
            self.r.saturating_sub(other.r),
            self.g.saturating_sub(other.g),
            self.b.saturating_sub(other.b),
        )
    }

    /// Blend toward `other`; `t = FIXMAX` yields `other`
    pub const fn lerp(self, other: Self, t: Fixed) -> Self {
        Self::new(
            fixed_lerp_fast(self.r, other.r, t),
            fixed_lerp_fast(self.g, other.g, t),
            fixed_lerp_fast(self.b, other.b, t),
        )
    }

    /// Per-channel maximum
    pub const fn channel_max(self, other: Self) -> Self {
        Self::new(
            max_channel(self.r, other.r),
            max_channel(self.g, other.g),
            max_channel(self.b, other.b),
        )
    }

    /// Brightest channel value
    pub const fn peak(self) -> Fixed {
        max_channel(max_channel(self.r, self.g), self.b)
    }

    /// Sum of all channels, unclamped
    pub const fn total(self) -> i32 {
        self.r as i32 + self.g as i32 + self.b as i32
    }

    /// Scale up so the brightest channel reaches `FIXMAX`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn brighten(self) -> Self {
        let peak = self.peak() as u32;
        if peak == 0 {
            return self;
        }
        Self::new(
            (self.r as u32 * FIXMAX_U32 / peak) as Fixed,
            (self.g as u32 * FIXMAX_U32 / peak) as Fixed,
            (self.b as u32 * FIXMAX_U32 / peak) as Fixed,
        )
    }

    /// Blend toward a gray of the same peak brightness
    pub const fn desaturate(self, amount: Fixed) -> Self {
        self.lerp(Self::splat(self.peak()), amount)
    }

    /// Convert to the 8-bit hardware representation
    pub const fn to_rgb8(self) -> Rgb {
        Rgb {
            r: channel_to_u8(self.r),
            g: channel_to_u8(self.g),
            b: channel_to_u8(self.b),
        }
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn add_channel(a: Fixed, b: Fixed) -> Fixed {
    let sum = a as u32 + b as u32;
    if sum > FIXMAX_U32 { FIXMAX } else { sum as Fixed }
}

#[inline]
const fn max_channel(a: Fixed, b: Fixed) -> Fixed {
    if a > b { a } else { b }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
const fn channel_to_u8(value: Fixed) -> u8 {
    let value = value >> 7;
    if value > 255 { 255 } else { value as u8 }
}
