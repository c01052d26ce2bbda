//! Fixed-range arithmetic
//!
//! Most quantities (color channels, hue, saturation, show progress, entity
//! progress) live on a 0-32768 scale, where `FIXMAX` stands for 1.0 and
//! `FIXHALF` for 0.5. Scaling and interpolation reduce to a multiply and a
//! shift, so effects stay deterministic and float-free.

/// A value in `0..=FIXMAX`
pub type Fixed = u16;

/// Fractional pixels: 1/64th of an LED
pub type Fpixels = i32;

/// 1.0 on the fixed scale
pub const FIXMAX: Fixed = 32768;

/// 0.5 on the fixed scale
pub const FIXHALF: Fixed = 16384;

const FIXMAX_I32: i32 = FIXMAX as i32;
const FIXMAX_U32: u32 = FIXMAX as u32;
const FRACTION_MASK: u32 = 0x7FFF;
const FPIXELS_PER_PIXEL: i32 = 64;

/// Multiply two fixed values, truncating
///
/// Exact for `a, b <= FIXMAX`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as u32 * b as u32) >> 15) as Fixed
}

/// Square of a fixed value
#[inline]
pub const fn fixed_sqr(x: Fixed) -> Fixed {
    fixed_mul(x, x)
}

/// Interpolate between two in-range values
///
/// `t = 0` yields `a`, `t = FIXMAX` yields `b`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn fixed_lerp_fast(a: Fixed, b: Fixed, t: Fixed) -> Fixed {
    let t = t as u32;
    ((b as u32 * t + a as u32 * (FIXMAX_U32 - t)) >> 15) as Fixed
}

/// Interpolate between two signed values of any magnitude
///
/// Large inputs are halved together with the divisor until they fit the
/// fixed range.
#[allow(clippy::cast_possible_truncation)]
pub const fn fixed_lerp(a: i32, b: i32, t: Fixed) -> i32 {
    let mut a = a;
    let mut b = b;
    let mut divisor = FIXMAX_I32;
    while a > FIXMAX_I32 || b > FIXMAX_I32 || a < -FIXMAX_I32 || b < -FIXMAX_I32 {
        if divisor == 1 {
            break;
        }
        a >>= 1;
        b >>= 1;
        divisor >>= 1;
    }
    let t = t as i64;
    let sum = b as i64 * t + a as i64 * (FIXMAX_I32 as i64 - t);
    (sum / divisor as i64) as i32
}

/// Position of `t` between `a` and `b`, as a fixed value
///
/// Clamped to `0..=FIXMAX`; works with `b < a` and with `a == b`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn fixed_unlerp(a: i32, b: i32, t: i32) -> Fixed {
    let mut n = t as i64 - a as i64;
    let mut d = b as i64 - a as i64;
    if d < 0 {
        d = -d;
        n = -n;
    }
    if n <= 0 {
        return 0;
    }
    if n >= d {
        return FIXMAX;
    }
    while n > FIXMAX_I32 as i64 {
        n >>= 1;
        d >>= 1;
    }
    (n * FIXMAX_I32 as i64 / d) as Fixed
}

/// Saturate `value` to `lo..=hi`
#[inline]
pub const fn clamp(lo: i32, hi: i32, value: i32) -> i32 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Saturate to the fixed range
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn fixed_clamp(x: i32) -> Fixed {
    clamp(0, FIXMAX_I32, x) as Fixed
}

/// `a * n / d` with a wide intermediate
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn muldiv(a: i32, n: i32, d: i32) -> i32 {
    (a as i64 * n as i64 / d as i64) as i32
}

#[inline]
pub const fn pixels_to_fpixels(pixels: i32) -> Fpixels {
    pixels * FPIXELS_PER_PIXEL
}

#[inline]
pub const fn fpixels_round_up(x: Fpixels) -> i32 {
    (x + FPIXELS_PER_PIXEL - 1) >> 6
}

#[inline]
pub const fn fpixels_round_down(x: Fpixels) -> i32 {
    x >> 6
}

/// Piecewise-linear keyframe curve
///
/// `points` holds `N + 1` control points spread evenly over `0..FIXMAX`.
/// Inputs past the last segment plateau at the final point.
#[allow(clippy::cast_possible_truncation)]
pub const fn spline(i: Fixed, points: &[Fixed]) -> Fixed {
    let segments = points.len().saturating_sub(1);
    if segments == 0 {
        return if points.is_empty() { 0 } else { points[0] };
    }
    let ix = i as u32 * segments as u32;
    let segment = (ix >> 15) as usize;
    let offset = (ix & FRACTION_MASK) as Fixed;
    if segment < segments {
        fixed_lerp_fast(points[segment], points[segment + 1], offset)
    } else {
        points[segments]
    }
}

#[inline]
pub const fn spline2(i: Fixed, points: [Fixed; 3]) -> Fixed {
    spline(i, &points)
}

#[inline]
pub const fn spline4(i: Fixed, points: [Fixed; 5]) -> Fixed {
    spline(i, &points)
}

#[inline]
pub const fn spline6(i: Fixed, points: [Fixed; 7]) -> Fixed {
    spline(i, &points)
}

#[inline]
pub const fn spline8(i: Fixed, points: [Fixed; 9]) -> Fixed {
    spline(i, &points)
}

/// Symmetric triangular pulse peaking at `FIXHALF`
///
/// Each step of `narrow` halves the pulse width.
#[allow(clippy::cast_possible_truncation)]
pub const fn a_ramp(i: Fixed, narrow: u32) -> Fixed {
    let half = FIXHALF as u32;
    let i = i as u32;
    let offset = if i > half { i - half } else { half - i };
    if offset == 0 {
        return FIXMAX;
    }
    if narrow >= u32::BITS || offset > (half >> narrow) {
        return 0;
    }
    let offset = offset << narrow;
    (FIXMAX_U32 - (offset << 1)) as Fixed
}

/// Wrap an arbitrary value onto the hue circle
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn wrap_hue(value: i32) -> Fixed {
    (value & FRACTION_MASK as i32) as Fixed
}
