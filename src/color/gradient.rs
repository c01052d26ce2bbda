use heapless::Vec;

use super::Color;
use crate::fixed::{FIXMAX, Fixed};

/// One weighted stretch of a [`Gradient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientRange {
    /// Relative share of the gradient covered by this range
    pub weight: u16,
    pub from: Color,
    pub to: Color,
}

/// Palette made of weighted linear color ranges
///
/// Sampling position `0..FIXMAX` walks through the ranges in insertion
/// order, each occupying a share proportional to its weight.
#[derive(Debug, Clone, Default)]
pub struct Gradient<const N: usize> {
    ranges: Vec<GradientRange, N>,
    total_weight: u32,
}

impl<const N: usize> Gradient<N> {
    pub const fn new() -> Self {
        Self {
            ranges: Vec::new(),
            total_weight: 0,
        }
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
        self.total_weight = 0;
    }

    /// Append a range
    ///
    /// Returns the range if the gradient is full. Zero-weight ranges are
    /// accepted but never sampled.
    pub fn add_range(&mut self, weight: u16, from: Color, to: Color) -> Result<(), GradientRange> {
        let range = GradientRange { weight, from, to };
        self.ranges.push(range)?;
        self.total_weight += u32::from(weight);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sample the gradient at `t`
    ///
    /// Values at or past `FIXMAX` return the end color of the last range.
    #[allow(clippy::cast_possible_truncation)]
    pub fn get(&self, t: Fixed) -> Color {
        let Some(last) = self.ranges.last() else {
            return Color::BLACK;
        };
        let mut position = u32::from(t) * self.total_weight;
        for range in &self.ranges {
            let weight = u32::from(range.weight);
            let span = weight * u32::from(FIXMAX);
            if position < span {
                let local = (position / weight) as Fixed;
                return range.from.lerp(range.to, local);
            }
            position -= span;
        }
        last.to
    }
}
