//! Constant-brightness hue wheel
//!
//! The wheel is split into six sectors of four steps. Every table entry has
//! channels summing to `FIXMAX`, so hues differ in tint but not in power draw.

use super::Color;
use crate::fixed::{FIXMAX, Fixed, wrap_hue};

const STEPS_PER_SECTOR: usize = 4;
const SECTORS: usize = 6;
const HUE_STEPS: usize = STEPS_PER_SECTOR * SECTORS;
const STEP_SIZE: u32 = (FIXMAX as u32) / STEPS_PER_SECTOR as u32;

const HUE_TABLE: [Color; HUE_STEPS + 1] = build_hue_table();

#[allow(clippy::cast_possible_truncation)]
const fn hue_curve(offset: u32) -> Fixed {
    (FIXMAX as u32 - (offset >> 1)) as Fixed
}

#[allow(clippy::cast_possible_truncation)]
const fn hue_step(step: usize) -> Color {
    let sector = (step / STEPS_PER_SECTOR) % SECTORS;
    let rising = (step % STEPS_PER_SECTOR) as u32 * STEP_SIZE;
    let falling = FIXMAX as u32 - rising;
    match sector {
        0 => {
            let r = hue_curve(rising);
            Color::new(r, FIXMAX - r, 0)
        }
        1 => {
            let g = hue_curve(falling);
            Color::new(FIXMAX - g, g, 0)
        }
        2 => {
            let g = hue_curve(rising);
            Color::new(0, g, FIXMAX - g)
        }
        3 => {
            let b = hue_curve(falling);
            Color::new(0, FIXMAX - b, b)
        }
        4 => {
            let b = hue_curve(rising);
            Color::new(FIXMAX - b, 0, b)
        }
        _ => {
            let r = hue_curve(falling);
            Color::new(r, 0, FIXMAX - r)
        }
    }
}

const fn build_hue_table() -> [Color; HUE_STEPS + 1] {
    let mut table = [Color::BLACK; HUE_STEPS + 1];
    let mut step = 0;
    while step <= HUE_STEPS {
        table[step] = hue_step(step);
        step += 1;
    }
    table
}

/// Fully saturated color for `hue`, which wraps at `FIXMAX`
#[allow(clippy::cast_possible_truncation)]
pub(super) const fn constant_hue(hue: Fixed) -> Color {
    let hue = wrap_hue(hue as i32) as u32;
    let scaled = hue * HUE_STEPS as u32;
    let step = (scaled >> 15) as usize;
    let offset = (scaled & 0x7FFF) as Fixed;
    HUE_TABLE[step].lerp(HUE_TABLE[step + 1], offset)
}
