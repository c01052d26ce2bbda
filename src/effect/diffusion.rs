//! Diffusion effect
//!
//! A scalar field spreads across the wireframe like heat: every LED relaxes
//! toward the average of its graph neighbors while the whole field slowly
//! drains. Early in the show a pentagon of edges is pushed down hard, so
//! ripples roll outward from it. The field is colored through a randomized
//! banded palette that repeats every quarter of the fixed range.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{Effect, FrameContext};
use crate::LedSink;
use crate::color::{Color, Gradient, GradientRange};
use crate::fixed::{FIXHALF, FIXMAX, Fixed, clamp, fixed_mul, spline8, wrap_hue};
use crate::graph::{DirectedEdge, Turn, graph};
use crate::layout::{LEDS_PER_HALF, TOTAL_LEDS, TOTAL_STRANDS, strand_edge};
use crate::random::RandomSource;

/// Field value everywhere at show start
pub const INITIAL_FIELD: i32 = 1000;

/// Lowest field value; eight of them still sum within `i32`
pub const FIELD_MIN: i32 = i32::MIN / 8;

/// Highest field value
pub const FIELD_MAX: i32 = i32::MAX / 8;

/// Maximum number of palette ranges a show can draw
pub const PALETTE_RANGES: usize = 9;

/// Edges walked around the focal pentagon
const HOTSPOT_EDGES: usize = 5;
/// Strand-local edge the focal pentagon starts from
const FOCAL_STRAND_EDGE: usize = 4;

/// Relaxing scalar field over the LED graph
#[derive(Debug, Clone)]
pub struct DiffusionEffect {
    field: [i32; TOTAL_LEDS],
    next: [i32; TOTAL_LEDS],
    palette: Gradient<PALETTE_RANGES>,
    peak_aggressiveness: Fixed,
    focal_edge: usize,
}

impl Default for DiffusionEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffusionEffect {
    pub const fn new() -> Self {
        Self {
            field: [INITIAL_FIELD; TOTAL_LEDS],
            next: [0; TOTAL_LEDS],
            palette: Gradient::new(),
            peak_aggressiveness: 5,
            focal_edge: FOCAL_STRAND_EDGE,
        }
    }

    pub const fn field(&self) -> &[i32; TOTAL_LEDS] {
        &self.field
    }

    /// Set every LED of the field to `value`, clamped to the field range
    pub fn fill(&mut self, value: i32) {
        self.field = [clamp(FIELD_MIN, FIELD_MAX, value); TOTAL_LEDS];
    }

    pub const fn focal_edge(&self) -> usize {
        self.focal_edge
    }

    /// Advance the field by one frame
    ///
    /// Every LED takes a weighted average of itself and its neighbors, then
    /// loses `aggressiveness`; the LEDs around the middle of the focal
    /// pentagon's edges additionally lose `forcing`. Values bottom out at
    /// [`FIELD_MIN`].
    pub fn step(&mut self, aggressiveness: i32, forcing: i32) {
        let graph = graph();
        for (index, next) in self.next.iter_mut().enumerate() {
            let own = self.field[index];
            let adjacent = graph.adjacent_leds_of(index);
            let mut sum: i32 = adjacent.as_slice().iter().map(|&led| self.field[led]).sum();
            if !adjacent.has_three() {
                sum += own;
            }
            sum += own * 5;
            *next = clamp(FIELD_MIN, FIELD_MAX, (sum >> 3).saturating_sub(aggressiveness));
        }

        let mut hotspot = DirectedEdge::new(self.focal_edge, false);
        for _ in 0..HOTSPOT_EDGES {
            for led in [hotspot.led(LEDS_PER_HALF - 1), hotspot.led(LEDS_PER_HALF)] {
                self.next[led] = clamp(FIELD_MIN, FIELD_MAX, self.next[led].saturating_sub(forcing));
            }
            hotspot = hotspot.successor(Turn::Right);
        }

        self.field = self.next;
    }

    /// Palette position of a field value
    pub const fn palette_index(value: i32) -> Fixed {
        wrap_hue(value.wrapping_shl(2))
    }
}

/// Build this show's banded palette
///
/// Fails only if the palette has fewer than [`PALETTE_RANGES`] slots.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn random_palette<R: RandomSource + ?Sized>(rng: &mut R) -> Result<Gradient<PALETTE_RANGES>, GradientRange> {
    let hue_gap = 4000 + rng.random(8000);
    let mut hue1 = rng.random(u32::from(FIXMAX));
    let mut hue2 = hue1 + hue_gap;
    let hue3 = hue1 + (hue_gap >> 1) + u32::from(FIXHALF);
    if rng.coin() {
        core::mem::swap(&mut hue1, &mut hue2);
    }
    let pure = |hue: u32| Color::from_hue_sat(wrap_hue(hue as i32), FIXMAX).brighten();
    let mut color1 = pure(hue1);
    let mut color2 = pure(hue2);
    let mut color3 = pure(hue3);
    match rng.random(5) {
        1 => color1 = Color::WHITE,
        2 => color2 = Color::WHITE,
        3 => color3 = Color::WHITE,
        4 => {
            color1 = color1.desaturate(FIXHALF);
            color2 = color2.desaturate(FIXHALF);
        }
        _ => {}
    }

    let black = Color::BLACK;
    let mut weight = |extra: u32| 1 + rng.random(extra) as u16;
    let mut palette = Gradient::new();
    palette.add_range(3, black, black)?;
    palette.add_range(2, black, color1)?;
    palette.add_range(weight(4), color1, color1)?;
    palette.add_range(weight(10), color1, color2)?;
    palette.add_range(weight(4), color2, color2)?;
    if weight(2) == 1 {
        palette.add_range(1, color2, color3)?;
    } else {
        palette.add_range(1, color2, black)?;
        palette.add_range(1, black, color3)?;
    }
    palette.add_range(weight(3), color3, color3)?;
    palette.add_range(1, color3, black)?;
    Ok(palette)
}

impl Effect for DiffusionEffect {
    fn initialize_show<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.fill(INITIAL_FIELD);
        self.peak_aggressiveness = 5 << rng.random(4);
        self.palette = random_palette(rng).unwrap_or_default();
        self.focal_edge = strand_edge(rng.index(TOTAL_STRANDS), FOCAL_STRAND_EDGE);

        #[cfg(feature = "esp32-log")]
        println!(
            "[DiffusionEffect.initialize_show] peak_aggressiveness={} focal_edge={} ranges={}",
            self.peak_aggressiveness,
            self.focal_edge,
            self.palette.len()
        );
    }

    fn update<R: RandomSource + ?Sized, S: LedSink + ?Sized>(
        &mut self,
        ctx: &mut FrameContext<'_, R, S>,
    ) -> bool {
        let age = ctx.show_age;
        let ramp = spline8(
            age,
            [0, FIXMAX >> 5, FIXMAX >> 4, FIXMAX >> 3, FIXMAX >> 2, FIXMAX >> 1, FIXMAX, FIXMAX >> 2, 0],
        );
        let aggressiveness = 3 + i32::from(fixed_mul(self.peak_aggressiveness, ramp));
        let forcing = i32::from(spline8(age, [20, 10, 5, 2, 0, 0, 0, 0, 0]));
        let fade_black = spline8(age, [0, FIXMAX, FIXMAX, FIXMAX, FIXMAX, FIXMAX, FIXMAX, FIXMAX, 0]);

        self.step(aggressiveness, forcing);

        for (index, &value) in self.field.iter().enumerate() {
            let color = self.palette.get(Self::palette_index(value));
            ctx.sink.set_pixel(index, color.scale(fade_black).to_rgb8());
        }

        age < FIXMAX
    }
}
