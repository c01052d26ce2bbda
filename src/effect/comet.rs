//! Comet effect
//!
//! Short bright streaks race along single edges, leaving a glowing trail that
//! fades at a slightly different rate on every LED. The number of comets
//! swells toward the end of the show and then drops to nothing.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::pool::{Entity, EntityPool};
use super::{Effect, FrameContext};
use crate::LedSink;
use crate::color::Color;
use crate::fixed::{
    FIXMAX, Fixed, clamp, fixed_clamp, fixed_lerp, fixed_unlerp, fpixels_round_down,
    fpixels_round_up, pixels_to_fpixels, spline4, spline8, wrap_hue,
};
use crate::graph::DirectedEdge;
use crate::layout::{LEDS_PER_EDGE, TOTAL_EDGES, TOTAL_LEDS};
use crate::random::RandomSource;

pub const MAX_COMETS: usize = 300;

const DECAY_MULTIPLIERS: [u32; 10] = [20, 40, 80, 90, 100, 100, 100, 100, 110, 150];
const SPEED_MULTIPLIERS: [u32; 10] = [40, 60, 80, 100, 100, 100, 100, 120, 150, 200];
const PEAK_COMETS: [Fixed; 10] = [30, 30, 40, 40, 50, 50, 60, 60, 150, 300];

/// Constant fade subtracted from every channel each frame
const FIXED_DECAY: Fixed = 10;
/// Channel total above which a LED starts washing out to white
const WHITEN_THRESHOLD: i32 = 4000;
const LAST_LED: i32 = LEDS_PER_EDGE as i32 - 1;
#[allow(clippy::cast_possible_truncation)]
const HOTNESS: [Fixed; 5] = [0, FIXMAX / 3, (FIXMAX as u32 * 2 / 3) as Fixed, FIXMAX, 0];

/// A streak travelling along one directed edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comet {
    pub path: DirectedEdge,
    /// Frames to wait before starting
    pub countdown: u16,
    /// Distance covered, `0..=FIXMAX` spans the edge
    pub travel: u32,
    pub speed: u32,
    /// Length in LEDs
    pub size: u16,
    pub hue: Fixed,
}

impl Comet {
    /// Comet at the start of `path` that moves immediately
    pub const fn new(path: DirectedEdge, speed: u32, size: u16, hue: Fixed) -> Self {
        Self {
            path,
            countdown: 0,
            travel: 0,
            speed,
            size,
            hue,
        }
    }

    /// Position of the head and tail along the edge, in fractional pixels
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn span(&self) -> (i32, i32) {
        let length = pixels_to_fpixels(i32::from(self.size));
        let travel = self.travel.min(u32::from(FIXMAX)) as Fixed;
        let lo = fixed_lerp(-length, pixels_to_fpixels(LEDS_PER_EDGE as i32), travel);
        (lo, lo + length)
    }
}

impl Entity for Comet {
    fn progress(&self) -> u32 {
        self.travel
    }
}

/// Comet field with a decaying glow buffer
#[derive(Debug, Clone)]
pub struct CometEffect {
    comets: EntityPool<Comet, MAX_COMETS>,
    decay: [u16; TOTAL_LEDS],
    color: [Color; TOTAL_LEDS],
    hue_base: Fixed,
    hue_range: u32,
    decay_multiplier: u32,
    speed_multiplier: u32,
    peak_comets: Fixed,
}

impl Default for CometEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl CometEffect {
    pub const fn new() -> Self {
        Self {
            comets: EntityPool::new(),
            decay: [0; TOTAL_LEDS],
            color: [Color::BLACK; TOTAL_LEDS],
            hue_base: 0,
            hue_range: 0,
            decay_multiplier: 100,
            speed_multiplier: 100,
            peak_comets: 0,
        }
    }

    pub const fn comets(&self) -> &EntityPool<Comet, MAX_COMETS> {
        &self.comets
    }

    /// Put a comet on the sculpture right away
    pub fn launch<R: RandomSource + ?Sized>(&mut self, rng: &mut R, comet: Comet) -> Option<usize> {
        self.comets.spawn(rng, comet)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn random_comet<R: RandomSource + ?Sized>(&self, rng: &mut R, move_speed: u32) -> Comet {
        let path = DirectedEdge::new(rng.index(TOTAL_EDGES), rng.coin());
        let speed = move_speed + rng.random(move_speed * 3);
        let size = 5 + rng.random(5) as u16;
        let hue = wrap_hue((u32::from(self.hue_base) + rng.random(self.hue_range)) as i32);
        Comet {
            countdown: rng.random(1000) as u16,
            ..Comet::new(path, speed, size, hue)
        }
    }

    fn start_new_comets<R: RandomSource + ?Sized>(&mut self, rng: &mut R, desired: usize, move_speed: u32) {
        while self.comets.active_count() < desired {
            let comet = self.random_comet(rng, move_speed);
            if self.comets.spawn(rng, comet).is_none() {
                break;
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fade(&mut self, decay_speed: u32) {
        let fixed_decay = Color::splat(FIXED_DECAY);
        for (color, decay) in self.color.iter_mut().zip(self.decay.iter()) {
            let amount = (u32::from(*decay) * decay_speed / 100).min(u32::from(FIXMAX)) as Fixed;
            *color = color.scale(FIXMAX - amount).saturating_sub(fixed_decay);
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn draw(color: &mut [Color; TOTAL_LEDS], comet: &Comet) {
        let base = Color::from_hue_sat(comet.hue, FIXMAX);
        let (lo, hi) = comet.span();
        let first = clamp(0, LAST_LED, fpixels_round_up(lo));
        let last = clamp(0, LAST_LED, fpixels_round_down(hi));
        for px in first..=last {
            let offset = fixed_unlerp(lo, hi, pixels_to_fpixels(px));
            let hotness = spline4(offset, HOTNESS);
            let index = comet.path.led(px as usize);
            color[index] = color[index].channel_max(base.scale(hotness));
        }
    }
}

impl Effect for CometEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn initialize_show<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.hue_base = rng.random(u32::from(FIXMAX)) as Fixed;
        self.hue_range = 2000 + rng.random(10000);
        self.decay_multiplier = rng.pick(&DECAY_MULTIPLIERS);
        self.speed_multiplier = rng.pick(&SPEED_MULTIPLIERS);
        self.peak_comets = rng.pick(&PEAK_COMETS);

        for (color, decay) in self.color.iter_mut().zip(self.decay.iter_mut()) {
            *color = Color::BLACK;
            let base = 150 + rng.random(300) as u16;
            *decay = match rng.random(3) {
                0 => base,
                1 => base * 3,
                _ => base * 9,
            };
        }
        self.comets.clear();

        #[cfg(feature = "esp32-log")]
        println!(
            "[CometEffect.initialize_show] hue_base={} hue_range={} decay={} speed={} peak={}",
            self.hue_base,
            self.hue_range,
            self.decay_multiplier,
            self.speed_multiplier,
            self.peak_comets
        );
    }

    fn update<R: RandomSource + ?Sized, S: LedSink + ?Sized>(
        &mut self,
        ctx: &mut FrameContext<'_, R, S>,
    ) -> bool {
        let age = ctx.show_age;
        let peak = self.peak_comets;
        let desired = spline8(age, [2, 2, 3, 5, 10, peak / 2, peak, 2, 0]);
        let move_speed = u32::from(spline8(age, [70, 85, 100, 150, 200, 250, 300, 70, 0]))
            * self.speed_multiplier
            / 100;
        let decay_speed = (50 + u32::from(desired) / 2) * self.decay_multiplier / 100;

        self.comets.retire_finished();
        self.start_new_comets(&mut *ctx.rng, usize::from(desired), move_speed);
        self.fade(decay_speed);

        for (_, comet) in self.comets.iter_active_mut() {
            if comet.countdown > 0 {
                comet.countdown -= 1;
                continue;
            }
            Self::draw(&mut self.color, comet);
            comet.travel += comet.speed;
        }

        for (index, color) in self.color.iter().enumerate() {
            let whiten = fixed_clamp(color.total() - WHITEN_THRESHOLD);
            ctx.sink.set_pixel(index, color.lerp(Color::WHITE, whiten).to_rgb8());
        }

        age < FIXMAX
    }
}
