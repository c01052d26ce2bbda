//! Spot effect
//!
//! Single LEDs pulse white-hot and fade back through their class color. Three
//! color classes compete for spots, and the show moves through phases that
//! hand most of the quota to one class at a time.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::pool::{Entity, EntityPool};
use super::{Effect, FrameContext};
use crate::LedSink;
use crate::color::Color;
use crate::fixed::{FIXMAX, Fixed, a_ramp, fixed_clamp, fixed_lerp_fast, fixed_mul, fixed_sqr};
use crate::layout::TOTAL_LEDS;
use crate::random::RandomSource;

pub const SPOT_CLASSES: usize = 3;
pub const SPOT_PHASES: usize = 8;

/// Upper bound on lit spots across all classes
pub const MAX_ACTIVE_SPOTS: usize = TOTAL_LEDS / 2;

const PHASE_INTENSITY: [Fixed; SPOT_PHASES] = [0, 3000, 5000, 8000, 10000, 30000, 3000, 0];
const MINOR_QUANTITY: Fixed = FIXMAX / 20;
const FIXMAX_U32: u32 = FIXMAX as u32;

/// One pulsing LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spot {
    pub class: usize,
    /// Pulse progress
    pub stage: u32,
    pub speed: u32,
}

impl Entity for Spot {
    fn progress(&self) -> u32 {
        self.stage
    }
}

/// A color competing for spots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotClass {
    pub hue: Fixed,
    /// Share of the spot budget per phase
    pub quantity: [Fixed; SPOT_PHASES],
    /// Spots currently lit in this class
    pub active: usize,
    /// Spots this class wants lit this frame
    pub desire: usize,
}

impl SpotClass {
    const EMPTY: Self = Self {
        hue: 0,
        quantity: [MINOR_QUANTITY; SPOT_PHASES],
        active: 0,
        desire: 0,
    };
}

/// Quota-driven pulsing spots, one slot per LED
#[derive(Debug, Clone)]
pub struct SpotEffect {
    spots: EntityPool<Spot, TOTAL_LEDS>,
    classes: [SpotClass; SPOT_CLASSES],
    phase_intensity: [Fixed; SPOT_PHASES],
    phase_speed: [Fixed; SPOT_PHASES],
}

impl Default for SpotEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotEffect {
    pub const fn new() -> Self {
        Self {
            spots: EntityPool::new(),
            classes: [SpotClass::EMPTY; SPOT_CLASSES],
            phase_intensity: PHASE_INTENSITY,
            phase_speed: [0; SPOT_PHASES],
        }
    }

    /// Spots, indexed by LED
    pub const fn spots(&self) -> &EntityPool<Spot, TOTAL_LEDS> {
        &self.spots
    }

    pub const fn classes(&self) -> &[SpotClass; SPOT_CLASSES] {
        &self.classes
    }

    /// Lit spots, summed over the class counters
    pub fn total_active(&self) -> usize {
        self.classes.iter().map(|class| class.active).sum()
    }

    /// Phase index and blend toward the following phase
    #[allow(clippy::cast_possible_truncation)]
    fn phase_at(age: Fixed) -> (usize, Fixed) {
        let scaled = u32::from(age) * (SPOT_PHASES as u32 - 1);
        let phase = (scaled / FIXMAX_U32) as usize;
        if phase >= SPOT_PHASES - 1 {
            return (SPOT_PHASES - 2, FIXMAX);
        }
        let offset = (scaled & (FIXMAX_U32 - 1)) as i32;
        (phase, fixed_clamp(offset * 3 / 2))
    }

    fn update_desire(&mut self, phase: usize, offset: Fixed, intensity: Fixed) {
        for class in &mut self.classes {
            let quantity = fixed_lerp_fast(class.quantity[phase], class.quantity[phase + 1], offset);
            let quantity = fixed_mul(quantity, intensity);
            class.desire = MAX_ACTIVE_SPOTS * usize::from(quantity) / usize::from(FIXMAX);
        }
    }

    /// Offer random free LEDs to the classes until none wants one
    fn start_new_spots<R: RandomSource + ?Sized>(&mut self, rng: &mut R, speed: u32) {
        while self.total_active() <= MAX_ACTIVE_SPOTS {
            let Some(index) = self.spots.random_inactive(rng) else {
                break;
            };
            let base = rng.index(SPOT_CLASSES);
            let mut placed = false;
            for step in 0..SPOT_CLASSES {
                let class_index = (base + step) % SPOT_CLASSES;
                let class = &mut self.classes[class_index];
                if class.active >= class.desire {
                    continue;
                }
                let spot = Spot {
                    class: class_index,
                    stage: 0,
                    speed: (speed + rng.random(speed)).max(1),
                };
                if self.spots.activate(index, spot).is_ok() {
                    class.active += 1;
                    placed = true;
                }
                break;
            }
            if !placed {
                break;
            }
        }
    }

    fn retire_finished(&mut self) {
        let classes = &mut self.classes;
        self.spots.retire_where(|spot| {
            if spot.is_finished() {
                classes[spot.class].active -= 1;
                true
            } else {
                false
            }
        });
    }

    #[allow(clippy::cast_possible_truncation)]
    fn spot_color(&self, spot: &Spot) -> Color {
        let stage = spot.stage.min(FIXMAX_U32) as Fixed;
        let ramp0 = a_ramp(stage, 0);
        let ramp1 = a_ramp(stage, 1);
        let ramp2 = a_ramp(stage, 2);
        let pulse1 = fixed_sqr(ramp2);
        let pulse2 = fixed_sqr(pulse1);
        let bright = fixed_clamp(i32::from(ramp0 >> 3) + i32::from(ramp1 >> 3) + i32::from(pulse2));
        let sat = fixed_clamp(i32::from(FIXMAX) - i32::from(pulse1) * 2 / 3);
        let hue = self.classes[spot.class].hue;
        Color::from_hue_sat(hue, sat).brighten().scale(bright)
    }
}

impl Effect for SpotEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn initialize_show<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.classes = [SpotClass::EMPTY; SPOT_CLASSES];
        for class in &mut self.classes {
            class.hue = rng.random(FIXMAX_U32) as Fixed;
        }
        self.phase_intensity = PHASE_INTENSITY;

        for phase in 0..SPOT_PHASES {
            // Drawn from two outcomes; a quartered intensity is never chosen
            if rng.random(2) == 1 {
                self.phase_intensity[phase] /= 2;
            }
            let favored = rng.index(SPOT_CLASSES);
            self.classes[favored].quantity[phase] = FIXMAX;

            let mut speed = fixed_lerp_fast(30, 100, self.phase_intensity[phase]);
            // Same two-outcome draw; the faster 3/2 speed is never chosen
            if rng.random(2) == 1 {
                speed /= 2;
            }
            self.phase_speed[phase] = speed;

            #[cfg(feature = "esp32-log")]
            println!(
                "[SpotEffect.initialize_show] phase {} favors class {} speed={}",
                phase, favored, speed
            );
        }
        self.spots.clear();
    }

    fn update<R: RandomSource + ?Sized, S: LedSink + ?Sized>(
        &mut self,
        ctx: &mut FrameContext<'_, R, S>,
    ) -> bool {
        let age = ctx.show_age;
        let (phase, offset) = Self::phase_at(age);
        let intensity = fixed_lerp_fast(
            self.phase_intensity[phase],
            self.phase_intensity[phase + 1],
            offset,
        );
        let speed = fixed_lerp_fast(self.phase_speed[phase], self.phase_speed[phase + 1], offset);

        self.retire_finished();
        self.update_desire(phase, offset, intensity);
        self.start_new_spots(&mut *ctx.rng, u32::from(speed));

        for index in 0..TOTAL_LEDS {
            let color = match self.spots.get(index) {
                Some(spot) => self.spot_color(spot),
                None => Color::BLACK,
            };
            ctx.sink.set_pixel(index, color.to_rgb8());
        }
        for (_, spot) in self.spots.iter_active_mut() {
            spot.stage += spot.speed;
        }

        age < FIXMAX
    }
}
