//! Car effect
//!
//! A handful of white cars drive around the wireframe over a slowly rotating
//! rainbow. Each car knows the next few turns it will take, so a long car can
//! be drawn bending around corners before its nose reaches them.

#[cfg(feature = "esp32-log")]
use esp_println::println;
use heapless::Deque;

use super::pool::{Entity, EntityPool};
use super::{Effect, FrameContext};
use crate::LedSink;
use crate::color::Color;
use crate::fixed::{
    FIXMAX, Fixed, Fpixels, clamp, fixed_mul, fixed_unlerp, fpixels_round_down,
    fpixels_round_up, pixels_to_fpixels, spline8, wrap_hue,
};
use crate::graph::{DirectedEdge, Turn};
use crate::layout::{LEDS_PER_EDGE, TOTAL_EDGES, TOTAL_LEDS, edge_forward};
use crate::random::RandomSource;

pub const MAX_CARS: usize = 100;

/// Number of upcoming turns every car has decided on
pub const PLAN_LOOKAHEAD: usize = 3;

#[allow(clippy::cast_possible_wrap)]
const EDGE_FPIXELS: Fpixels = pixels_to_fpixels(LEDS_PER_EDGE as i32);
const LAST_LED: i32 = LEDS_PER_EDGE as i32 - 1;
const BACKGROUND_HUE_STEP: u32 = 20;
const EDGE_HUE_SPACING: u32 = 5000;

/// Brightness profile from tail to nose
#[allow(clippy::cast_possible_truncation)]
const BODY: [Fixed; 9] = [
    0,
    (FIXMAX as u32 * 3 / 8) as Fixed,
    (FIXMAX as u32 * 5 / 8) as Fixed,
    (FIXMAX as u32 * 6 / 8) as Fixed,
    (FIXMAX as u32 * 7 / 8) as Fixed,
    FIXMAX,
    FIXMAX,
    FIXMAX,
    0,
];

/// Queue of upcoming turns
///
/// Always holds exactly [`PLAN_LOOKAHEAD`] turns once built: taking the
/// front turn appends a fresh one at the back.
#[derive(Debug, Clone)]
pub struct TurnPlan {
    inner: Deque<Turn, PLAN_LOOKAHEAD>,
}

impl TurnPlan {
    pub fn new(turns: [Turn; PLAN_LOOKAHEAD]) -> Self {
        let mut inner = Deque::new();
        for turn in turns {
            // Capacity equals the array length
            let _ = inner.push_back(turn);
        }
        Self { inner }
    }

    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::new([rng.turn(), rng.turn(), rng.turn()])
    }

    /// Consume the next turn and schedule `then` after the last one
    pub fn take(&mut self, then: Turn) -> Option<Turn> {
        let next = self.inner.pop_front()?;
        let _ = self.inner.push_back(then);
        Some(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = Turn> + '_ {
        self.inner.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// A car driving along planned turns
#[derive(Debug, Clone)]
pub struct Car {
    /// Edge the tail is on
    pub path: DirectedEdge,
    /// Tail position along `path`
    pub position: Fpixels,
    pub plan: TurnPlan,
    /// Fractional pixels per frame at normal speed
    pub speed: i32,
    /// Lifetime progress
    pub life: u32,
    /// Lifetime progress per frame
    pub aging: u32,
}

impl Car {
    pub fn new(path: DirectedEdge, speed: i32, plan: TurnPlan, aging: u32) -> Self {
        Self {
            path,
            position: 0,
            plan,
            speed,
            life: 0,
            aging,
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let path = DirectedEdge::new(rng.index(TOTAL_EDGES), rng.coin());
        let plan = TurnPlan::random(rng);
        let speed = rng.random(25) as i32 + 10;
        let aging = 40 + rng.random(80);
        Self::new(path, speed, plan, aging)
    }

    /// Drive `distance` fractional pixels, turning onto the planned edge when
    /// the tail crosses a vertex
    pub fn advance<R: RandomSource + ?Sized>(&mut self, distance: Fpixels, rng: &mut R) {
        self.position += distance;
        while self.position >= EDGE_FPIXELS {
            self.position -= EDGE_FPIXELS;
            let Some(turn) = self.plan.take(rng.turn()) else {
                break;
            };
            self.path = self.path.successor(turn);
        }
    }
}

impl Entity for Car {
    fn progress(&self) -> u32 {
        self.life
    }
}

/// Cars over a rotating per-edge rainbow
#[derive(Debug, Clone)]
pub struct CarEffect {
    cars: EntityPool<Car, MAX_CARS>,
    color: [Color; TOTAL_LEDS],
    background_phase: u32,
}

impl Default for CarEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl CarEffect {
    pub const fn new() -> Self {
        Self {
            cars: EntityPool::new(),
            color: [Color::BLACK; TOTAL_LEDS],
            background_phase: 0,
        }
    }

    pub const fn cars(&self) -> &EntityPool<Car, MAX_CARS> {
        &self.cars
    }

    /// Put a car on the sculpture right away
    pub fn launch<R: RandomSource + ?Sized>(&mut self, rng: &mut R, car: Car) -> Option<usize> {
        self.cars.spawn(rng, car)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn paint_background(&mut self) {
        self.background_phase = self.background_phase.wrapping_add(BACKGROUND_HUE_STEP);
        for edge in 0..TOTAL_EDGES {
            let hue = wrap_hue((edge as u32 * EDGE_HUE_SPACING).wrapping_add(self.background_phase) as i32);
            let color = Color::from_hue_sat(hue, FIXMAX).brighten();
            let first = edge_forward(edge, 0);
            self.color[first..first + LEDS_PER_EDGE].fill(color);
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn draw_segment(
        color: &mut [Color; TOTAL_LEDS],
        path: DirectedEdge,
        intensity: Fixed,
        start: Fpixels,
        end: Fpixels,
    ) {
        let first = clamp(0, LAST_LED, fpixels_round_up(start));
        let last = clamp(0, LAST_LED, fpixels_round_down(end));
        for px in first..=last {
            let offset = fixed_unlerp(start, end, pixels_to_fpixels(px));
            let bright = fixed_mul(spline8(offset, BODY), intensity);
            let index = path.led(px as usize);
            color[index] = color[index].saturating_add(Color::splat(bright));
        }
    }

    /// Draw the whole car, following its plan past the end of its edge
    fn draw_car(color: &mut [Color; TOTAL_LEDS], car: &Car, intensity: Fixed, length: Fpixels) {
        let mut path = car.path;
        let mut start = car.position;
        let mut end = start + length;
        let mut turns = car.plan.iter();
        loop {
            Self::draw_segment(color, path, intensity, start, end);
            if end < EDGE_FPIXELS {
                break;
            }
            let Some(turn) = turns.next() else {
                break;
            };
            start -= EDGE_FPIXELS;
            end -= EDGE_FPIXELS;
            path = path.successor(turn);
        }
    }
}

impl Effect for CarEffect {
    fn initialize_show<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.cars.clear();
        self.color = [Color::BLACK; TOTAL_LEDS];
        self.background_phase = rng.random(u32::from(FIXMAX));

        #[cfg(feature = "esp32-log")]
        println!("[CarEffect.initialize_show] background_phase={}", self.background_phase);
    }

    fn update<R: RandomSource + ?Sized, S: LedSink + ?Sized>(
        &mut self,
        ctx: &mut FrameContext<'_, R, S>,
    ) -> bool {
        let age = ctx.show_age;
        let intensity = spline8(
            age,
            [0, FIXMAX / 5, FIXMAX / 7, FIXMAX / 10, FIXMAX / 7, FIXMAX / 2, FIXMAX / 3, FIXMAX / 2, FIXMAX],
        );
        let length = Fpixels::from(spline8(
            age,
            [80 * 64, 80 * 64, 40 * 64, 20 * 64, 80 * 64, 80 * 64, 80 * 64, 40 * 64, 20 * 64],
        ));
        let speed_multiplier = i32::from(spline8(age, [100, 100, 50, 300, 200, 100, 30, 150, 200]));
        let fade_black = spline8(age, [0, FIXMAX, FIXMAX, FIXMAX, FIXMAX, FIXMAX, FIXMAX, FIXMAX, 0]);
        let desired = usize::from(spline8(age, [3, 3, 3, 4, 5, 4, 3, 3, 2]));

        self.cars.retire_finished();
        while self.cars.active_count() < desired {
            let car = Car::random(&mut *ctx.rng);
            if self.cars.spawn(&mut *ctx.rng, car).is_none() {
                break;
            }
        }

        self.paint_background();

        for (_, car) in self.cars.iter_active_mut() {
            Self::draw_car(&mut self.color, car, intensity, length);
            car.advance(car.speed * speed_multiplier / 100, &mut *ctx.rng);
            car.life += car.aging;
        }

        for (index, color) in self.color.iter().enumerate() {
            ctx.sink.set_pixel(index, color.scale(fade_black).to_rgb8());
        }

        age < FIXMAX
    }
}
