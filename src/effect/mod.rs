//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait and runs for one show at a time.

mod car;
mod comet;
mod diffusion;
mod pool;
mod spot;

pub use car::{Car, CarEffect, MAX_CARS, PLAN_LOOKAHEAD, TurnPlan};
pub use comet::{Comet, CometEffect, MAX_COMETS};
pub use diffusion::{DiffusionEffect, FIELD_MAX, FIELD_MIN, INITIAL_FIELD, PALETTE_RANGES};
pub use pool::{Entity, EntityPool, Slot};
pub use spot::{MAX_ACTIVE_SPOTS, SPOT_CLASSES, SPOT_PHASES, Spot, SpotClass, SpotEffect};

use crate::LedSink;
use crate::color::Rgb;
use crate::fixed::Fixed;
use crate::layout::TOTAL_LEDS;
use crate::random::RandomSource;

const EFFECT_NAME_COMET: &str = "comet";
const EFFECT_NAME_CARS: &str = "cars";
const EFFECT_NAME_SPOTS: &str = "spots";
const EFFECT_NAME_DIFFUSION: &str = "diffusion";

const EFFECT_ID_COMET: u8 = 0;
const EFFECT_ID_CARS: u8 = 1;
const EFFECT_ID_SPOTS: u8 = 2;
const EFFECT_ID_DIFFUSION: u8 = 3;

/// Everything an effect needs to render one frame
pub struct FrameContext<'a, R: ?Sized, S: ?Sized> {
    /// Show progress, `FIXMAX` at the end of the show
    pub show_age: Fixed,
    pub rng: &'a mut R,
    pub sink: &'a mut S,
}

impl<'a, R: RandomSource + ?Sized, S: LedSink + ?Sized> FrameContext<'a, R, S> {
    pub fn new(show_age: Fixed, rng: &'a mut R, sink: &'a mut S) -> Self {
        Self {
            show_age,
            rng,
            sink,
        }
    }
}

pub trait Effect {
    /// Reset all state and draw this show's random parameters
    fn initialize_show<R: RandomSource + ?Sized>(&mut self, rng: &mut R);

    /// Render a single frame, writing every LED to the sink
    ///
    /// Returns `false` once the show is over.
    fn update<R: RandomSource + ?Sized, S: LedSink + ?Sized>(
        &mut self,
        ctx: &mut FrameContext<'_, R, S>,
    ) -> bool;
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone, Default)]
#[allow(clippy::large_enum_variant)]
pub enum EffectSlot {
    /// No show running; renders black
    #[default]
    Idle,
    /// Comets streaking along single edges
    Comet(CometEffect),
    /// Cars following planned turns over a rainbow
    Cars(CarEffect),
    /// Quota-driven pulsing spots
    Spots(SpotEffect),
    /// Diffusing scalar field
    Diffusion(DiffusionEffect),
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Comet = EFFECT_ID_COMET,
    Cars = EFFECT_ID_CARS,
    Spots = EFFECT_ID_SPOTS,
    Diffusion = EFFECT_ID_DIFFUSION,
}

impl EffectId {
    pub const ALL: [Self; 4] = [Self::Comet, Self::Cars, Self::Spots, Self::Diffusion];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_COMET => Self::Comet,
            EFFECT_ID_CARS => Self::Cars,
            EFFECT_ID_SPOTS => Self::Spots,
            EFFECT_ID_DIFFUSION => Self::Diffusion,
            _ => return None,
        })
    }

    /// Fresh, not yet initialized effect
    pub fn to_slot(self) -> EffectSlot {
        match self {
            Self::Comet => EffectSlot::Comet(CometEffect::new()),
            Self::Cars => EffectSlot::Cars(CarEffect::new()),
            Self::Spots => EffectSlot::Spots(SpotEffect::new()),
            Self::Diffusion => EffectSlot::Diffusion(DiffusionEffect::new()),
        }
    }

    /// Bytes the effect occupies while a show runs
    pub const fn footprint(self) -> usize {
        match self {
            Self::Comet => size_of::<CometEffect>(),
            Self::Cars => size_of::<CarEffect>(),
            Self::Spots => size_of::<SpotEffect>(),
            Self::Diffusion => size_of::<DiffusionEffect>(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comet => EFFECT_NAME_COMET,
            Self::Cars => EFFECT_NAME_CARS,
            Self::Spots => EFFECT_NAME_SPOTS,
            Self::Diffusion => EFFECT_NAME_DIFFUSION,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_COMET => Some(Self::Comet),
            EFFECT_NAME_CARS => Some(Self::Cars),
            EFFECT_NAME_SPOTS => Some(Self::Spots),
            EFFECT_NAME_DIFFUSION => Some(Self::Diffusion),
            _ => None,
        }
    }
}

impl EffectSlot {
    /// Prepare the current effect for a new show
    pub fn initialize_show<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        match self {
            Self::Idle => {}
            Self::Comet(effect) => effect.initialize_show(rng),
            Self::Cars(effect) => effect.initialize_show(rng),
            Self::Spots(effect) => effect.initialize_show(rng),
            Self::Diffusion(effect) => effect.initialize_show(rng),
        }
    }

    /// Render the current effect
    ///
    /// An idle slot blanks every LED and reports the show as finished.
    pub fn update<R: RandomSource + ?Sized, S: LedSink + ?Sized>(
        &mut self,
        ctx: &mut FrameContext<'_, R, S>,
    ) -> bool {
        match self {
            Self::Idle => {
                for index in 0..TOTAL_LEDS {
                    ctx.sink.set_pixel(index, Rgb::default());
                }
                false
            }
            Self::Comet(effect) => effect.update(ctx),
            Self::Cars(effect) => effect.update(ctx),
            Self::Spots(effect) => effect.update(ctx),
            Self::Diffusion(effect) => effect.update(ctx),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> Option<EffectId> {
        match self {
            Self::Idle => None,
            Self::Comet(_) => Some(EffectId::Comet),
            Self::Cars(_) => Some(EffectId::Cars),
            Self::Spots(_) => Some(EffectId::Spots),
            Self::Diffusion(_) => Some(EffectId::Diffusion),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
