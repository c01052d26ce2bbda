use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::LedSink;
use crate::arena::{AllocError, POOL_ALLOC_SIZE, PoolAlloc, PoolRegion};
use crate::effect::{EffectId, EffectSlot, FrameContext};
use crate::fixed::{FIXMAX, Fixed};
use crate::random::RandomSource;

/// Show length used when none is configured
pub const DEFAULT_SHOW_DURATION: Duration = Duration::from_secs(60);

/// Maps wall-clock time onto show progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowClock {
    start: Instant,
    duration: Duration,
}

impl ShowClock {
    pub const fn new(start: Instant, duration: Duration) -> Self {
        Self { start, duration }
    }

    pub const fn start(&self) -> Instant {
        self.start
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Show progress at `now`, from 0 at the start to `FIXMAX` at the end
    ///
    /// Times before the start read as 0, times past the end as `FIXMAX`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn age(&self, now: Instant) -> Fixed {
        let total = self.duration.as_ticks();
        if total == 0 {
            return FIXMAX;
        }
        let elapsed = now.saturating_duration_since(self.start).as_ticks();
        let age = u128::from(elapsed) * u128::from(FIXMAX) / u128::from(total);
        age.min(u128::from(FIXMAX)) as Fixed
    }
}

/// Which effect to run and for how long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowConfig {
    pub effect: EffectId,
    pub duration: Duration,
}

impl ShowConfig {
    pub const fn new(effect: EffectId) -> Self {
        Self {
            effect,
            duration: DEFAULT_SHOW_DURATION,
        }
    }

    pub const fn with_duration(self, duration: Duration) -> Self {
        Self { duration, ..self }
    }
}

/// One running show: its clock, its effect and the arena budgeting it
pub struct Show<const ARENA: usize = POOL_ALLOC_SIZE> {
    arena: PoolAlloc<ARENA>,
    region: Option<PoolRegion>,
    clock: ShowClock,
    effect: EffectSlot,
}

impl<const ARENA: usize> Default for Show<ARENA> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ARENA: usize> Show<ARENA> {
    /// Idle show; renders black until started
    pub const fn new() -> Self {
        Self {
            arena: PoolAlloc::new(),
            region: None,
            clock: ShowClock::new(Instant::from_ticks(0), Duration::from_ticks(0)),
            effect: EffectSlot::Idle,
        }
    }

    /// Begin a new show at `now`
    ///
    /// Releases everything the previous show reserved, then reserves the new
    /// effect's footprint. If the arena cannot hold it the show stays idle and
    /// the error is returned.
    pub fn start<R: RandomSource + ?Sized>(
        &mut self,
        config: &ShowConfig,
        now: Instant,
        rng: &mut R,
    ) -> Result<(), AllocError> {
        self.arena.clear();
        self.region = None;
        self.effect = EffectSlot::Idle;
        self.clock = ShowClock::new(now, config.duration);

        let region = self.arena.alloc(config.effect.footprint())?;
        self.region = Some(region);

        let mut effect = config.effect.to_slot();
        effect.initialize_show(rng);
        self.effect = effect;

        #[cfg(feature = "esp32-log")]
        println!(
            "[Show.start] effect={} reserved={} bytes duration={}ms",
            config.effect.as_str(),
            region.len(),
            config.duration.as_millis()
        );

        Ok(())
    }

    /// Render one frame into `sink`
    ///
    /// Returns whether the show is still running.
    pub fn update<R: RandomSource + ?Sized, S: LedSink + ?Sized>(
        &mut self,
        now: Instant,
        rng: &mut R,
        sink: &mut S,
    ) -> bool {
        let mut ctx = FrameContext::new(self.clock.age(now), rng, sink);
        self.effect.update(&mut ctx)
    }

    pub const fn clock(&self) -> &ShowClock {
        &self.clock
    }

    pub const fn effect(&self) -> &EffectSlot {
        &self.effect
    }

    pub fn effect_id(&self) -> Option<EffectId> {
        self.effect.id()
    }

    pub const fn arena(&self) -> &PoolAlloc<ARENA> {
        &self.arena
    }

    /// Arena region reserved for the running effect
    pub fn region(&self) -> Option<PoolRegion> {
        self.region.filter(|region| self.arena.is_live(*region))
    }
}
