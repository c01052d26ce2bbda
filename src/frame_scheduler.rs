//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::arena::{AllocError, POOL_ALLOC_SIZE};
use crate::color::Rgb;
use crate::layout::TOTAL_LEDS;
use crate::random::RandomSource;
use crate::show::{Show, ShowConfig};
use crate::OutputDriver;

/// Default target frame rate (90 FPS).
pub const DEFAULT_FPS: u32 = 90;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether the current show is still running.
    pub running: bool,
}

/// Portable frame scheduler that manages timing without async.
///
/// This scheduler:
/// - Tracks frame timing with drift correction
/// - Renders one show frame per tick and hands it to the output driver
/// - Returns timing info so the caller can sleep appropriately
///
/// Picking the next show once `running` turns false is left to the caller.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(driver, fastrand::Rng::with_seed(seed));
/// scheduler.start_show(&ShowConfig::new(EffectId::Comet), now())?;
///
/// loop {
///     let result = scheduler.tick(now());
///     if !result.running {
///         scheduler.start_show(&next_config(), now())?;
///     }
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<O: OutputDriver, R: RandomSource, const ARENA: usize = POOL_ALLOC_SIZE> {
    output: O,
    rng: R,
    show: Show<ARENA>,
    frame: [Rgb; TOTAL_LEDS],
    next_frame: Instant,
    frame_duration: Duration,
}

impl<O: OutputDriver, R: RandomSource, const ARENA: usize> FrameScheduler<O, R, ARENA> {
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (90 FPS) for frame timing.
    pub fn new(driver: O, rng: R) -> Self {
        Self::with_frame_duration(driver, rng, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(driver: O, rng: R, frame_duration: Duration) -> Self {
        Self {
            output: driver,
            rng,
            show: Show::new(),
            frame: [Rgb::default(); TOTAL_LEDS],
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Start a new show beginning at `now`.
    pub fn start_show(&mut self, config: &ShowConfig, now: Instant) -> Result<(), AllocError> {
        self.show.start(config, now, &mut self.rng)
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Renders the current show frame
    /// 3. Writes to the output driver
    /// 4. Returns the deadline for the next frame
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            #[cfg(feature = "esp32-log")]
            println!(
                "[FrameScheduler.tick] drift reset: {}ms behind",
                (now - self.next_frame).as_millis()
            );
            self.next_frame = now;
        }

        let running = self.show.update(now, &mut self.rng, &mut self.frame[..]);
        self.output.write(&self.frame);

        self.next_frame += self.frame_duration;

        // Calculate sleep duration (may be zero if we're behind)
        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            running,
        }
    }

    /// Most recently rendered frame.
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    /// Get a reference to the running show.
    pub fn show(&self) -> &Show<ARENA> {
        &self.show
    }

    /// Get a reference to the output driver.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the output driver.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
