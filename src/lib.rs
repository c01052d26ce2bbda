#![no_std]

pub mod arena;
pub mod color;
pub mod effect;
pub mod fixed;
pub mod frame_scheduler;
pub mod graph;
pub mod layout;
pub mod random;
pub mod show;
pub mod vector;

pub use arena::{AllocError, POOL_ALLOC_SIZE, PoolAlloc, PoolRegion};
pub use color::{Color, Rgb};
pub use effect::{Effect, EffectId, EffectSlot, FrameContext};
pub use fixed::{FIXHALF, FIXMAX, Fixed};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use graph::{DODECAHEDRON, DirectedEdge, DodecahedronGraph, Turn, graph};
pub use random::RandomSource;
pub use show::{Show, ShowClock, ShowConfig};

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// Per-pixel color destination written by effects
pub trait LedSink {
    /// Set one LED; indices past the end are ignored
    fn set_pixel(&mut self, index: usize, color: Rgb);
}

impl LedSink for [Rgb] {
    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.get_mut(index) {
            *pixel = color;
        }
    }
}
