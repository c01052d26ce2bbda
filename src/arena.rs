//! Show-scoped memory budget
//!
//! Effects are large, and only one runs at a time. Each show reserves its
//! effect's footprint from a fixed budget that is cleared in one step when
//! the next show starts. The effect itself lives in
//! [`EffectSlot`](crate::effect::EffectSlot); the budget only decides whether
//! it may be built.
//!
//! ```text
//! Budget: [====granted====|----available----]
//!         ^               ^                 ^
//!         0               used              SIZE
//! ```
//!
//! Grants are [`PoolRegion`] handles. A handle records the budget generation
//! it was issued in, so once [`PoolAlloc::clear`] runs every earlier handle
//! stops being live instead of aliasing new grants.

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Default budget in bytes
pub const POOL_ALLOC_SIZE: usize = 65536;

/// Every grant is rounded up to this many bytes
pub const POOL_ALIGN: usize = 8;

/// Error returned when the arena cannot satisfy a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    /// Requested size after rounding
    pub requested: usize,
    /// Bytes still available
    pub remaining: usize,
}

/// Handle to a granted byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRegion {
    offset: usize,
    len: usize,
    generation: u32,
}

impl PoolRegion {
    /// Start of the region within the budget
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Granted size in bytes, including rounding
    pub const fn len(self) -> usize {
        self.len
    }

    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// First byte past the region
    pub const fn end(self) -> usize {
        self.offset + self.len
    }
}

/// Bump ledger over `SIZE` bytes with bulk reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAlloc<const SIZE: usize = POOL_ALLOC_SIZE> {
    used: usize,
    generation: u32,
}

impl<const SIZE: usize> Default for PoolAlloc<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> PoolAlloc<SIZE> {
    pub const fn new() -> Self {
        Self {
            used: 0,
            generation: 0,
        }
    }

    /// Grant `nbytes`, rounded up to [`POOL_ALIGN`]
    ///
    /// Fails without granting anything if the rounded size does not fit.
    pub fn alloc(&mut self, nbytes: usize) -> Result<PoolRegion, AllocError> {
        let requested = nbytes
            .checked_next_multiple_of(POOL_ALIGN)
            .unwrap_or(usize::MAX);
        let remaining = self.remaining();
        if requested > remaining {
            #[cfg(feature = "esp32-log")]
            println!(
                "[PoolAlloc.alloc] failed: requested {} bytes, {} remaining",
                requested, remaining
            );
            return Err(AllocError {
                requested,
                remaining,
            });
        }
        let region = PoolRegion {
            offset: self.used,
            len: requested,
            generation: self.generation,
        };
        self.used += requested;
        Ok(region)
    }

    /// Release every grant at once
    ///
    /// Regions handed out before the call no longer resolve.
    pub fn clear(&mut self) {
        self.used = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether `region` was granted since the last clear
    pub const fn is_live(&self, region: PoolRegion) -> bool {
        region.generation == self.generation && region.offset + region.len <= self.used
    }

    pub const fn used(&self) -> usize {
        self.used
    }

    pub const fn capacity(&self) -> usize {
        SIZE
    }

    pub const fn remaining(&self) -> usize {
        SIZE - self.used
    }
}
