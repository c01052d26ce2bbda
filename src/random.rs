//! Random source abstraction
//!
//! Effects only need uniform integers; seeding and the generator itself are
//! chosen by the caller.

use crate::graph::Turn;

/// Uniform integer source
pub trait RandomSource {
    /// Uniform value in `0..bound`, or 0 when `bound` is 0
    fn random(&mut self, bound: u32) -> u32;

    /// Fair coin flip
    fn coin(&mut self) -> bool {
        self.random(2) == 0
    }

    /// Uniform index into a collection of `len` items
    #[allow(clippy::cast_possible_truncation)]
    fn index(&mut self, len: usize) -> usize {
        self.random(len as u32) as usize
    }

    /// Pick one of the given constants
    ///
    /// Repeating a value weights it, so `[20, 40, 100, 100]` returns 100 half
    /// of the time. `choices` must not be empty.
    fn pick<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.index(choices.len())]
    }

    /// Random left or right turn
    fn turn(&mut self) -> Turn {
        if self.coin() { Turn::Left } else { Turn::Right }
    }
}

impl RandomSource for fastrand::Rng {
    fn random(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.u32(0..bound)
    }
}

