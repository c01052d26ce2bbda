//! Fixed-capacity entity pool
//!
//! Every discrete effect keeps its live entities in an [`EntityPool`]. A slot
//! is either [`Slot::Inactive`] or holds an active entity, and the pool keeps
//! a running count of active slots so spawn decisions stay O(1).

use crate::fixed::FIXMAX;
use crate::random::RandomSource;

const FIXMAX_U32: u32 = FIXMAX as u32;

/// An entity with a lifetime measured on the fixed scale
pub trait Entity {
    /// Lifetime progress; `FIXMAX` and below means still alive
    fn progress(&self) -> u32;

    fn is_finished(&self) -> bool {
        self.progress() > FIXMAX_U32
    }
}

/// One pool slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    Inactive,
    Active(T),
}

impl<T> Slot<T> {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Fixed array of slots with an active counter
#[derive(Debug, Clone)]
pub struct EntityPool<T, const N: usize> {
    slots: [Slot<T>; N],
    active: usize,
}

impl<T, const N: usize> Default for EntityPool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> EntityPool<T, N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { Slot::Inactive }; N],
            active: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of active slots, tracked incrementally
    pub const fn active_count(&self) -> usize {
        self.active
    }

    /// Number of active slots, recounted from scratch
    pub fn count_active(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub const fn is_full(&self) -> bool {
        self.active >= N
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index)? {
            Slot::Active(entity) => Some(entity),
            Slot::Inactive => None,
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index)? {
            Slot::Active(entity) => Some(entity),
            Slot::Inactive => None,
        }
    }

    /// Place `entity` into the slot at `index`
    ///
    /// Hands the entity back if the slot is taken or out of range.
    pub fn activate(&mut self, index: usize, entity: T) -> Result<(), T> {
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(entity);
        };
        if slot.is_active() {
            return Err(entity);
        }
        *slot = Slot::Active(entity);
        self.active += 1;
        Ok(())
    }

    /// Uniformly random inactive slot, found by probing
    ///
    /// Returns `None` without probing when the pool is full.
    pub fn random_inactive<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        loop {
            let index = rng.index(N);
            if !self.slots[index].is_active() {
                return Some(index);
            }
        }
    }

    /// Activate `entity` in a random free slot
    pub fn spawn<R: RandomSource + ?Sized>(&mut self, rng: &mut R, entity: T) -> Option<usize> {
        let index = self.random_inactive(rng)?;
        self.activate(index, entity).ok()?;
        Some(index)
    }

    /// Deactivate one slot, returning its entity
    pub fn retire(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        match core::mem::replace(slot, Slot::Inactive) {
            Slot::Active(entity) => {
                self.active -= 1;
                Some(entity)
            }
            Slot::Inactive => None,
        }
    }

    /// Deactivate every entity matching `predicate`
    ///
    /// Returns how many were retired.
    pub fn retire_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut retired = 0;
        for slot in &mut self.slots {
            if let Slot::Active(entity) = slot
                && predicate(entity)
            {
                *slot = Slot::Inactive;
                retired += 1;
            }
        }
        self.active -= retired;
        retired
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Active(entity) => Some((index, entity)),
                Slot::Inactive => None,
            })
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Active(entity) => Some((index, entity)),
                Slot::Inactive => None,
            })
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Inactive;
        }
        self.active = 0;
    }
}

impl<T: Entity, const N: usize> EntityPool<T, N> {
    /// Retire entities whose progress passed `FIXMAX`
    pub fn retire_finished(&mut self) -> usize {
        self.retire_where(|entity| entity.is_finished())
    }
}
