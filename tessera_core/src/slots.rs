// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded slot allocation shared by the surface and controller registries.

use alloc::vec::Vec;

/// Outcome of [`Slots::allocate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Allocation {
    /// A previously freed slot was reused; per-slot arrays must be reset.
    Reused { idx: u32, generation: u32 },
    /// A brand-new slot was appended; per-slot arrays must be pushed.
    Fresh { idx: u32, generation: u32 },
}

/// Generation counters, liveness, and a free list for a fixed-capacity table.
///
/// Live slot count never exceeds `capacity`. Freed slots are recycled
/// lowest-index first so handle indices stay small and dense.
#[derive(Clone, Debug)]
pub(crate) struct Slots {
    generation: Vec<u32>,
    live: Vec<bool>,
    free_list: Vec<u32>,
    live_count: usize,
    capacity: usize,
}

impl Slots {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            generation: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live_count: 0,
            capacity,
        }
    }

    /// Returns `None` when `capacity` slots are already live.
    pub(crate) fn allocate(&mut self) -> Option<Allocation> {
        if self.live_count >= self.capacity {
            return None;
        }

        // Lowest freed index first.
        let lowest_free = self
            .free_list
            .iter()
            .enumerate()
            .min_by_key(|&(_, idx)| *idx)
            .map(|(pos, _)| pos);

        if let Some(pos) = lowest_free {
            let idx = self.free_list.swap_remove(pos);
            self.live[idx as usize] = true;
            self.live_count += 1;
            return Some(Allocation::Reused {
                idx,
                generation: self.generation[idx as usize],
            });
        }

        let idx = u32::try_from(self.generation.len()).ok()?;
        self.generation.push(0);
        self.live.push(true);
        self.live_count += 1;
        Some(Allocation::Fresh { idx, generation: 0 })
    }

    /// Frees a live slot and bumps its generation so old handles go stale.
    pub(crate) fn free(&mut self, idx: u32) {
        debug_assert!(self.live[idx as usize], "freeing a dead slot {idx}");
        self.live[idx as usize] = false;
        self.generation[idx as usize] = self.generation[idx as usize].wrapping_add(1);
        self.free_list.push(idx);
        self.live_count -= 1;
    }

    pub(crate) fn is_live(&self, idx: u32, generation: u32) -> bool {
        (idx as usize) < self.live.len()
            && self.live[idx as usize]
            && self.generation[idx as usize] == generation
    }

    /// Returns the current generation of slot `idx` if it is live.
    pub(crate) fn live_generation(&self, idx: u32) -> Option<u32> {
        let i = idx as usize;
        (i < self.live.len() && self.live[i]).then(|| self.generation[i])
    }

    /// Number of slots ever allocated (live or free).
    pub(crate) fn slot_count(&self) -> u32 {
        // Bounded by `capacity`, which is a small configured value.
        u32::try_from(self.live.len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.live_count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_slots_are_dense() {
        let mut slots = Slots::with_capacity(3);
        assert_eq!(
            slots.allocate(),
            Some(Allocation::Fresh {
                idx: 0,
                generation: 0
            })
        );
        assert_eq!(
            slots.allocate(),
            Some(Allocation::Fresh {
                idx: 1,
                generation: 0
            })
        );
        assert_eq!(slots.live_count(), 2);
    }

    #[test]
    fn capacity_is_enforced_on_live_slots() {
        let mut slots = Slots::with_capacity(1);
        assert!(slots.allocate().is_some());
        assert!(slots.allocate().is_none());
        slots.free(0);
        assert!(slots.allocate().is_some(), "freed slot makes room again");
    }

    #[test]
    fn reuse_bumps_generation_and_prefers_low_index() {
        let mut slots = Slots::with_capacity(4);
        for _ in 0..3 {
            let _ = slots.allocate();
        }
        slots.free(2);
        slots.free(0);
        assert!(!slots.is_live(0, 0));
        assert_eq!(
            slots.allocate(),
            Some(Allocation::Reused {
                idx: 0,
                generation: 1
            })
        );
        assert_eq!(slots.live_generation(2), None);
        assert_eq!(slots.slot_count(), 3);
    }
}
