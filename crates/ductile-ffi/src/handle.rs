//! Generation-checked handle table for container lifetimes across the C
//! boundary.
//!
//! A handle packs a slot index (upper 32 bits) and a generation (lower 32
//! bits). Removing a value bumps the slot's generation, so a handle kept
//! after `destroy` no longer resolves and a second `destroy` is a harmless
//! `None`. Generations start at 1, which keeps `0` free as a "no handle"
//! value for C callers.

const FIRST_GENERATION: u32 = 1;

fn pack(index: u32, generation: u32) -> u64 {
    (u64::from(index) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Maps `u64` handles to owned values, recycling vacant slots.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `value` and return its handle.
    ///
    /// Reuses the most recently freed slot; a free-list entry that no longer
    /// names a vacant slot is skipped.
    pub fn insert(&mut self, value: T) -> u64 {
        while let Some(index) = self.free_list.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                if slot.value.is_none() {
                    slot.value = Some(value);
                    return pack(index, slot.generation);
                }
            }
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: FIRST_GENERATION,
            value: Some(value),
        });
        pack(index, FIRST_GENERATION)
    }

    /// The value behind `handle`, or `None` if it is stale or never existed.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (index, generation) = unpack(handle);
        let slot = self.slots.get(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Take the value behind `handle` out of the table.
    ///
    /// The slot goes back on the free list under the next generation, or is
    /// retired if the generation counter would wrap.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (index, generation) = unpack(handle);
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free_list.push(index);
        }
        Some(value)
    }
}
