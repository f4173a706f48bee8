///! Slot arena - growable backing storage with a free list of reusable slots
///!
///! Slot indices are stable for the lifetime of the arena: growth only appends
///! capacity at the end, it never moves or invalidates issued indices. A slot
///! index is semantically owned by whoever holds it between `acquire` and
///! `release`; the free list only tracks availability.

/// Number of slots added per growth step.
pub const GROWTH_CHUNK: usize = 100;

/// Growable slot storage with index-stable handles.
///
/// `acquire` hands out a free slot index, growing the backing storage by
/// [`GROWTH_CHUNK`] when the pool is exhausted. `release` returns a slot for
/// reuse; the caller must have cleared the slot's content first.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<T>,
    free_list: Vec<usize>,
}

impl<T: Default> SlotArena<T> {
    /// Create an arena pre-warmed with one growth chunk.
    pub fn new() -> Self {
        let mut arena = SlotArena {
            slots: Vec::new(),
            free_list: Vec::with_capacity(GROWTH_CHUNK),
        };
        arena.grow();
        arena
    }

    /// Append one chunk of empty slots and enqueue their indices.
    ///
    /// Highest index is pushed first so the free list hands out low indices
    /// first (LIFO pop from the back).
    fn grow(&mut self) {
        let old_len = self.slots.len();
        let new_len = old_len + GROWTH_CHUNK;
        self.slots.resize_with(new_len, T::default);
        for index in (old_len..new_len).rev() {
            self.free_list.push(index);
        }
    }

    /// Take one slot index out of the free pool, growing storage if needed.
    pub fn acquire(&mut self) -> usize {
        if self.free_list.is_empty() {
            self.grow();
        }
        self.free_list
            .pop()
            .expect("slot free list empty after growth")
    }

    /// Return a slot to the free pool. Content must already be cleared.
    pub fn release(&mut self, slot: usize) {
        debug_assert!(slot < self.slots.len());
        self.free_list.push(slot);
    }

    /// Total backing-storage capacity (live + free slots).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently in the free pool.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    pub fn get(&self, slot: usize) -> &T {
        &self.slots[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut T {
        &mut self.slots[slot]
    }
}

impl<T: Default> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
