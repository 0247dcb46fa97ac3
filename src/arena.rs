//! Slot storage with indices stable across removals.

/// A vector with indices stable across removals & insertions, which reuses freed indices;
/// comparable to `Vec<Option<T>>` with a free list.
///
/// Indices are `u16` so they can back 16-bit resource handles; `u16::MAX` is never handed out.
///
/// # Invariants
///
/// * `slots[i]` is `None` ⟺ `i` ∈ `free`
/// * `live` == number of `Some` slots
#[derive(Debug, Clone)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free: Vec<u16>,
    live: usize,
    max_len: usize,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::with_max_len(u16::MAX as usize)
    }
}

impl<T> SlotArena<T> {
    /// Construct an arena which will hold at most `max_len` values (clamped to `u16::MAX`).
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            max_len: max_len.min(u16::MAX as usize),
        }
    }

    /// The maximum number of values this arena will hold.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// The number of values currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.live >= self.max_len
    }

    /// Store `value`, returning its index, or give `value` back if the arena is full.
    pub fn insert(&mut self, value: T) -> Result<u16, T> {
        if self.is_full() {
            return Err(value);
        }
        let index = match self.free.pop() {
            Some(i) => {
                self.slots[i as usize] = Some(value);
                i
            }
            None => {
                // is_full() bounds slots.len() below u16::MAX here
                let i = self.slots.len() as u16;
                self.slots.push(Some(value));
                i
            }
        };
        self.live += 1;
        Ok(index)
    }

    /// Take the value at `index` out of the arena, freeing its slot.
    pub fn remove(&mut self, index: u16) -> Option<T> {
        let res = self.slots.get_mut(index as usize)?.take()?;
        self.free.push(index);
        self.live -= 1;
        Some(res)
    }

    #[inline]
    pub fn get(&self, index: u16) -> Option<&T> {
        self.slots.get(index as usize)?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, index: u16) -> Option<&mut T> {
        self.slots.get_mut(index as usize)?.as_mut()
    }

    /// Remove every value, yielding each along with its former index.
    pub fn drain(&mut self) -> impl Iterator<Item = (u16, T)> + '_ {
        self.free.clear();
        self.live = 0;
        self.slots
            .drain(..)
            .enumerate()
            .filter_map(|(i, s)| s.map(|v| (i as u16, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::SlotArena;

    #[test]
    fn reuses_freed_indices() {
        let mut arena = SlotArena::default();
        let a = arena.insert('a').unwrap();
        let b = arena.insert('b').unwrap();
        assert_eq!(arena.remove(a), Some('a'));
        assert_eq!(arena.remove(a), None);
        let c = arena.insert('c').unwrap();
        assert_eq!(c, a);
        assert_eq!(arena.get(b), Some(&'b'));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn refuses_past_max_len() {
        let mut arena = SlotArena::with_max_len(1);
        arena.insert(1).unwrap();
        assert_eq!(arena.insert(2), Err(2));
        arena.remove(0);
        assert!(arena.insert(3).is_ok());
    }

    #[test]
    fn drain_empties() {
        let mut arena = SlotArena::default();
        arena.insert(1).unwrap();
        arena.insert(2).unwrap();
        arena.remove(0);
        let drained: Vec<_> = arena.drain().collect();
        assert_eq!(drained, vec![(1, 2)]);
        assert!(arena.is_empty());
        assert_eq!(arena.insert(5), Ok(0));
    }
}
