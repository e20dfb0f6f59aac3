//! Pending row deletions
//!
//! Erased rows are not removed from the file right away. Their physical
//! indices are collected here until the next flush rewrites the file
//! without them, and logical indices are translated around them meanwhile.

/// Sorted set of physical row indices marked for deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteSet {
    sorted: Vec<u64>,
}

impl DeleteSet {
    pub fn new() -> Self {
        DeleteSet { sorted: Vec::new() }
    }

    /// Mark a physical index; returns false if it was already marked
    pub fn insert(&mut self, physical: u64) -> bool {
        match self.sorted.binary_search(&physical) {
            Ok(_) => false,
            Err(pos) => {
                self.sorted.insert(pos, physical);
                true
            }
        }
    }

    pub fn contains(&self, physical: u64) -> bool {
        self.sorted.binary_search(&physical).is_ok()
    }

    /// Number of marked indices less than or equal to `physical`
    pub fn rank(&self, physical: u64) -> u64 {
        self.sorted.partition_point(|&marked| marked <= physical) as u64
    }

    /// Physical index of the `logical`-th row that is not marked
    ///
    /// Finds the least `p` with `p == logical + rank(p)`. Iterating from
    /// `logical` upward reaches it, and it is never a marked index.
    pub fn translate(&self, logical: u64) -> u64 {
        let mut physical = logical;
        loop {
            let next = logical + self.rank(physical);
            if next == physical {
                return physical;
            }
            physical = next;
        }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn clear(&mut self) {
        self.sorted.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.sorted.iter().copied()
    }
}
