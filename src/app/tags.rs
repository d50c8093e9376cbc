//! Processes tagged for batch operations
//!
//! A tagged id that is absent from two consecutive generations is dropped,
//! so a recycled pid cannot inherit a stale tag.

use std::collections::{HashMap, HashSet};

/// Generations an id may be missing before its tag is dropped
const MAX_ABSENT_CYCLES: u8 = 2;

#[derive(Debug, Clone, Default)]
pub struct TaggedSet {
    /// pid -> consecutive generations it was absent
    tags: HashMap<u32, u8>,
}

impl TaggedSet {
    /// Tags or untags `pid`; returns whether it is tagged afterwards.
    pub fn toggle(&mut self, pid: u32) -> bool {
        if self.tags.remove(&pid).is_some() {
            false
        } else {
            self.tags.insert(pid, 0);
            true
        }
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.tags.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Tagged ids in ascending order
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.tags.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ages tags against the ids of a newly published generation.
    pub fn retain_present(&mut self, present: &HashSet<u32>) {
        self.tags.retain(|pid, absent| {
            if present.contains(pid) {
                *absent = 0;
            } else {
                *absent += 1;
            }
            *absent < MAX_ABSENT_CYCLES
        });
    }
}
