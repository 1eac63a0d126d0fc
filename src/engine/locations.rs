//! Location registry: which room object hides which clue.
//!
//! The map is stored slot-first: `assignment[slot]` is the index of the key
//! holding that slot. Distinct slots always point at distinct keys, so the
//! "one clue per location" invariant holds by construction.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::BTreeMap;

use crate::error::{ConfigError, EngineError};

pub type SlotId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMap {
    keys: Vec<String>,
    assignment: Vec<usize>,
}

impl LocationMap {
    /// Places `clue_count` slots on distinct keys, uniformly at random.
    pub fn init<R: Rng + ?Sized>(
        keys: Vec<String>,
        clue_count: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if clue_count > keys.len() {
            return Err(ConfigError::TooFewLocations {
                clues: clue_count,
                locations: keys.len(),
            });
        }
        let assignment = index::sample(rng, keys.len(), clue_count).into_vec();
        Ok(LocationMap { keys, assignment })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn clue_count(&self) -> usize {
        self.assignment.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    pub fn slot_at(&self, key: &str) -> Option<SlotId> {
        let idx = self.index_of(key)?;
        self.assignment.iter().position(|&held| held == idx)
    }

    pub fn location_of(&self, slot: SlotId) -> Option<&str> {
        self.assignment
            .get(slot)
            .map(|&idx| self.keys[idx].as_str())
    }

    pub fn empty_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.assignment.contains(idx))
            .map(|(_, key)| key.as_str())
    }

    /// Full key -> slot view, with `None` for empty keys.
    pub fn to_map(&self) -> BTreeMap<String, Option<SlotId>> {
        let mut map: BTreeMap<String, Option<SlotId>> =
            self.keys.iter().map(|k| (k.clone(), None)).collect();
        for (slot, &idx) in self.assignment.iter().enumerate() {
            map.insert(self.keys[idx].clone(), Some(slot));
        }
        map
    }

    /// More than one assignment exists once there is a clue and a second
    /// key to put it on.
    pub fn has_alternative(&self) -> bool {
        self.clue_count() > 0 && self.keys.len() >= 2
    }

    /// Draws a new assignment. When an alternative exists the result always
    /// differs from the current one: a draw that repeats it gets one slot
    /// moved to a free key, or swapped with another slot if none is free.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BTreeMap<String, Option<SlotId>> {
        let count = self.clue_count();
        let mut next = index::sample(rng, self.keys.len(), count).into_vec();

        if next == self.assignment && self.has_alternative() {
            let slot = rng.gen_range(0..count);
            let free: Vec<usize> = (0..self.keys.len())
                .filter(|idx| !next.contains(idx))
                .collect();
            match free.choose(rng) {
                Some(&idx) => next[slot] = idx,
                None => {
                    let mut other = rng.gen_range(0..count - 1);
                    if other >= slot {
                        other += 1;
                    }
                    next.swap(slot, other);
                }
            }
        }

        self.assignment = next;
        self.to_map()
    }

    /// Moves `slot` off `from` onto a random empty key. `Ok(None)` when no
    /// empty key is left; the map is untouched in that case.
    pub fn move_slot<R: Rng + ?Sized>(
        &mut self,
        slot: SlotId,
        from: &str,
        rng: &mut R,
    ) -> Result<Option<String>, EngineError> {
        let from_idx = self
            .index_of(from)
            .ok_or_else(|| EngineError::UnknownLocation(from.to_string()))?;
        let current = *self
            .assignment
            .get(slot)
            .ok_or(EngineError::UnknownClue(slot))?;
        if current != from_idx {
            return Err(EngineError::SlotNotAtLocation {
                slot,
                location: from.to_string(),
            });
        }

        let empty: Vec<usize> = (0..self.keys.len())
            .filter(|idx| *idx != from_idx && !self.assignment.contains(idx))
            .collect();
        Ok(empty.choose(rng).map(|&idx| {
            self.assignment[slot] = idx;
            self.keys[idx].clone()
        }))
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}
