//! Killer moves: quiet moves that caused a beta cutoff, two per ply.
//!
//! The table is shared by all root workers, which may update the same ply
//! concurrently, so access goes through a mutex. Contention is low: the
//! lock is taken once per cutoff and once per node for ordering.

use parking_lot::Mutex;
use pleco::BitMove;

use super::MAX_PLY;

/// Two killer slots per ply. The zero move marks an empty slot; it decodes
/// as a1a1, which no legal move can be.
pub struct KillerTable {
    slots: Mutex<[[BitMove; 2]; MAX_PLY]>,
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: Mutex::new([[BitMove::null(); 2]; MAX_PLY]),
        }
    }

    /// Record a quiet cutoff move. A move already in the primary slot is
    /// left alone; anything else shifts the primary into the secondary
    /// slot, which keeps the two slots distinct.
    pub fn add(&self, ply: i16, mv: BitMove) {
        if mv.is_capture() {
            return;
        }
        let Ok(idx) = usize::try_from(ply) else {
            return;
        };
        if idx >= MAX_PLY {
            return;
        }

        let mut slots = self.slots.lock();
        let row = &mut slots[idx];
        if row[0] == mv {
            return;
        }
        row[1] = row[0];
        row[0] = mv;
    }

    /// The killer pair for a ply; empty slots are the null move.
    #[must_use]
    pub fn get(&self, ply: i16) -> [BitMove; 2] {
        match usize::try_from(ply) {
            Ok(idx) if idx < MAX_PLY => self.slots.lock()[idx],
            _ => [BitMove::null(); 2],
        }
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        KillerTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(raw: u16) -> BitMove {
        // Flag bits zero: a quiet move in pleco's encoding.
        BitMove::new(raw & 0x0FFF)
    }

    #[test]
    fn add_shifts_primary_to_secondary() {
        let killers = KillerTable::new();
        let a = quiet(0x0041);
        let b = quiet(0x0082);

        killers.add(3, a);
        assert_eq!(killers.get(3), [a, BitMove::null()]);

        killers.add(3, b);
        assert_eq!(killers.get(3), [b, a]);
    }

    #[test]
    fn re_adding_the_primary_is_a_no_op() {
        let killers = KillerTable::new();
        let a = quiet(0x0041);
        let b = quiet(0x0082);
        killers.add(0, a);
        killers.add(0, b);
        killers.add(0, b);
        assert_eq!(killers.get(0), [b, a]);
    }

    #[test]
    fn slots_never_hold_equal_moves() {
        let killers = KillerTable::new();
        let a = quiet(0x0041);
        let b = quiet(0x0082);
        killers.add(5, a);
        killers.add(5, b);
        // Promoting the secondary back to primary swaps, not duplicates.
        killers.add(5, a);
        assert_eq!(killers.get(5), [a, b]);
        let [primary, secondary] = killers.get(5);
        assert_ne!(primary, secondary);
    }

    #[test]
    fn out_of_range_plies_are_ignored() {
        let killers = KillerTable::new();
        killers.add(-1, quiet(0x0041));
        killers.add(MAX_PLY as i16 + 10, quiet(0x0041));
        assert_eq!(killers.get(-1), [BitMove::null(); 2]);
        assert_eq!(killers.get(MAX_PLY as i16 + 10), [BitMove::null(); 2]);
    }
}
