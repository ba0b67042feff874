//! Shared transposition table.
//!
//! A fixed power-of-two array of entries indexed by Zobrist hash. Each
//! slot is a pair of atomics: the packed entry data and `key ^ data`.
//! Readers recompute the key from the pair and treat a mismatch as a miss,
//! so torn writes from racing workers are detected instead of locked
//! against; the table needs no mutex on the probe path.
//!
//! Mate scores are stored relative to the storing node's ply and
//! re-adjusted on retrieval, so an entry written deep in one subtree reads
//! correctly from another.

use std::mem;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use pleco::BitMove;

use crate::search::{mate_score, NOT_MATE};

/// Default table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 128;

/// Entry bound kind. `Unknown` marks an empty slot and is never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Unknown,
    /// Exact score: the search raised alpha with this move.
    Exact,
    /// Fail-low: no move raised alpha, the score is at most `value`.
    Alpha,
    /// Fail-high: a move reached beta, the score is at least `value`.
    Beta,
}

impl Bound {
    fn from_bits(bits: u8) -> Bound {
        match bits {
            1 => Bound::Exact,
            2 => Bound::Alpha,
            3 => Bound::Beta,
            _ => Bound::Unknown,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Bound::Unknown => 0,
            Bound::Exact => 1,
            Bound::Alpha => 2,
            Bound::Beta => 3,
        }
    }
}

/// A search result cached for one position.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: u64,
    pub depth: i32,
    pub bound: Bound,
    pub value: i16,
    pub best: BitMove,
    pub age: u8,
}

impl Entry {
    #[must_use]
    pub fn new(key: u64, depth: i32, bound: Bound, value: i16, best: BitMove) -> Self {
        Entry {
            key,
            depth,
            bound,
            value,
            best,
            age: 0,
        }
    }
}

/// Packed layout: value:16 | best:16 | depth:16 | bound:8 | age:8.
fn pack(e: &Entry) -> u64 {
    let value = e.value as u16 as u64;
    let best = e.best.get_raw() as u64;
    let depth = e.depth.clamp(i16::MIN as i32, i16::MAX as i32) as i16 as u16 as u64;
    let bound = e.bound.bits() as u64;
    let age = e.age as u64;
    value | (best << 16) | (depth << 32) | (bound << 48) | (age << 56)
}

fn unpack(key: u64, data: u64) -> Entry {
    Entry {
        key,
        value: data as u16 as i16,
        best: BitMove::new((data >> 16) as u16),
        depth: ((data >> 32) as u16 as i16) as i32,
        bound: Bound::from_bits((data >> 48) as u8),
        age: (data >> 56) as u8,
    }
}

#[derive(Default)]
struct Slot {
    data: AtomicU64,
    check: AtomicU64,
}

/// Hash-indexed table of search results, shared by all workers.
pub struct TranspositionTable {
    slots: Box<[Slot]>,
    mask: usize,
    full: AtomicU64,
    hits: AtomicU64,
    age: AtomicU8,
}

impl TranspositionTable {
    /// Allocate a table of roughly `size_mb` megabytes, rounded up to a
    /// power-of-two slot count.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let slot_size = mem::size_of::<Slot>();
        let wanted = (size_mb * 1024 * 1024 / slot_size).max(1);
        let count = wanted.next_power_of_two();

        let slots = (0..count).map(|_| Slot::default()).collect();
        TranspositionTable {
            slots,
            mask: count - 1,
            full: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            age: AtomicU8::new(0),
        }
    }

    #[inline]
    fn slot(&self, hash: u64) -> &Slot {
        &self.slots[(hash as usize) & self.mask]
    }

    /// Store an entry. Mate scores are made ply-relative first. An
    /// existing entry survives only when it is both deeper and at least as
    /// fresh as the incoming one.
    pub fn add(&self, ply: i16, mut e: Entry) {
        if mate_score(e.value, ply) != NOT_MATE {
            e.value = if e.value < 0 {
                e.value - ply
            } else {
                e.value + ply
            };
        }
        e.age = self.age.load(Ordering::Relaxed);

        let slot = self.slot(e.key);
        let old_data = slot.data.load(Ordering::Relaxed);
        let old = unpack(0, old_data);
        let empty = old.bound == Bound::Unknown;

        if !empty && old.depth > e.depth && old.age >= e.age {
            return;
        }
        if empty {
            self.full.fetch_add(1, Ordering::Relaxed);
        }

        let data = pack(&e);
        slot.check.store(e.key ^ data, Ordering::Relaxed);
        slot.data.store(data, Ordering::Relaxed);
    }

    /// Probe for `hash`. On a hit the mate-score adjustment from
    /// [`TranspositionTable::add`] is reversed for the probing ply.
    pub fn get(&self, hash: u64, ply: i16) -> Option<Entry> {
        let slot = self.slot(hash);
        let data = slot.data.load(Ordering::Relaxed);
        let check = slot.check.load(Ordering::Relaxed);
        if data == 0 || check ^ data != hash {
            return None;
        }

        let mut e = unpack(hash, data);
        if e.bound == Bound::Unknown {
            return None;
        }
        self.hits.fetch_add(1, Ordering::Relaxed);

        if mate_score(e.value, ply) != NOT_MATE {
            e.value = if e.value < 0 {
                e.value + ply
            } else {
                e.value - ply
            };
        }
        Some(e)
    }

    /// Probe for a value usable at `depth` within the `[alpha, beta]`
    /// window. Returns `Bound::Unknown` when the entry is missing, too
    /// shallow, or outside the window.
    pub fn get_eval(&self, hash: u64, depth: i32, alpha: i16, beta: i16, ply: i16) -> (i16, Bound) {
        let Some(e) = self.get(hash, ply) else {
            return (0, Bound::Unknown);
        };
        if e.depth < depth {
            return (0, Bound::Unknown);
        }

        match e.bound {
            Bound::Exact => (e.value, Bound::Exact),
            Bound::Alpha if e.value <= alpha => (alpha, Bound::Alpha),
            Bound::Beta if e.value >= beta => (beta, Bound::Beta),
            _ => (0, Bound::Unknown),
        }
    }

    /// The table's best move for a position, if any.
    pub fn best_move(&self, hash: u64, ply: i16) -> Option<BitMove> {
        self.get(hash, ply)
            .map(|e| e.best)
            .filter(|m| !m.is_null())
    }

    /// How full the table is, in permill of all slots.
    #[must_use]
    pub fn permill_full(&self) -> u32 {
        let total = self.slots.len() as u64;
        (1000 * self.full.load(Ordering::Relaxed) / total) as u32
    }

    /// Probe hits since the table was created.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Bump the age counter; called when a move is played on the root
    /// position so stale entries lose replacement priority.
    pub fn bump_age(&self) {
        self.age.fetch_add(1, Ordering::Relaxed);
    }
}
