//! # Bit-Packed Skip Sequence
//!
//! [`SkipSeq`] stores a run of token ids in a flat slot array and supports
//! logical deletion without shifting: the low bits of each slot carry the
//! token value, the high bits carry a forward skip distance. Skip 0 means
//! the slot is live; skip `s > 0` means the slot is dead and the next live
//! slot is at least `s` positions further along.
//!
//! The skip field is a conservative lower bound, not an exact pointer.
//! Iteration compounds skips on the fly, and the mutating scan writes a
//! capped, compounded distance back into the first dead slot it crosses so
//! long dead runs shorten over repeated traversals.

use crate::errors::{BMResult, BytemillError};
use crate::types::{TokenType, token_width};

/// Narrowest permitted skip field.
pub const MIN_SKIP_BITS: u32 = 1;

/// Widest permitted skip field.
pub const MAX_SKIP_BITS: u32 = 16;

/// A fixed-length sequence of token ids with in-place logical delete.
///
/// Storage length is fixed at construction; only the live count decreases.
/// Mutation happens exclusively through a [`SkipCursor`], which walks live
/// slots in order and can collapse a live slot's successor.
#[derive(Debug, Clone)]
pub struct SkipSeq<T: TokenType> {
    slots: Vec<T>,
    live: usize,
    value_bits: u32,
    value_mask: T,
    max_skip: usize,
}

impl<T: TokenType> SkipSeq<T> {
    /// Build a sequence from a slice of initial token ids.
    ///
    /// Every slot starts live (skip field 0).
    ///
    /// ## Arguments
    /// * `tokens` - the initial token ids; each must fit in `W - skip_bits` bits.
    /// * `skip_bits` - the width of the skip field; `1..=16`, below the token width.
    ///
    /// ## Returns
    /// The sequence, or:
    /// * [`BytemillError::SkipBitsOutOfRange`] for a bad `skip_bits`.
    /// * [`BytemillError::ValueTooWide`] if any token exceeds the value range.
    /// * [`BytemillError::OutOfMemory`] if the slot allocation fails.
    pub fn from_tokens(
        tokens: &[T],
        skip_bits: u32,
    ) -> BMResult<Self> {
        let width = token_width::<T>();
        if !(MIN_SKIP_BITS..=MAX_SKIP_BITS).contains(&skip_bits) || skip_bits >= width {
            return Err(BytemillError::SkipBitsOutOfRange { bits: skip_bits });
        }

        let value_bits = width - skip_bits;
        let value_mask = (T::one() << value_bits as usize) - T::one();
        let max_skip = (1usize << skip_bits) - 1;

        let mut slots: Vec<T> = Vec::new();
        slots
            .try_reserve_exact(tokens.len())
            .map_err(|_| BytemillError::OutOfMemory { len: tokens.len() })?;

        for &token in tokens {
            if token > value_mask {
                return Err(BytemillError::ValueTooWide {
                    token: token.to_u64().unwrap_or(u64::MAX),
                    value_bits,
                });
            }
            slots.push(token);
        }

        Ok(Self {
            live: slots.len(),
            slots,
            value_bits,
            value_mask,
            max_skip,
        })
    }

    /// The fixed storage length (live and dead slots).
    pub fn storage_len(&self) -> usize {
        self.slots.len()
    }

    /// The number of live slots.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Whether no live slots remain.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// The width of the value field.
    pub fn value_bits(&self) -> u32 {
        self.value_bits
    }

    /// The largest representable token value.
    pub fn value_mask(&self) -> T {
        self.value_mask
    }

    /// The largest in-place skip distance.
    pub fn max_skip(&self) -> usize {
        self.max_skip
    }

    /// A read-only iterator over live token values, in original order.
    pub fn iter(&self) -> LiveIter<'_, T> {
        LiveIter { seq: self, pos: 0 }
    }

    /// Collect the live token values, in original order.
    pub fn to_tokens(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// A mutating cursor over the live slots.
    pub fn cursor(&mut self) -> SkipCursor<'_, T> {
        SkipCursor {
            seq: self,
            state: CursorState::Initial,
        }
    }

    fn value_at(
        &self,
        index: usize,
    ) -> T {
        self.slots[index] & self.value_mask
    }

    fn skip_at(
        &self,
        index: usize,
    ) -> usize {
        (self.slots[index] >> self.value_bits as usize)
            .to_usize()
            .expect("skip field fits usize")
    }

    fn set_skip(
        &mut self,
        index: usize,
        skip: usize,
    ) {
        debug_assert!(skip <= self.max_skip);
        let packed = T::from_usize(skip).expect("skip distance fits the skip field")
            << self.value_bits as usize;
        self.slots[index] = self.value_at(index) | packed;
    }

    /// Index of the first live slot at or after `start`.
    fn scan_live(
        &self,
        start: usize,
    ) -> Option<usize> {
        let mut j = start;
        while j < self.slots.len() {
            let s = self.skip_at(j);
            if s == 0 {
                return Some(j);
            }
            j += s;
        }
        None
    }

    /// Like [`Self::scan_live`], but path-compresses the first dead slot crossed.
    ///
    /// The compounded distance is exact at write time and dead slots never
    /// revive, so the capped write-back stays a valid lower bound.
    fn scan_live_mut(
        &mut self,
        start: usize,
    ) -> Option<usize> {
        let mut j = start;
        while j < self.slots.len() {
            let s = self.skip_at(j);
            if s == 0 {
                break;
            }
            j += s;
        }
        if j > start && start < self.slots.len() {
            let hop = (j - start).min(self.max_skip);
            if hop > self.skip_at(start) {
                self.set_skip(start, hop);
            }
        }
        (j < self.slots.len()).then_some(j)
    }
}

enum CursorState {
    /// Before the first advance; replace operations are forbidden.
    Initial,
    /// Anchored at a live slot.
    At(usize),
    /// Past the last live slot.
    Done,
}

impl CursorState {
    fn scan_start(&self) -> Option<usize> {
        match *self {
            CursorState::Initial => Some(0),
            CursorState::At(i) => Some(i + 1),
            CursorState::Done => None,
        }
    }
}

/// A forward cursor over the live slots of a [`SkipSeq`].
///
/// The sole mutation API of the sequence. After the first [`advance`] the
/// cursor is anchored at a live slot; [`replace_and_skip_next`] rewrites the
/// anchored value and collapses the following live slot.
///
/// [`advance`]: SkipCursor::advance
/// [`replace_and_skip_next`]: SkipCursor::replace_and_skip_next
pub struct SkipCursor<'a, T: TokenType> {
    seq: &'a mut SkipSeq<T>,
    state: CursorState,
}

impl<T: TokenType> SkipCursor<'_, T> {
    /// Advance to the next live slot and return its value, or `None` at the end.
    pub fn advance(&mut self) -> Option<T> {
        let start = self.state.scan_start()?;
        match self.seq.scan_live_mut(start) {
            Some(j) => {
                self.state = CursorState::At(j);
                Some(self.seq.value_at(j))
            }
            None => {
                self.state = CursorState::Done;
                None
            }
        }
    }

    /// The value the next [`Self::advance`] would return, without moving.
    pub fn peek(&self) -> Option<T> {
        let start = self.state.scan_start()?;
        self.seq.scan_live(start).map(|j| self.seq.value_at(j))
    }

    /// The value two live steps ahead of the cursor, without moving.
    pub fn peek2(&self) -> Option<T> {
        let start = self.state.scan_start()?;
        let first = self.seq.scan_live(start)?;
        self.seq.scan_live(first + 1).map(|j| self.seq.value_at(j))
    }

    /// Overwrite the anchored value with `value` and deaden the next live slot.
    ///
    /// The anchored slot keeps its zero skip field. If a next live slot
    /// exists, its skip field is set to 1 and the live count drops by one;
    /// otherwise only the value overwrite happens.
    ///
    /// ## Panics
    /// Panics if the cursor is not anchored (no successful [`Self::advance`]
    /// yet, or already past the end). Calling this in those states is a
    /// programming bug, not a recoverable condition.
    pub fn replace_and_skip_next(
        &mut self,
        value: T,
    ) {
        let CursorState::At(i) = self.state else {
            panic!("replace_and_skip_next requires an anchored cursor");
        };
        debug_assert!(
            value <= self.seq.value_mask,
            "replacement value exceeds the value range"
        );

        // The anchored slot is live, so a plain store keeps skip = 0.
        self.seq.slots[i] = value;

        if let Some(next) = self.seq.scan_live_mut(i + 1) {
            self.seq.set_skip(next, 1);
            self.seq.live -= 1;
        }
    }
}

/// Read-only iterator over the live values of a [`SkipSeq`].
pub struct LiveIter<'a, T: TokenType> {
    seq: &'a SkipSeq<T>,
    pos: usize,
}

impl<T: TokenType> Iterator for LiveIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let j = self.seq.scan_live(self.pos)?;
        self.pos = j + 1;
        Some(self.seq.value_at(j))
    }
}
