//! # Pair Merge Trainer
//!
//! [`PairMergeTrainer`] owns a [`SkipSeq`] and a [`PairHeap`] and drives
//! the merge loop: pop the most frequent adjacent pair, rewrite every
//! occurrence in one left-to-right pass, and patch the counts of the four
//! neighboring pairs at each rewrite site. Each step's cost is bounded by
//! the local work at the merge sites, not by a full rescan.

use crate::errors::{BMResult, BytemillError};
use crate::pair_heap::PairHeap;
use crate::skip_seq::SkipSeq;
use crate::training::CountType;
use crate::types::{BMHashMap, Pair, TokenType};

/// Default total vocab size, initial alphabet included.
pub const DEFAULT_VOCAB_SIZE: usize = 512;

/// Default first merge token id (the byte alphabet is `0..256`).
pub const DEFAULT_FIRST_EMIT_ID: usize = 256;

/// Default skip-field width for the working sequence.
pub const DEFAULT_SKIP_BITS: u32 = 8;

/// Options for [`PairMergeTrainer`].
#[derive(Debug, Clone)]
pub struct PairMergeTrainerOptions {
    /// Training stops once this many distinct token ids exist in total,
    /// the initial alphabet included.
    pub vocab_size: usize,

    /// The first token id issued for a merge; must exceed every input
    /// token.
    pub first_emit_id: usize,

    /// The skip-field width of the working sequence.
    pub skip_bits: u32,
}

impl Default for PairMergeTrainerOptions {
    fn default() -> Self {
        Self {
            vocab_size: DEFAULT_VOCAB_SIZE,
            first_emit_id: DEFAULT_FIRST_EMIT_ID,
            skip_bits: DEFAULT_SKIP_BITS,
        }
    }
}

impl PairMergeTrainerOptions {
    /// Create options with the given vocab size and default everything else.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            ..Default::default()
        }
    }

    /// Sets the total vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the first merge token id.
    pub fn with_first_emit_id(
        self,
        first_emit_id: usize,
    ) -> Self {
        Self {
            first_emit_id,
            ..self
        }
    }

    /// Sets the skip-field width.
    pub fn with_skip_bits(
        self,
        skip_bits: u32,
    ) -> Self {
        Self { skip_bits, ..self }
    }

    /// Initializes a [`PairMergeTrainer`] over `tokens` from these options.
    ///
    /// ## Arguments
    /// * `tokens` - the initial token ids (typically widened bytes).
    ///
    /// ## Returns
    /// A seeded trainer, or a validation/allocation error.
    pub fn init<T, C>(
        self,
        tokens: &[T],
    ) -> BMResult<PairMergeTrainer<T, C>>
    where
        T: TokenType,
        C: CountType,
    {
        PairMergeTrainer::from_tokens(self, tokens)
    }
}

/// One completed merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStep<T: TokenType, C: CountType> {
    /// The pair that was merged.
    pub pair: Pair<T>,

    /// The token id emitted for the pair.
    pub token: T,

    /// The pair's frequency when popped.
    pub count: C,

    /// The number of rewrite sites applied in the pass.
    ///
    /// Zero when every occurrence was consumed by earlier overlapping
    /// merges; the step still emits its token id.
    pub sites: usize,
}

/// Training results.
#[derive(Debug, Clone)]
pub struct TrainResults<T: TokenType> {
    /// The learned merges, in emission order.
    pub merges: Vec<(Pair<T>, T)>,

    /// The final live sequence: the input corpus encoded under the
    /// learned merges.
    pub tokens: Vec<T>,
}

/// Trainer for learning byte-pair merges over a token sequence.
///
/// # Parameters
/// * `T` - the token id type.
/// * `C` - the type used for pair frequency counts.
pub struct PairMergeTrainer<T: TokenType, C: CountType> {
    /// Trainer options.
    pub options: PairMergeTrainerOptions,

    // Dropped before the sequence.
    heap: PairHeap<T, C>,
    seq: SkipSeq<T>,
    next_id: usize,
}

impl<T, C> PairMergeTrainer<T, C>
where
    T: TokenType,
    C: CountType,
{
    /// Build a trainer: validate options, copy the input into a
    /// [`SkipSeq`], and seed the [`PairHeap`] with one counting pass.
    ///
    /// ## Arguments
    /// * `options` - the trainer options.
    /// * `tokens` - the initial token ids; the slice may be freed after.
    ///
    /// ## Returns
    /// The seeded trainer, or:
    /// * [`BytemillError::SkipBitsOutOfRange`] / [`BytemillError::ValueTooWide`]
    ///   from sequence construction.
    /// * [`BytemillError::VocabSizeOverflow`] if the target vocab does not
    ///   fit the value range.
    /// * [`BytemillError::EmitIdBelowAlphabet`] if an input token reaches
    ///   `first_emit_id`.
    /// * [`BytemillError::OutOfMemory`] if an allocation fails.
    pub fn from_tokens(
        options: PairMergeTrainerOptions,
        tokens: &[T],
    ) -> BMResult<Self> {
        let mut seq = SkipSeq::from_tokens(tokens, options.skip_bits)?;

        let value_mask = seq.value_mask().to_u64().unwrap_or(u64::MAX);
        if let Some(max_id) = options.vocab_size.checked_sub(1)
            && max_id as u64 > value_mask
        {
            return Err(BytemillError::VocabSizeOverflow {
                size: options.vocab_size,
                value_bits: seq.value_bits(),
            });
        }

        if let Some(max_token) = tokens.iter().copied().max() {
            let max_token = max_token.to_u64().unwrap_or(u64::MAX);
            if options.first_emit_id as u64 <= max_token {
                return Err(BytemillError::EmitIdBelowAlphabet {
                    first_emit_id: options.first_emit_id,
                    max_token,
                });
            }
        }

        // Seed pass: left member from the previous advance, right member
        // from peek.
        let mut counts: BMHashMap<Pair<T>, C> = BMHashMap::default();
        {
            let mut cursor = seq.cursor();
            let mut left = cursor.advance();
            while let Some(a) = left {
                let Some(b) = cursor.peek() else { break };
                *counts.entry((a, b)).or_default() += C::one();
                left = cursor.advance();
            }
        }

        log::info!(
            "Seeding heap with {} unique pairs over {} tokens",
            counts.len(),
            seq.live_count()
        );

        let mut heap = PairHeap::with_capacity(counts.len())?;
        for (pair, count) in counts {
            heap.insert(pair, count)?;
        }

        Ok(Self {
            next_id: options.first_emit_id,
            options,
            heap,
            seq,
        })
    }

    /// The working sequence.
    pub fn sequence(&self) -> &SkipSeq<T> {
        &self.seq
    }

    /// The pair frequency heap.
    pub fn heap(&self) -> &PairHeap<T, C> {
        &self.heap
    }

    /// The token id the next merge will emit.
    pub fn next_id(&self) -> usize {
        self.next_id
    }

    /// Run one merge step.
    ///
    /// Pops the most frequent pair, rewrites every left-to-right,
    /// non-overlapping occurrence, and applies the local frequency deltas
    /// around each rewrite site. A popped pair whose occurrences were all
    /// consumed by earlier overlapping merges still emits its token id.
    ///
    /// ## Returns
    /// The completed [`MergeStep`], or `None` once training has
    /// terminated: the vocab target is reached, fewer than two live
    /// tokens remain, or no positive-frequency pair is left.
    pub fn step(&mut self) -> BMResult<Option<MergeStep<T, C>>> {
        if self.next_id >= self.options.vocab_size || self.seq.live_count() < 2 {
            return Ok(None);
        }

        let entry = match self.heap.pop_max() {
            Ok(entry) => entry,
            Err(BytemillError::Empty) => return Ok(None),
            Err(err) => return Err(err),
        };
        if entry.count.is_zero() {
            // Only tombstones remain.
            return Ok(None);
        }

        let pair = entry.pair;
        let token = T::from_usize(self.next_id).expect("emit id fits the value range");
        self.next_id += 1;

        let mut sites = 0;

        let mut cursor = self.seq.cursor();
        let mut prev: Option<T> = None;
        let mut current = cursor.advance();
        while let Some(value) = current {
            let Some(next) = cursor.peek() else { break };

            if (value, next) == pair {
                let right_right = cursor.peek2();
                cursor.replace_and_skip_next(token);
                sites += 1;

                // Patch the neighboring pair counts around the new token.
                if let Some(left) = prev {
                    self.heap.decrement((left, value));
                    self.heap.increment((left, token));
                }
                if let Some(rr) = right_right {
                    self.heap.decrement((next, rr));
                    self.heap.increment((token, rr));
                }
                prev = Some(token);
            } else {
                prev = Some(value);
            }

            current = cursor.advance();
        }

        Ok(Some(MergeStep {
            pair,
            token,
            count: entry.count,
            sites,
        }))
    }

    /// Train to completion, reporting each merge on `on_merge`.
    ///
    /// ## Arguments
    /// * `on_merge` - the merge sink; called with `(pair, new_token)` in
    ///   emission order.
    ///
    /// ## Returns
    /// The [`TrainResults`], or an error from a failed step.
    pub fn train_cb<F>(
        mut self,
        on_merge: &mut F,
    ) -> BMResult<TrainResults<T>>
    where
        F: FnMut(Pair<T>, T),
    {
        let num_merges = self
            .options
            .vocab_size
            .saturating_sub(self.options.first_emit_id);
        log::info!("Starting pair-merge training: up to {num_merges} merges");

        let mut merges = Vec::with_capacity(num_merges);
        let mut last_log_percent = 0;

        while let Some(step) = self.step()? {
            on_merge(step.pair, step.token);
            merges.push((step.pair, step.token));

            // Log progress every 1%.
            let current_percent = (merges.len() * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - merged {:?} -> {} (frequency: {})",
                    current_percent,
                    merges.len(),
                    num_merges,
                    step.pair,
                    step.token,
                    step.count,
                );
                last_log_percent = current_percent;
            }
        }

        log::info!("Finished training: {} merges completed", merges.len());

        Ok(TrainResults {
            merges,
            tokens: self.seq.to_tokens(),
        })
    }

    /// Train to completion without a merge sink.
    pub fn train(self) -> BMResult<TrainResults<T>> {
        self.train_cb(&mut |_, _| {})
    }
}
