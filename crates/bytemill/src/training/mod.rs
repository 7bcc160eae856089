//! # Vocabulary Training
//!
//! Support for training byte-pair merge vocabularies.
//!
//! Training consumes an owned sequence of initial token ids (typically the
//! bytes of a corpus widened to the token type) and produces the learned
//! merges plus the corpus encoded under them.
//!
//! Expect one linear counting pass to seed the pair heap, then per-merge
//! work bounded by the rewrite sites of the popped pair.
//!
//! ## Training Example
//!
//! ```rust
//! use bytemill::{PairMergeTrainer, PairMergeTrainerOptions};
//!
//! fn example(bytes: &[u8]) -> bytemill::BMResult<Vec<u32>> {
//!     // Any unsigned integer type wide enough for the target vocab
//!     // plus the skip field works; see `bytemill::TokenType`.
//!     type T = u32;
//!     type C = u32;
//!
//!     let tokens: Vec<T> = bytes.iter().map(|&b| T::from(b)).collect();
//!
//!     let trainer: PairMergeTrainer<T, C> =
//!         PairMergeTrainerOptions::new(512).init(&tokens)?;
//!
//!     let mut merges = Vec::new();
//!     let results = trainer.train_cb(&mut |pair, token| {
//!         merges.push((pair, token));
//!     })?;
//!
//!     assert_eq!(merges, results.merges);
//!     Ok(results.tokens)
//! }
//! ```

mod pair_trainer;
mod training_types;

#[doc(inline)]
pub use pair_trainer::{
    DEFAULT_FIRST_EMIT_ID, DEFAULT_SKIP_BITS, DEFAULT_VOCAB_SIZE, MergeStep, PairMergeTrainer,
    PairMergeTrainerOptions, TrainResults,
};
#[doc(inline)]
pub use training_types::CountType;
