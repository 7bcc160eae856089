#![warn(missing_docs, unused)]
//! # `bytemill` Byte-Pair Trainer Core
//!
//! `bytemill` trains Byte Pair Encoding vocabularies over byte corpora.
//! Starting from the 256-token byte alphabet, it repeatedly pops the most
//! frequent adjacent pair, emits a fresh token id for it, and rewrites
//! the working sequence in place.
//!
//! ## Client Summary
//!
//! ### Core Client Types
//! * [`TokenType`] - the parameterized integer type used for tokens;
//!   choose from `{ u16, u32, u64 }`.
//! * [`PairMergeTrainerOptions`] and [`PairMergeTrainer`] - the training
//!   entry points.
//! * [`TrainResults`] - the learned merges and the encoded corpus.
//!
//! ### Core Data Structures
//! * [`SkipSeq`] - a bit-packed sequence with in-place logical delete:
//!   the low bits of each slot carry the token value, the high bits a
//!   forward skip distance over dead slots.
//! * [`PairHeap`] - an indexed max-priority queue over pair frequencies,
//!   supporting in-place count adjustment during the merge loop.
//!
//! ## Training
//!
//! ```rust
//! use bytemill::{PairMergeTrainer, PairMergeTrainerOptions};
//!
//! let tokens: Vec<u32> = b"abracadabra".iter().map(|&b| b as u32).collect();
//!
//! let trainer: PairMergeTrainer<u32, u32> = PairMergeTrainerOptions::new(260)
//!     .with_skip_bits(8)
//!     .init(&tokens)?;
//!
//! let results = trainer.train()?;
//!
//! assert!(!results.merges.is_empty());
//! assert!(results.tokens.len() < tokens.len());
//! # Ok::<(), bytemill::BytemillError>(())
//! ```
//!
//! The trained sequence can also be stepped one merge at a time via
//! [`PairMergeTrainer::step`], which exposes the popped pair, its
//! frequency, and the number of rewrite sites.

pub mod pair_heap;
pub mod skip_seq;
pub mod training;

mod errors;
mod types;

#[doc(inline)]
pub use errors::*;
#[doc(inline)]
pub use pair_heap::{HeapEntry, PairHeap};
#[doc(inline)]
pub use skip_seq::{LiveIter, SkipCursor, SkipSeq};
#[doc(inline)]
pub use training::{
    CountType, MergeStep, PairMergeTrainer, PairMergeTrainerOptions, TrainResults,
};
#[doc(inline)]
pub use types::*;
