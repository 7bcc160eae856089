//! # Error Types

/// Errors from bytemill operations.
#[derive(Debug, thiserror::Error)]
pub enum BytemillError {
    /// Skip width is outside `1..=16`, or leaves no value bits.
    #[error("skip bits ({bits}) must be in 1..=16 and below the token width")]
    SkipBitsOutOfRange {
        /// The rejected skip width.
        bits: u32,
    },

    /// Token value does not fit the value field of a slot.
    #[error("token ({token}) exceeds the {value_bits}-bit value range")]
    ValueTooWide {
        /// The token that was too wide.
        token: u64,
        /// The width of the value field.
        value_bits: u32,
    },

    /// Vocab size exceeds the representable token range.
    #[error("vocab size ({size}) exceeds the {value_bits}-bit value range")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the range.
        size: usize,
        /// The width of the value field.
        value_bits: u32,
    },

    /// The first merge id does not clear the initial alphabet.
    #[error("first emit id ({first_emit_id}) must exceed every input token (max {max_token})")]
    EmitIdBelowAlphabet {
        /// The configured first merge id.
        first_emit_id: usize,
        /// The largest token in the input.
        max_token: u64,
    },

    /// Insert of a pair that is already tracked by the heap.
    #[error("pair already present in heap")]
    AlreadyPresent,

    /// Update of a pair the heap does not track.
    #[error("pair not present in heap")]
    PairMissing,

    /// Pop from an empty heap.
    #[error("pop from empty heap")]
    Empty,

    /// Slot or entry storage allocation failed.
    #[error("allocation failed for {len} elements")]
    OutOfMemory {
        /// The requested element count.
        len: usize,
    },
}

/// Result type for bytemill operations.
pub type BMResult<T> = core::result::Result<T, BytemillError>;
