//! # Common Types and Traits
use core::fmt::{Debug, Display};
use core::hash::Hash;
use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

/// A type that can be used as a token id.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A pair of adjacent tokens.
pub type Pair<T> = (T, T);

#[cfg(feature = "ahash")]
mod hash_types {
    /// Type Alias for hash maps in this crate.
    pub type BMHashMap<K, V> = ahash::AHashMap<K, V>;

    /// Type Alias for hash sets in this crate.
    pub type BMHashSet<V> = ahash::AHashSet<V>;
}
#[cfg(not(feature = "ahash"))]
mod hash_types {
    /// Type Alias for hash maps in this crate.
    pub type BMHashMap<K, V> = std::collections::HashMap<K, V>;

    /// Type Alias for hash sets in this crate.
    pub type BMHashSet<V> = std::collections::HashSet<V>;
}
pub use hash_types::*;

/// The bit width of a token type.
pub(crate) fn token_width<T: TokenType>() -> u32 {
    (core::mem::size_of::<T>() * 8) as u32
}
