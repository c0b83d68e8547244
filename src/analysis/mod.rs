//! Deterministic transforms over already-fetched data.
//!
//! No I/O lives here; randomness is injected so every derivation is
//! reproducible under test.

pub mod depth;
pub mod sentiment;
pub mod strategy;
