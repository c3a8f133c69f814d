//! Report section data structures.

pub mod details;
pub mod summary;

pub use details::*;
pub use summary::*;
