//! Snapshot query implementations.
//!
//! Each module exposes bulk readers for the synthesis job plus the insert
//! helpers used to seed a snapshot.

pub mod ayahs;
pub mod counts;
pub mod roots;
pub mod surahs;
pub mod words;
