//! Utilities shared across the relayer binaries.

pub mod logging;
