//! Configuration types for the relayer, loaded from TOML.

mod config;
pub mod withdrawal;

pub use config::{BitcoindConfig, ClientConfig, Config};
