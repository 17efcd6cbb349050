//! Manages and distributes the latest chain-state snapshots.

mod status_channel;

pub use status_channel::StatusChannel;
