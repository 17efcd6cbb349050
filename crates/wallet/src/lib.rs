//! Withdrawal wallet logic: script and address handling, leadership
//! gating, key custody, transaction signing, and the periodic broadcast
//! engine that drives `ReadyToSign` orders onto the Bitcoin network.

pub mod address;
pub mod broadcast;
pub mod custody;
pub mod errors;
pub mod leader;
pub mod signer;

pub use broadcast::{withdrawal_task, TickOutcome, WithdrawalBroadcaster};
pub use errors::{AddressError, BroadcastTickError, CustodyError, SigningError};
