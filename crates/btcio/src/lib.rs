//! Bitcoin RPC plumbing for the relayer: the `bitcoind` JSON-RPC client,
//! capability traits over it, and the chain-status polling task.

pub mod rpc;
pub mod status_task;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;
