//! Withdrawal-order and UTXO records, and the store capability they live
//! behind.
//!
//! Persistence itself is an external collaborator; this crate only defines
//! the operations the withdrawal engine needs and an in-memory stub used by
//! tests and local runs.

pub mod errors;
pub mod stubs;
pub mod traits;
pub mod types;

pub use errors::DbError;

pub type DbResult<T> = Result<T, DbError>;
