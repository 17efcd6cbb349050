use bitcoin::OutPoint;
use thiserror::Error;

use crate::types::OrderStatus;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("unknown withdrawal order {0}")]
    OrderNotFound(u64),

    #[error("unknown utxo {0}")]
    UtxoNotFound(OutPoint),

    #[error("utxo {0} already bound to order {1}")]
    UtxoAlreadyBound(OutPoint, u64),

    #[error("order {order_id}: invalid status transition {from:?} -> {to:?}")]
    InvalidStatusTransition {
        order_id: u64,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("{0}")]
    Other(String),
}
