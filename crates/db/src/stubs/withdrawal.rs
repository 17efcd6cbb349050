use std::{collections::BTreeMap, sync::RwLock};

use async_trait::async_trait;
use bitcoin::{OutPoint, Txid};

use crate::{
    traits::WithdrawalStore,
    types::{OrderStatus, UtxoEntry, WithdrawalOrderEntry},
    DbError, DbResult,
};

/// In-memory [`WithdrawalStore`] for tests and local runs.
#[derive(Debug, Default)]
pub struct StubWithdrawalDb(RwLock<Inner>);

#[derive(Debug, Default)]
struct Inner {
    orders: BTreeMap<u64, WithdrawalOrderEntry>,
    // Vec keeps utxos in insertion order, which doubles as input order for
    // orders built by the construction pipeline.
    utxos: Vec<UtxoEntry>,
}

impl StubWithdrawalDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WithdrawalStore for StubWithdrawalDb {
    async fn list_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> DbResult<Vec<WithdrawalOrderEntry>> {
        let inner = self.0.read().unwrap();
        Ok(inner
            .orders
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect())
    }

    async fn get_order(&self, order_id: u64) -> DbResult<Option<WithdrawalOrderEntry>> {
        let inner = self.0.read().unwrap();
        Ok(inner.orders.get(&order_id).cloned())
    }

    async fn put_order(&self, entry: WithdrawalOrderEntry) -> DbResult<()> {
        let mut inner = self.0.write().unwrap();
        inner.orders.insert(entry.order_id, entry);
        Ok(())
    }

    async fn utxos_for_order(&self, order_id: u64) -> DbResult<Vec<UtxoEntry>> {
        let inner = self.0.read().unwrap();
        Ok(inner
            .utxos
            .iter()
            .filter(|u| u.order_id == Some(order_id))
            .cloned()
            .collect())
    }

    async fn utxo_by_outpoint(&self, outpoint: OutPoint) -> DbResult<Option<UtxoEntry>> {
        let inner = self.0.read().unwrap();
        Ok(inner.utxos.iter().find(|u| u.outpoint == outpoint).cloned())
    }

    async fn put_utxo(&self, utxo: UtxoEntry) -> DbResult<()> {
        let mut inner = self.0.write().unwrap();
        if let Some(existing) = inner.utxos.iter_mut().find(|u| u.outpoint == utxo.outpoint) {
            *existing = utxo;
        } else {
            inner.utxos.push(utxo);
        }
        Ok(())
    }

    async fn bind_utxo(&self, outpoint: OutPoint, order_id: u64) -> DbResult<()> {
        let mut inner = self.0.write().unwrap();
        let utxo = inner
            .utxos
            .iter_mut()
            .find(|u| u.outpoint == outpoint)
            .ok_or(DbError::UtxoNotFound(outpoint))?;

        match utxo.order_id {
            Some(held_by) if held_by != order_id => {
                Err(DbError::UtxoAlreadyBound(outpoint, held_by))
            }
            _ => {
                utxo.order_id = Some(order_id);
                Ok(())
            }
        }
    }

    async fn mark_order_pending(&self, order_id: u64, txid: Txid, height: u64) -> DbResult<()> {
        let mut inner = self.0.write().unwrap();
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(DbError::OrderNotFound(order_id))?;

        if order.status != OrderStatus::ReadyToSign {
            return Err(DbError::InvalidStatusTransition {
                order_id,
                from: order.status,
                to: OrderStatus::Pending,
            });
        }

        order.status = OrderStatus::Pending;
        order.txid = Some(txid);
        order.broadcast_height = Some(height);
        Ok(())
    }

    async fn discard_in_progress(&self) -> DbResult<u64> {
        let mut inner = self.0.write().unwrap();
        let discarded: Vec<u64> = inner
            .orders
            .values()
            .filter(|o| o.status.is_in_progress())
            .map(|o| o.order_id)
            .collect();

        for order_id in &discarded {
            inner.orders.remove(order_id);
        }
        for utxo in inner.utxos.iter_mut() {
            if utxo.order_id.is_some_and(|id| discarded.contains(&id)) {
                utxo.order_id = None;
            }
        }

        Ok(discarded.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{hashes::Hash, Amount, ScriptBuf};

    use super::*;

    fn outpoint(n: u8) -> OutPoint {
        OutPoint::new(Txid::from_slice(&[n; 32]).unwrap(), 0)
    }

    fn utxo(n: u8) -> UtxoEntry {
        UtxoEntry::new(outpoint(n), Amount::from_sat(50_000), ScriptBuf::new())
    }

    fn order(id: u64, status: OrderStatus) -> WithdrawalOrderEntry {
        WithdrawalOrderEntry::new(id, vec![], status)
    }

    #[tokio::test]
    async fn bind_utxo_is_exclusive() {
        let db = StubWithdrawalDb::new();
        db.put_utxo(utxo(1)).await.unwrap();

        db.bind_utxo(outpoint(1), 10).await.unwrap();
        // Rebinding to the same order is a no-op.
        db.bind_utxo(outpoint(1), 10).await.unwrap();

        let err = db.bind_utxo(outpoint(1), 11).await.unwrap_err();
        assert!(matches!(err, DbError::UtxoAlreadyBound(_, 10)));
    }

    #[tokio::test]
    async fn mark_pending_requires_ready_status() {
        let db = StubWithdrawalDb::new();
        db.put_order(order(1, OrderStatus::ReadyToSign)).await.unwrap();

        let txid = Txid::from_slice(&[9; 32]).unwrap();
        db.mark_order_pending(1, txid, 100).await.unwrap();

        let stored = db.get_order(1).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.txid, Some(txid));
        assert_eq!(stored.broadcast_height, Some(100));

        // A second transition must be rejected.
        let err = db.mark_order_pending(1, txid, 101).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidStatusTransition { .. }));
    }

    #[tokio::test]
    async fn discard_removes_in_progress_and_releases_utxos() {
        let db = StubWithdrawalDb::new();
        db.put_order(order(1, OrderStatus::Created)).await.unwrap();
        db.put_order(order(2, OrderStatus::Aggregating)).await.unwrap();
        db.put_order(order(3, OrderStatus::ReadyToSign)).await.unwrap();
        db.put_order(order(4, OrderStatus::Pending)).await.unwrap();

        db.put_utxo(utxo(1)).await.unwrap();
        db.put_utxo(utxo(2)).await.unwrap();
        db.bind_utxo(outpoint(1), 2).await.unwrap();
        db.bind_utxo(outpoint(2), 4).await.unwrap();

        let removed = db.discard_in_progress().await.unwrap();
        assert_eq!(removed, 2);

        assert!(db.get_order(1).await.unwrap().is_none());
        assert!(db.get_order(2).await.unwrap().is_none());
        assert!(db.get_order(3).await.unwrap().is_some());
        assert!(db.get_order(4).await.unwrap().is_some());

        // Utxo held by the discarded order is released, the pending one is
        // not.
        let u1 = db.utxo_by_outpoint(outpoint(1)).await.unwrap().unwrap();
        assert_eq!(u1.order_id, None);
        let u2 = db.utxo_by_outpoint(outpoint(2)).await.unwrap().unwrap();
        assert_eq!(u2.order_id, Some(4));
    }
}
