use crate::{
    database::store::{OnDemandStore, TransactionalStore},
    Error,
};
use async_trait::async_trait;
use futures::lock::Mutex;
use sqlx::{Pool, Postgres, Transaction};
use std::sync::Arc;

#[derive(Debug)]
pub struct PgOnDemandStore {
    pub(crate) pool: Arc<Pool<Postgres>>,
}

impl PgOnDemandStore {
    pub(crate) fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OnDemandStore for PgOnDemandStore {}

/// Stores share the transaction through a lock so that `&self` store methods
/// can each borrow the connection in turn.
#[derive(Debug)]
pub struct PgTransactionalStore {
    pub(crate) txn: Mutex<Transaction<'static, Postgres>>,
}

impl PgTransactionalStore {
    pub(crate) fn new(txn: Transaction<'static, Postgres>) -> Self {
        Self {
            txn: Mutex::new(txn),
        }
    }
}

#[async_trait]
impl TransactionalStore for PgTransactionalStore {
    async fn commit(self) -> Result<(), Error> {
        self.txn.into_inner().commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.txn.into_inner().rollback().await?;
        Ok(())
    }
}
