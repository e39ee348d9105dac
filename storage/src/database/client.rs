use crate::{
    database::store::{OnDemandStore, TransactionalStore},
    Error,
};
use async_trait::async_trait;

/// Provides access to a database.
#[async_trait]
pub trait DatabaseClient<S, T>
where
    Self: Send + Sync,
    S: OnDemandStore,
    T: TransactionalStore,
{
    /// Returns an on-demand store, used for reads and single-statement writes.
    fn on_demand(&self) -> S;

    /// Returns a transactional store. You _should_ call `commit()` or
    /// `rollback()` on the result; dropping it rolls the transaction back.
    async fn begin(&self) -> Result<T, Error>;
}
