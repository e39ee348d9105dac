use crate::{
    database::client::DatabaseClient,
    sqlx::store::{PgOnDemandStore, PgTransactionalStore},
    Error,
};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::{sync::Arc, time::Duration};

/// Wrapper around sqlx::Pool<Postgres>.
pub struct PgDatabaseClient {
    inner: Arc<Pool<Postgres>>,
}

impl PgDatabaseClient {
    /// Connects to the provided postgres URI and returns the connected client.
    pub async fn connect(
        postgres_uri: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, Error> {
        let inner = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(postgres_uri)
            .await?;
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Provides access to the underlying sqlx pool.
    pub fn inner(&self) -> &Pool<Postgres> {
        &self.inner
    }

    /// Applies the embedded migrations that have not run yet.
    pub async fn run_migrations(&self) -> Result<(), Error> {
        Ok(sqlx::migrate!().run(&*self.inner).await?)
    }
}

#[async_trait]
impl DatabaseClient<PgOnDemandStore, PgTransactionalStore> for PgDatabaseClient {
    fn on_demand(&self) -> PgOnDemandStore {
        PgOnDemandStore::new(self.inner.clone())
    }

    async fn begin(&self) -> Result<PgTransactionalStore, Error> {
        let txn = self.inner.begin().await?;
        Ok(PgTransactionalStore::new(txn))
    }
}
