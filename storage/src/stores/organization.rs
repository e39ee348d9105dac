use crate::{
    models::organization::*,
    sqlx::store::{PgOnDemandStore, PgTransactionalStore},
    Error,
};
use async_trait::async_trait;
use sqlx::PgExecutor;
use uuid::Uuid;

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn add_organization(&self, new_row: NewOrganizationRow)
        -> Result<OrganizationRow, Error>;

    /// Finds an organization. Within a transaction the row stays locked until
    /// the transaction ends.
    async fn find_organization_by_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<OrganizationRow>, Error>;

    /// Lists every organization, oldest first.
    async fn list_organizations(&self) -> Result<Vec<OrganizationRow>, Error>;

    /// Overwrites the stored organization with `row`. Returns `None` if no
    /// organization has the row's id.
    async fn update_organization(
        &self,
        row: OrganizationRow,
    ) -> Result<Option<OrganizationRow>, Error>;

    /// Returns whether a row was deleted.
    async fn delete_organization(&self, organization_id: Uuid) -> Result<bool, Error>;
}

#[async_trait]
impl OrganizationStore for PgOnDemandStore {
    async fn add_organization(
        &self,
        new_row: NewOrganizationRow,
    ) -> Result<OrganizationRow, Error> {
        Ok(add_organization(&*self.pool, new_row).await?)
    }

    async fn find_organization_by_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<OrganizationRow>, Error> {
        Ok(find_organization_by_id(&*self.pool, organization_id).await?)
    }

    async fn list_organizations(&self) -> Result<Vec<OrganizationRow>, Error> {
        Ok(list_organizations(&*self.pool).await?)
    }

    async fn update_organization(
        &self,
        row: OrganizationRow,
    ) -> Result<Option<OrganizationRow>, Error> {
        Ok(update_organization(&*self.pool, row).await?)
    }

    async fn delete_organization(&self, organization_id: Uuid) -> Result<bool, Error> {
        Ok(delete_organization(&*self.pool, organization_id).await?)
    }
}

#[async_trait]
impl OrganizationStore for PgTransactionalStore {
    async fn add_organization(
        &self,
        new_row: NewOrganizationRow,
    ) -> Result<OrganizationRow, Error> {
        let mut lock = self.txn.lock().await;
        Ok(add_organization(&mut *lock, new_row).await?)
    }

    async fn find_organization_by_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Option<OrganizationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(find_organization_by_id_for_update(&mut *lock, organization_id).await?)
    }

    async fn list_organizations(&self) -> Result<Vec<OrganizationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(list_organizations(&mut *lock).await?)
    }

    async fn update_organization(
        &self,
        row: OrganizationRow,
    ) -> Result<Option<OrganizationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(update_organization(&mut *lock, row).await?)
    }

    async fn delete_organization(&self, organization_id: Uuid) -> Result<bool, Error> {
        let mut lock = self.txn.lock().await;
        Ok(delete_organization(&mut *lock, organization_id).await?)
    }
}

async fn add_organization<'a, E>(
    executor: E,
    new_row: NewOrganizationRow,
) -> Result<OrganizationRow, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        "INSERT INTO organizations (create_time, name, logo_url) \
        VALUES ($1, $2, $3) \
        RETURNING *",
    )
    .bind(new_row.create_time)
    .bind(new_row.name)
    .bind(new_row.logo_url)
    .fetch_one(executor)
    .await?)
}

async fn find_organization_by_id<'a, E>(
    executor: E,
    organization_id: Uuid,
) -> Result<Option<OrganizationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(
        sqlx::query_as("SELECT * FROM organizations WHERE organization_id = $1")
            .bind(organization_id)
            .fetch_optional(executor)
            .await?,
    )
}

async fn find_organization_by_id_for_update<'a, E>(
    executor: E,
    organization_id: Uuid,
) -> Result<Option<OrganizationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(
        sqlx::query_as("SELECT * FROM organizations WHERE organization_id = $1 FOR UPDATE")
            .bind(organization_id)
            .fetch_optional(executor)
            .await?,
    )
}

async fn list_organizations<'a, E>(executor: E) -> Result<Vec<OrganizationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        "SELECT * FROM organizations \
        ORDER BY create_time ASC, organization_id ASC",
    )
    .fetch_all(executor)
    .await?)
}

async fn update_organization<'a, E>(
    executor: E,
    row: OrganizationRow,
) -> Result<Option<OrganizationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        "UPDATE organizations \
        SET name = $2, logo_url = $3 \
        WHERE organization_id = $1 \
        RETURNING *",
    )
    .bind(row.organization_id)
    .bind(row.name)
    .bind(row.logo_url)
    .fetch_optional(executor)
    .await?)
}

async fn delete_organization<'a, E>(executor: E, organization_id: Uuid) -> Result<bool, Error>
where
    E: PgExecutor<'a>,
{
    let result = sqlx::query("DELETE FROM organizations WHERE organization_id = $1")
        .bind(organization_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
