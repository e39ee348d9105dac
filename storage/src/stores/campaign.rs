use crate::{
    models::campaign::*,
    sqlx::store::{PgOnDemandStore, PgTransactionalStore},
    Error,
};
use async_trait::async_trait;
use sqlx::PgExecutor;
use uuid::Uuid;

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn add_campaign(&self, new_row: NewCampaignRow) -> Result<CampaignRow, Error>;

    /// Finds a campaign. Within a transaction the row stays locked until the
    /// transaction ends.
    async fn find_campaign_by_id(&self, campaign_id: Uuid) -> Result<Option<CampaignRow>, Error>;

    /// Finds a campaign along with its organization's name and donation counts.
    async fn find_campaign_with_stats(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignWithStatsRow>, Error>;

    async fn list_campaigns(&self) -> Result<Vec<CampaignRow>, Error>;

    async fn update_campaign(&self, row: CampaignRow) -> Result<Option<CampaignRow>, Error>;

    /// Recomputes `current_amount` as the sum of the campaign's confirmed
    /// donations.
    async fn refresh_campaign_current_amount(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignRow>, Error>;

    async fn delete_campaign(&self, campaign_id: Uuid) -> Result<bool, Error>;
}

#[async_trait]
impl CampaignStore for PgOnDemandStore {
    async fn add_campaign(&self, new_row: NewCampaignRow) -> Result<CampaignRow, Error> {
        Ok(add_campaign(&*self.pool, new_row).await?)
    }

    async fn find_campaign_by_id(&self, campaign_id: Uuid) -> Result<Option<CampaignRow>, Error> {
        Ok(find_campaign_by_id(&*self.pool, campaign_id).await?)
    }

    async fn find_campaign_with_stats(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignWithStatsRow>, Error> {
        Ok(find_campaign_with_stats(&*self.pool, campaign_id).await?)
    }

    async fn list_campaigns(&self) -> Result<Vec<CampaignRow>, Error> {
        Ok(list_campaigns(&*self.pool).await?)
    }

    async fn update_campaign(&self, row: CampaignRow) -> Result<Option<CampaignRow>, Error> {
        Ok(update_campaign(&*self.pool, row).await?)
    }

    async fn refresh_campaign_current_amount(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignRow>, Error> {
        Ok(refresh_campaign_current_amount(&*self.pool, campaign_id).await?)
    }

    async fn delete_campaign(&self, campaign_id: Uuid) -> Result<bool, Error> {
        Ok(delete_campaign(&*self.pool, campaign_id).await?)
    }
}

#[async_trait]
impl CampaignStore for PgTransactionalStore {
    async fn add_campaign(&self, new_row: NewCampaignRow) -> Result<CampaignRow, Error> {
        let mut lock = self.txn.lock().await;
        Ok(add_campaign(&mut *lock, new_row).await?)
    }

    async fn find_campaign_by_id(&self, campaign_id: Uuid) -> Result<Option<CampaignRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(find_campaign_by_id_for_update(&mut *lock, campaign_id).await?)
    }

    async fn find_campaign_with_stats(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignWithStatsRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(find_campaign_with_stats(&mut *lock, campaign_id).await?)
    }

    async fn list_campaigns(&self) -> Result<Vec<CampaignRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(list_campaigns(&mut *lock).await?)
    }

    async fn update_campaign(&self, row: CampaignRow) -> Result<Option<CampaignRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(update_campaign(&mut *lock, row).await?)
    }

    async fn refresh_campaign_current_amount(
        &self,
        campaign_id: Uuid,
    ) -> Result<Option<CampaignRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(refresh_campaign_current_amount(&mut *lock, campaign_id).await?)
    }

    async fn delete_campaign(&self, campaign_id: Uuid) -> Result<bool, Error> {
        let mut lock = self.txn.lock().await;
        Ok(delete_campaign(&mut *lock, campaign_id).await?)
    }
}

async fn add_campaign<'a, E>(executor: E, new_row: NewCampaignRow) -> Result<CampaignRow, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        INSERT INTO campaigns (
            create_time,
            update_time,
            name,
            description,
            target_amount,
            organization_id,
            is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(new_row.create_time)
    .bind(new_row.update_time)
    .bind(new_row.name)
    .bind(new_row.description)
    .bind(new_row.target_amount)
    .bind(new_row.organization_id)
    .bind(new_row.is_active)
    .fetch_one(executor)
    .await?)
}

async fn find_campaign_by_id<'a, E>(
    executor: E,
    campaign_id: Uuid,
) -> Result<Option<CampaignRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(
        sqlx::query_as("SELECT * FROM campaigns WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_optional(executor)
            .await?,
    )
}

async fn find_campaign_by_id_for_update<'a, E>(
    executor: E,
    campaign_id: Uuid,
) -> Result<Option<CampaignRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(
        sqlx::query_as("SELECT * FROM campaigns WHERE campaign_id = $1 FOR UPDATE")
            .bind(campaign_id)
            .fetch_optional(executor)
            .await?,
    )
}

async fn find_campaign_with_stats<'a, E>(
    executor: E,
    campaign_id: Uuid,
) -> Result<Option<CampaignWithStatsRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        SELECT
            c.*,
            o.name AS organization_name,
            COUNT(d.donation_id) AS total_donors,
            COUNT(d.donation_id) FILTER (WHERE d.payment_status = 'confirmed') AS confirmed_donors
        FROM campaigns c
        JOIN organizations o ON o.organization_id = c.organization_id
        LEFT JOIN donations d ON d.campaign_id = c.campaign_id
        WHERE c.campaign_id = $1
        GROUP BY c.campaign_id, o.organization_id
        "#,
    )
    .bind(campaign_id)
    .fetch_optional(executor)
    .await?)
}

async fn list_campaigns<'a, E>(executor: E) -> Result<Vec<CampaignRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        "SELECT * FROM campaigns \
        ORDER BY create_time ASC, campaign_id ASC",
    )
    .fetch_all(executor)
    .await?)
}

async fn update_campaign<'a, E>(executor: E, row: CampaignRow) -> Result<Option<CampaignRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        UPDATE campaigns
        SET
            update_time = $2,
            name = $3,
            description = $4,
            target_amount = $5,
            organization_id = $6,
            is_active = $7
        WHERE campaign_id = $1
        RETURNING *
        "#,
    )
    .bind(row.campaign_id)
    .bind(row.update_time)
    .bind(row.name)
    .bind(row.description)
    .bind(row.target_amount)
    .bind(row.organization_id)
    .bind(row.is_active)
    .fetch_optional(executor)
    .await?)
}

async fn refresh_campaign_current_amount<'a, E>(
    executor: E,
    campaign_id: Uuid,
) -> Result<Option<CampaignRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        UPDATE campaigns
        SET current_amount = (
            SELECT COALESCE(SUM(amount), 0)
            FROM donations
            WHERE campaign_id = $1 AND payment_status = 'confirmed'
        )
        WHERE campaign_id = $1
        RETURNING *
        "#,
    )
    .bind(campaign_id)
    .fetch_optional(executor)
    .await?)
}

async fn delete_campaign<'a, E>(executor: E, campaign_id: Uuid) -> Result<bool, Error>
where
    E: PgExecutor<'a>,
{
    let result = sqlx::query("DELETE FROM campaigns WHERE campaign_id = $1")
        .bind(campaign_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
