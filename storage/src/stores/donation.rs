use crate::{
    models::donation::*,
    sqlx::store::{PgOnDemandStore, PgTransactionalStore},
    Error,
};
use async_trait::async_trait;
use sqlx::PgExecutor;
use uuid::Uuid;

#[async_trait]
pub trait DonationStore: Send + Sync {
    /// Adds a pending donation.
    async fn add_donation(&self, new_row: NewDonationRow) -> Result<DonationRow, Error>;

    /// Finds a donation. Within a transaction the row stays locked until the
    /// transaction ends.
    async fn find_donation_by_id(&self, donation_id: Uuid) -> Result<Option<DonationRow>, Error>;

    async fn list_donations(&self) -> Result<Vec<DonationRow>, Error>;

    /// Lists the campaign's confirmed donations, most recently confirmed first.
    async fn list_latest_confirmed_donations(
        &self,
        campaign_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DonationRow>, Error>;

    /// Lists donations whose donor name contains `query`, ignoring case.
    async fn search_donations_by_donor_name(
        &self,
        query: String,
        campaign_id: Option<Uuid>,
    ) -> Result<Vec<DonationRow>, Error>;

    async fn update_donation(&self, row: DonationRow) -> Result<Option<DonationRow>, Error>;
}

#[async_trait]
impl DonationStore for PgOnDemandStore {
    async fn add_donation(&self, new_row: NewDonationRow) -> Result<DonationRow, Error> {
        Ok(add_donation(&*self.pool, new_row).await?)
    }

    async fn find_donation_by_id(&self, donation_id: Uuid) -> Result<Option<DonationRow>, Error> {
        Ok(find_donation_by_id(&*self.pool, donation_id).await?)
    }

    async fn list_donations(&self) -> Result<Vec<DonationRow>, Error> {
        Ok(list_donations(&*self.pool).await?)
    }

    async fn list_latest_confirmed_donations(
        &self,
        campaign_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DonationRow>, Error> {
        Ok(list_latest_confirmed_donations(&*self.pool, campaign_id, limit).await?)
    }

    async fn search_donations_by_donor_name(
        &self,
        query: String,
        campaign_id: Option<Uuid>,
    ) -> Result<Vec<DonationRow>, Error> {
        Ok(search_donations_by_donor_name(&*self.pool, query, campaign_id).await?)
    }

    async fn update_donation(&self, row: DonationRow) -> Result<Option<DonationRow>, Error> {
        Ok(update_donation(&*self.pool, row).await?)
    }
}

#[async_trait]
impl DonationStore for PgTransactionalStore {
    async fn add_donation(&self, new_row: NewDonationRow) -> Result<DonationRow, Error> {
        let mut lock = self.txn.lock().await;
        Ok(add_donation(&mut *lock, new_row).await?)
    }

    async fn find_donation_by_id(&self, donation_id: Uuid) -> Result<Option<DonationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(find_donation_by_id_for_update(&mut *lock, donation_id).await?)
    }

    async fn list_donations(&self) -> Result<Vec<DonationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(list_donations(&mut *lock).await?)
    }

    async fn list_latest_confirmed_donations(
        &self,
        campaign_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DonationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(list_latest_confirmed_donations(&mut *lock, campaign_id, limit).await?)
    }

    async fn search_donations_by_donor_name(
        &self,
        query: String,
        campaign_id: Option<Uuid>,
    ) -> Result<Vec<DonationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(search_donations_by_donor_name(&mut *lock, query, campaign_id).await?)
    }

    async fn update_donation(&self, row: DonationRow) -> Result<Option<DonationRow>, Error> {
        let mut lock = self.txn.lock().await;
        Ok(update_donation(&mut *lock, row).await?)
    }
}

async fn add_donation<'a, E>(executor: E, new_row: NewDonationRow) -> Result<DonationRow, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        INSERT INTO donations (
            create_time,
            campaign_id,
            donor_name,
            donor_email,
            donor_phone,
            amount,
            message,
            payment_status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(new_row.create_time)
    .bind(new_row.campaign_id)
    .bind(new_row.donor_name)
    .bind(new_row.donor_email)
    .bind(new_row.donor_phone)
    .bind(new_row.amount)
    .bind(new_row.message)
    .bind(PaymentStatus::Pending)
    .fetch_one(executor)
    .await?)
}

async fn find_donation_by_id<'a, E>(
    executor: E,
    donation_id: Uuid,
) -> Result<Option<DonationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(
        sqlx::query_as("SELECT * FROM donations WHERE donation_id = $1")
            .bind(donation_id)
            .fetch_optional(executor)
            .await?,
    )
}

async fn find_donation_by_id_for_update<'a, E>(
    executor: E,
    donation_id: Uuid,
) -> Result<Option<DonationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(
        sqlx::query_as("SELECT * FROM donations WHERE donation_id = $1 FOR UPDATE")
            .bind(donation_id)
            .fetch_optional(executor)
            .await?,
    )
}

async fn list_donations<'a, E>(executor: E) -> Result<Vec<DonationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        "SELECT * FROM donations \
        ORDER BY create_time ASC, donation_id ASC",
    )
    .fetch_all(executor)
    .await?)
}

async fn list_latest_confirmed_donations<'a, E>(
    executor: E,
    campaign_id: Uuid,
    limit: i64,
) -> Result<Vec<DonationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        SELECT * FROM donations
        WHERE campaign_id = $1
            AND payment_status = 'confirmed'
            AND confirm_time IS NOT NULL
        ORDER BY confirm_time DESC, donation_id ASC
        LIMIT $2
        "#,
    )
    .bind(campaign_id)
    .bind(limit)
    .fetch_all(executor)
    .await?)
}

async fn search_donations_by_donor_name<'a, E>(
    executor: E,
    query: String,
    campaign_id: Option<Uuid>,
) -> Result<Vec<DonationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        SELECT * FROM donations
        WHERE donor_name ILIKE $1
            AND ($2::uuid IS NULL OR campaign_id = $2)
        ORDER BY create_time ASC, donation_id ASC
        "#,
    )
    .bind(contains_pattern(&query))
    .bind(campaign_id)
    .fetch_all(executor)
    .await?)
}

async fn update_donation<'a, E>(executor: E, row: DonationRow) -> Result<Option<DonationRow>, Error>
where
    E: PgExecutor<'a>,
{
    Ok(sqlx::query_as(
        r#"
        UPDATE donations
        SET
            payment_status = $2,
            payment_proof_url = $3,
            confirm_time = $4
        WHERE donation_id = $1
        RETURNING *
        "#,
    )
    .bind(row.donation_id)
    .bind(row.payment_status)
    .bind(row.payment_proof_url)
    .bind(row.confirm_time)
    .fetch_optional(executor)
    .await?)
}

/// Builds a LIKE pattern matching any text containing `query`. Wildcards and
/// the escape character in `query` match themselves.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
