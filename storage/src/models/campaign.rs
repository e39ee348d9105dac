use chrono::{DateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

#[derive(Clone, Debug, FromRow, PartialEq)]
pub struct CampaignRow {
    pub campaign_id: Uuid,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub organization_id: Uuid,
    pub is_active: bool,
}

/// A new campaign. The raised amount always starts at zero.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCampaignRow {
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub organization_id: Uuid,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CampaignChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub target_amount: Option<Decimal>,
    pub organization_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl CampaignRow {
    /// Overwrites the changed fields. `update_time` moves to `now` even when
    /// nothing else changes.
    pub fn apply_update(mut self, changes: CampaignChanges, now: DateTime<Utc>) -> Self {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(target_amount) = changes.target_amount {
            self.target_amount = target_amount;
        }
        if let Some(organization_id) = changes.organization_id {
            self.organization_id = organization_id;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.update_time = now;
        self
    }
}

/// A campaign joined with its organization and donation counts.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignWithStatsRow {
    pub campaign: CampaignRow,
    pub organization_name: String,
    /// Every donation of the campaign regardless of payment status.
    pub total_donors: i64,
    pub confirmed_donors: i64,
}

impl CampaignWithStatsRow {
    pub fn progress_percentage(&self) -> i64 {
        progress_percentage(self.campaign.current_amount, self.campaign.target_amount)
    }
}

impl<'r> FromRow<'r, PgRow> for CampaignWithStatsRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            campaign: CampaignRow::from_row(row)?,
            organization_name: row.try_get("organization_name")?,
            total_donors: row.try_get("total_donors")?,
            confirmed_donors: row.try_get("confirmed_donors")?,
        })
    }
}

/// Percentage of `target` raised so far, rounded half away from zero. Not
/// capped at 100. A non-positive target yields 0.
pub fn progress_percentage(current: Decimal, target: Decimal) -> i64 {
    if target <= Decimal::ZERO {
        return 0;
    }
    current
        .checked_mul(Decimal::from(100))
        .and_then(|scaled| scaled.checked_div(target))
        .map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .unwrap_or(0)
}
