use crate::{
    database::store::TransactionalStore,
    models::{campaign::CampaignRow, donation::DonationRow},
    stores::{campaign::CampaignStore, donation::DonationStore},
    Error,
};
use anyhow::anyhow;
use async_trait::async_trait;

#[async_trait]
pub trait DonationAndCampaignStore: Send + Sync {
    /// Locks the donation's campaign, writes the donation and recomputes the
    /// raised amount of the campaign. Returns `None` if the donation does not
    /// exist.
    async fn update_donation_and_campaign(
        &self,
        row: DonationRow,
    ) -> Result<Option<(DonationRow, CampaignRow)>, Error>;
}

// Only transactional stores, so the donation and its campaign stay in step.
#[async_trait]
impl<S> DonationAndCampaignStore for S
where
    S: DonationStore + CampaignStore + TransactionalStore,
{
    async fn update_donation_and_campaign(
        &self,
        row: DonationRow,
    ) -> Result<Option<(DonationRow, CampaignRow)>, Error> {
        let missing_campaign = |row: &DonationRow| {
            anyhow!(
                "campaign {} of donation {} is missing",
                row.campaign_id,
                row.donation_id
            )
        };
        // Concurrent updates for one campaign queue on the campaign row, so
        // each refresh sums donations the others have committed.
        if self.find_campaign_by_id(row.campaign_id).await?.is_none() {
            return Err(missing_campaign(&row).into());
        }
        let donation_row = match self.update_donation(row).await? {
            Some(donation_row) => donation_row,
            None => return Ok(None),
        };
        let campaign_row = self
            .refresh_campaign_current_amount(donation_row.campaign_id)
            .await?
            .ok_or_else(|| missing_campaign(&donation_row))?;
        Ok(Some((donation_row, campaign_row)))
    }
}
