use async_trait::async_trait;
use crowdfund_storage::{
    database::{
        client::DatabaseClient,
        store::{OnDemandStore, TransactionalStore},
    },
    models::{campaign::*, donation::*, organization::*},
    stores::{campaign::CampaignStore, donation::DonationStore, organization::OrganizationStore},
    Error,
};
use mockall::mock;
use uuid::Uuid;

mock! {
  pub DatabaseClient {}

  #[async_trait]
  impl DatabaseClient<MockStore, MockStore> for DatabaseClient {
      fn on_demand(&self) -> MockStore;

      async fn begin(&self) -> Result<MockStore, Error>;
  }
}

mock! {
  pub Store {}

  #[async_trait]
  impl OrganizationStore for Store {
      async fn add_organization(&self, new_row: NewOrganizationRow)
          -> Result<OrganizationRow, Error>;

      async fn find_organization_by_id(
          &self,
          organization_id: Uuid,
      ) -> Result<Option<OrganizationRow>, Error>;

      async fn list_organizations(&self) -> Result<Vec<OrganizationRow>, Error>;

      async fn update_organization(
          &self,
          row: OrganizationRow,
      ) -> Result<Option<OrganizationRow>, Error>;

      async fn delete_organization(&self, organization_id: Uuid) -> Result<bool, Error>;
  }

  #[async_trait]
  impl CampaignStore for Store {
      async fn add_campaign(&self, new_row: NewCampaignRow) -> Result<CampaignRow, Error>;

      async fn find_campaign_by_id(&self, campaign_id: Uuid)
          -> Result<Option<CampaignRow>, Error>;

      async fn find_campaign_with_stats(
          &self,
          campaign_id: Uuid,
      ) -> Result<Option<CampaignWithStatsRow>, Error>;

      async fn list_campaigns(&self) -> Result<Vec<CampaignRow>, Error>;

      async fn update_campaign(&self, row: CampaignRow) -> Result<Option<CampaignRow>, Error>;

      async fn refresh_campaign_current_amount(
          &self,
          campaign_id: Uuid,
      ) -> Result<Option<CampaignRow>, Error>;

      async fn delete_campaign(&self, campaign_id: Uuid) -> Result<bool, Error>;
  }

  #[async_trait]
  impl DonationStore for Store {
      async fn add_donation(&self, new_row: NewDonationRow) -> Result<DonationRow, Error>;

      async fn find_donation_by_id(&self, donation_id: Uuid)
          -> Result<Option<DonationRow>, Error>;

      async fn list_donations(&self) -> Result<Vec<DonationRow>, Error>;

      async fn list_latest_confirmed_donations(
          &self,
          campaign_id: Uuid,
          limit: i64,
      ) -> Result<Vec<DonationRow>, Error>;

      async fn search_donations_by_donor_name(
          &self,
          query: String,
          campaign_id: Option<Uuid>,
      ) -> Result<Vec<DonationRow>, Error>;

      async fn update_donation(&self, row: DonationRow) -> Result<Option<DonationRow>, Error>;
  }

  #[async_trait]
  impl OnDemandStore for Store {
  }

  #[async_trait]
  impl TransactionalStore for Store {
      async fn commit(self) -> Result<(), Error>;

      async fn rollback(self) -> Result<(), Error>;
  }
}
