use crate::{
    errors::storage_status,
    protobuf::{from::ProtoFrom, into::ProtoInto},
    validate,
};
use async_trait::async_trait;
use chrono::Utc;
use crowdfund_api::crowdfund::{
    donation_service_server::DonationService, CreateDonationRequest, Donation,
    ListDonationsRequest, ListDonationsResponse, ListLatestDonorsRequest,
    ListLatestDonorsResponse, SearchDonorsRequest, SearchDonorsResponse, UpdateDonationRequest,
};
use crowdfund_status::{invalid_argument, not_found, well_known::missing_required_field};
use crowdfund_storage::{
    database::{
        client::DatabaseClient,
        store::{OnDemandStore, TransactionalStore},
    },
    models::donation::{DonationChanges, DonationRow, NewDonationRow},
    stores::{
        campaign::CampaignStore, donation::DonationStore,
        donation_and_campaign::DonationAndCampaignStore,
    },
};
use log::info;
use std::{marker::PhantomData, sync::Arc};
use tonic::{Request, Response, Status};


const UPDATE_PATHS: &[&str] = &["payment_status", "payment_proof_url"];

const DEFAULT_LATEST_DONORS: i64 = 5;
const MAX_LATEST_DONORS: i64 = 100;

pub struct DonationServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore>,
    Store: DonationStore + OnDemandStore,
    TStore: DonationStore + CampaignStore + TransactionalStore,
{
    database: Arc<Db>,
    _marker: PhantomData<fn() -> (Store, TStore)>,
}

impl<Db, Store, TStore> DonationServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore>,
    Store: DonationStore + OnDemandStore,
    TStore: DonationStore + CampaignStore + TransactionalStore,
{
    pub fn new(database: Arc<Db>) -> Self {
        Self {
            database,
            _marker: PhantomData,
        }
    }
}

/// Zero asks for the default, anything above the maximum is clamped.
fn latest_donors_limit(limit: i32) -> Result<i64, Status> {
    match i64::from(limit) {
        0 => Ok(DEFAULT_LATEST_DONORS),
        limit if limit < 0 => Err(invalid_argument!("'limit' must not be negative")),
        limit => Ok(limit.min(MAX_LATEST_DONORS)),
    }
}

fn donations_to_proto(rows: Vec<DonationRow>) -> Result<Vec<Donation>, Status> {
    rows.into_iter().map(Donation::proto_from).collect()
}

#[async_trait]
impl<Db, Store, TStore> DonationService for DonationServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore> + 'static,
    Store: DonationStore + OnDemandStore + 'static,
    TStore: DonationStore + CampaignStore + TransactionalStore + 'static,
{
    async fn create_donation(
        &self,
        request: Request<CreateDonationRequest>,
    ) -> Result<Response<Donation>, Status> {
        let message = request.into_inner();
        let campaign_id = validate::uuid("campaign_id", message.campaign_id)?;
        let donor_name = validate::required_text("donor_name", message.donor_name)?;
        let donor_email = validate::optional_email("donor_email", message.donor_email)?;
        let donor_phone = validate::optional_text(message.donor_phone);
        let amount = validate::positive_amount("amount", message.amount)?;
        let body = validate::optional_text(message.message);

        let txn = self.database.begin().await.map_err(storage_status)?;
        txn.find_campaign_by_id(campaign_id)
            .await
            .map_err(storage_status)?
            .ok_or_else(|| not_found!("campaign '{}' not found", campaign_id))?;
        let row = txn
            .add_donation(NewDonationRow {
                create_time: Utc::now(),
                campaign_id,
                donor_name,
                donor_email,
                donor_phone,
                amount,
                message: body,
            })
            .await
            .map_err(storage_status)?;
        txn.commit().await.map_err(storage_status)?;
        info!(
            "Created donation {} for campaign {}",
            row.donation_id, campaign_id
        );

        Ok(Response::new(Donation::proto_from(row)?))
    }

    async fn list_latest_donors(
        &self,
        request: Request<ListLatestDonorsRequest>,
    ) -> Result<Response<ListLatestDonorsResponse>, Status> {
        let message = request.into_inner();
        let campaign_id = validate::uuid("campaign_id", message.campaign_id)?;
        let limit = latest_donors_limit(message.limit)?;

        let rows = self
            .database
            .on_demand()
            .list_latest_confirmed_donations(campaign_id, limit)
            .await
            .map_err(storage_status)?;

        Ok(Response::new(ListLatestDonorsResponse {
            donations: donations_to_proto(rows)?,
        }))
    }

    async fn search_donors(
        &self,
        request: Request<SearchDonorsRequest>,
    ) -> Result<Response<SearchDonorsResponse>, Status> {
        let message = request.into_inner();
        let query = validate::non_blank_text("query", message.query)?;
        let campaign_id = message
            .campaign_id
            .filter(|id| !id.is_empty())
            .map(|id| validate::uuid("campaign_id", id))
            .transpose()?;

        let rows = self
            .database
            .on_demand()
            .search_donations_by_donor_name(query, campaign_id)
            .await
            .map_err(storage_status)?;

        Ok(Response::new(SearchDonorsResponse {
            donations: donations_to_proto(rows)?,
        }))
    }

    async fn list_donations(
        &self,
        _: Request<ListDonationsRequest>,
    ) -> Result<Response<ListDonationsResponse>, Status> {
        let rows = self
            .database
            .on_demand()
            .list_donations()
            .await
            .map_err(storage_status)?;

        Ok(Response::new(ListDonationsResponse {
            donations: donations_to_proto(rows)?,
        }))
    }

    async fn update_donation(
        &self,
        request: Request<UpdateDonationRequest>,
    ) -> Result<Response<Donation>, Status> {
        let message = request.into_inner();
        let donation = message
            .donation
            .ok_or_else(|| missing_required_field("donation"))?;
        let donation_id = validate::uuid("donation.donation_id", donation.donation_id)?;
        let paths = validate::update_paths(message.update_mask, UPDATE_PATHS)?;

        let mut changes = DonationChanges::default();
        if paths.contains("payment_status") {
            changes.payment_status = Some(
                donation
                    .payment_status
                    .proto_into_field("donation.payment_status")?,
            );
        }
        if paths.contains("payment_proof_url") {
            changes.payment_proof_url = Some(validate::optional_url(
                "donation.payment_proof_url",
                donation.payment_proof_url,
            )?);
        }

        let txn = self.database.begin().await.map_err(storage_status)?;
        let row = txn
            .find_donation_by_id(donation_id)
            .await
            .map_err(storage_status)?
            .ok_or_else(|| not_found!("donation '{}' not found", donation_id))?;
        let previous_status = row.payment_status;
        let (row, campaign_row) = txn
            .update_donation_and_campaign(row.apply_update(changes, Utc::now()))
            .await
            .map_err(storage_status)?
            .ok_or_else(|| not_found!("donation '{}' not found", donation_id))?;
        txn.commit().await.map_err(storage_status)?;
        info!(
            "Updated donation {} ({:?} -> {:?}), campaign {} has raised {}",
            donation_id,
            previous_status,
            row.payment_status,
            campaign_row.campaign_id,
            campaign_row.current_amount
        );

        Ok(Response::new(Donation::proto_from(row)?))
    }
}
