use crate::{errors::storage_status, protobuf::from::ProtoFrom, validate};
use async_trait::async_trait;
use chrono::Utc;
use crowdfund_api::crowdfund::{
    campaign_service_server::CampaignService, Campaign, CampaignWithStats, CreateCampaignRequest,
    DeleteCampaignRequest, DeleteCampaignResponse, GetCampaignWithStatsRequest,
    GetCampaignWithStatsResponse, ListCampaignsRequest, ListCampaignsResponse,
    UpdateCampaignRequest,
};
use crowdfund_status::{not_found, well_known::missing_required_field};
use crowdfund_storage::{
    database::{
        client::DatabaseClient,
        store::{OnDemandStore, TransactionalStore},
    },
    models::campaign::{CampaignChanges, NewCampaignRow},
    stores::{campaign::CampaignStore, organization::OrganizationStore},
};
use log::info;
use std::{marker::PhantomData, sync::Arc};
use tonic::{Request, Response, Status};
use uuid::Uuid;


const UPDATE_PATHS: &[&str] = &[
    "name",
    "description",
    "target_amount",
    "organization_id",
    "is_active",
];

pub struct CampaignServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore>,
    Store: CampaignStore + OnDemandStore,
    TStore: CampaignStore + OrganizationStore + TransactionalStore,
{
    database: Arc<Db>,
    _marker: PhantomData<fn() -> (Store, TStore)>,
}

impl<Db, Store, TStore> CampaignServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore>,
    Store: CampaignStore + OnDemandStore,
    TStore: CampaignStore + OrganizationStore + TransactionalStore,
{
    pub fn new(database: Arc<Db>) -> Self {
        Self {
            database,
            _marker: PhantomData,
        }
    }
}

/// Fails with NOT_FOUND unless the organization exists as seen by `txn`.
async fn check_organization_exists<T>(txn: &T, organization_id: Uuid) -> Result<(), Status>
where
    T: OrganizationStore,
{
    txn.find_organization_by_id(organization_id)
        .await
        .map_err(storage_status)?
        .map(|_| ())
        .ok_or_else(|| not_found!("organization '{}' not found", organization_id))
}

#[async_trait]
impl<Db, Store, TStore> CampaignService for CampaignServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore> + 'static,
    Store: CampaignStore + OnDemandStore + 'static,
    TStore: CampaignStore + OrganizationStore + TransactionalStore + 'static,
{
    async fn create_campaign(
        &self,
        request: Request<CreateCampaignRequest>,
    ) -> Result<Response<Campaign>, Status> {
        let message = request.into_inner();
        let name = validate::required_text("name", message.name)?;
        let description = validate::optional_text(message.description);
        let target_amount = validate::positive_amount("target_amount", message.target_amount)?;
        let organization_id = validate::uuid("organization_id", message.organization_id)?;
        let is_active = message.is_active.unwrap_or(true);

        let txn = self.database.begin().await.map_err(storage_status)?;
        check_organization_exists(&txn, organization_id).await?;
        let now = Utc::now();
        let row = txn
            .add_campaign(NewCampaignRow {
                create_time: now,
                update_time: now,
                name,
                description,
                target_amount,
                organization_id,
                is_active,
            })
            .await
            .map_err(storage_status)?;
        txn.commit().await.map_err(storage_status)?;
        info!(
            "Created campaign {} for organization {}",
            row.campaign_id, organization_id
        );

        Ok(Response::new(Campaign::proto_from(row)?))
    }

    async fn list_campaigns(
        &self,
        _: Request<ListCampaignsRequest>,
    ) -> Result<Response<ListCampaignsResponse>, Status> {
        let rows = self
            .database
            .on_demand()
            .list_campaigns()
            .await
            .map_err(storage_status)?;

        Ok(Response::new(ListCampaignsResponse {
            campaigns: rows
                .into_iter()
                .map(Campaign::proto_from)
                .collect::<Result<_, _>>()?,
        }))
    }

    async fn get_campaign_with_stats(
        &self,
        request: Request<GetCampaignWithStatsRequest>,
    ) -> Result<Response<GetCampaignWithStatsResponse>, Status> {
        let message = request.into_inner();
        let campaign_id = validate::uuid("campaign_id", message.campaign_id)?;

        let row = self
            .database
            .on_demand()
            .find_campaign_with_stats(campaign_id)
            .await
            .map_err(storage_status)?;

        Ok(Response::new(GetCampaignWithStatsResponse {
            campaign: row.map(CampaignWithStats::proto_from).transpose()?,
        }))
    }

    async fn update_campaign(
        &self,
        request: Request<UpdateCampaignRequest>,
    ) -> Result<Response<Campaign>, Status> {
        let message = request.into_inner();
        let campaign = message
            .campaign
            .ok_or_else(|| missing_required_field("campaign"))?;
        let campaign_id = validate::uuid("campaign.campaign_id", campaign.campaign_id)?;
        let paths = validate::update_paths(message.update_mask, UPDATE_PATHS)?;

        let mut changes = CampaignChanges::default();
        if paths.contains("name") {
            changes.name = Some(validate::required_text("campaign.name", campaign.name)?);
        }
        if paths.contains("description") {
            changes.description = Some(validate::optional_text(campaign.description));
        }
        if paths.contains("target_amount") {
            changes.target_amount = Some(validate::positive_amount(
                "campaign.target_amount",
                campaign.target_amount,
            )?);
        }
        if paths.contains("organization_id") {
            changes.organization_id = Some(validate::uuid(
                "campaign.organization_id",
                campaign.organization_id,
            )?);
        }
        if paths.contains("is_active") {
            changes.is_active = Some(campaign.is_active);
        }

        let txn = self.database.begin().await.map_err(storage_status)?;
        let row = txn
            .find_campaign_by_id(campaign_id)
            .await
            .map_err(storage_status)?
            .ok_or_else(|| not_found!("campaign '{}' not found", campaign_id))?;
        if let Some(organization_id) = changes.organization_id {
            if organization_id != row.organization_id {
                check_organization_exists(&txn, organization_id).await?;
            }
        }
        let row = txn
            .update_campaign(row.apply_update(changes, Utc::now()))
            .await
            .map_err(storage_status)?
            .ok_or_else(|| not_found!("campaign '{}' not found", campaign_id))?;
        txn.commit().await.map_err(storage_status)?;
        info!("Updated campaign {}", campaign_id);

        Ok(Response::new(Campaign::proto_from(row)?))
    }

    async fn delete_campaign(
        &self,
        request: Request<DeleteCampaignRequest>,
    ) -> Result<Response<DeleteCampaignResponse>, Status> {
        let message = request.into_inner();
        let campaign_id = validate::uuid("campaign_id", message.campaign_id)?;

        let success = self
            .database
            .on_demand()
            .delete_campaign(campaign_id)
            .await
            .map_err(storage_status)?;
        if success {
            info!("Deleted campaign {}", campaign_id);
        }

        Ok(Response::new(DeleteCampaignResponse { success }))
    }
}
