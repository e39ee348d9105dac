use crate::{errors::storage_status, protobuf::from::ProtoFrom, validate};
use async_trait::async_trait;
use chrono::Utc;
use crowdfund_api::crowdfund::{
    organization_service_server::OrganizationService, CreateOrganizationRequest,
    DeleteOrganizationRequest, DeleteOrganizationResponse, ListOrganizationsRequest,
    ListOrganizationsResponse, Organization, UpdateOrganizationRequest,
};
use crowdfund_status::{not_found, well_known::missing_required_field};
use crowdfund_storage::{
    database::{
        client::DatabaseClient,
        store::{OnDemandStore, TransactionalStore},
    },
    models::organization::{NewOrganizationRow, OrganizationChanges},
    stores::organization::OrganizationStore,
};
use log::info;
use std::{marker::PhantomData, sync::Arc};
use tonic::{Request, Response, Status};


const UPDATE_PATHS: &[&str] = &["name", "logo_url"];

pub struct OrganizationServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore>,
    Store: OrganizationStore + OnDemandStore,
    TStore: OrganizationStore + TransactionalStore,
{
    database: Arc<Db>,
    _marker: PhantomData<fn() -> (Store, TStore)>,
}

impl<Db, Store, TStore> OrganizationServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore>,
    Store: OrganizationStore + OnDemandStore,
    TStore: OrganizationStore + TransactionalStore,
{
    pub fn new(database: Arc<Db>) -> Self {
        Self {
            database,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<Db, Store, TStore> OrganizationService for OrganizationServiceImpl<Db, Store, TStore>
where
    Db: DatabaseClient<Store, TStore> + 'static,
    Store: OrganizationStore + OnDemandStore + 'static,
    TStore: OrganizationStore + TransactionalStore + 'static,
{
    async fn create_organization(
        &self,
        request: Request<CreateOrganizationRequest>,
    ) -> Result<Response<Organization>, Status> {
        let message = request.into_inner();
        let name = validate::required_text("name", message.name)?;
        let logo_url = validate::optional_url("logo_url", message.logo_url)?;

        let row = self
            .database
            .on_demand()
            .add_organization(NewOrganizationRow {
                create_time: Utc::now(),
                name,
                logo_url,
            })
            .await
            .map_err(storage_status)?;
        info!("Created organization {}", row.organization_id);

        Ok(Response::new(Organization::proto_from(row)?))
    }

    async fn list_organizations(
        &self,
        _: Request<ListOrganizationsRequest>,
    ) -> Result<Response<ListOrganizationsResponse>, Status> {
        let rows = self
            .database
            .on_demand()
            .list_organizations()
            .await
            .map_err(storage_status)?;

        Ok(Response::new(ListOrganizationsResponse {
            organizations: rows
                .into_iter()
                .map(Organization::proto_from)
                .collect::<Result<_, _>>()?,
        }))
    }

    async fn update_organization(
        &self,
        request: Request<UpdateOrganizationRequest>,
    ) -> Result<Response<Organization>, Status> {
        let message = request.into_inner();
        let organization = message
            .organization
            .ok_or_else(|| missing_required_field("organization"))?;
        let organization_id =
            validate::uuid("organization.organization_id", organization.organization_id)?;
        let paths = validate::update_paths(message.update_mask, UPDATE_PATHS)?;

        let mut changes = OrganizationChanges::default();
        if paths.contains("name") {
            changes.name = Some(validate::required_text(
                "organization.name",
                organization.name,
            )?);
        }
        if paths.contains("logo_url") {
            changes.logo_url = Some(validate::optional_url(
                "organization.logo_url",
                organization.logo_url,
            )?);
        }

        let txn = self.database.begin().await.map_err(storage_status)?;
        let row = txn
            .find_organization_by_id(organization_id)
            .await
            .map_err(storage_status)?
            .ok_or_else(|| not_found!("organization '{}' not found", organization_id))?;
        let row = txn
            .update_organization(row.apply_update(changes))
            .await
            .map_err(storage_status)?
            .ok_or_else(|| not_found!("organization '{}' not found", organization_id))?;
        txn.commit().await.map_err(storage_status)?;
        info!("Updated organization {}", organization_id);

        Ok(Response::new(Organization::proto_from(row)?))
    }

    async fn delete_organization(
        &self,
        request: Request<DeleteOrganizationRequest>,
    ) -> Result<Response<DeleteOrganizationResponse>, Status> {
        let message = request.into_inner();
        let organization_id = validate::uuid("organization_id", message.organization_id)?;

        let success = self
            .database
            .on_demand()
            .delete_organization(organization_id)
            .await
            .map_err(storage_status)?;
        if success {
            info!("Deleted organization {}", organization_id);
        }

        Ok(Response::new(DeleteOrganizationResponse { success }))
    }
}
