#![allow(dead_code)]

use chrono::Utc;
use crowdfund_storage::{
    database::client::DatabaseClient,
    models::{campaign::*, donation::*, organization::*},
    sqlx::client::PgDatabaseClient,
    stores::{campaign::CampaignStore, donation::DonationStore, organization::OrganizationStore},
};
use rust_decimal::Decimal;
use std::time::Duration;
use testcontainers::{
    clients::Cli,
    images::generic::{GenericImage, WaitFor},
    Container, Docker,
};
use uuid::Uuid;

pub struct PgContainer<'a> {
    pub client: PgDatabaseClient,

    // Stopped when dropped.
    _container: Container<'a, Cli, GenericImage>,
}

// Starts a postgres instance via docker, connects and migrates it.
pub async fn setup_pg_container<'a>(
    docker_cli: &'a Cli,
) -> Result<PgContainer<'a>, Box<dyn std::error::Error>> {
    let db = "crowdfund-db-test";
    let user = "crowdfund-user-test";
    let password = "crowdfund-password-test";

    let generic_postgres = GenericImage::new("postgres:14-alpine")
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_DB", db)
        .with_env_var("POSTGRES_USER", user)
        .with_env_var("POSTGRES_PASSWORD", password);

    let container = docker_cli.run(generic_postgres);

    let postgres_uri = format!(
        "postgres://{}:{}@localhost:{}/{}?sslmode=disable",
        user,
        password,
        container
            .get_host_port(5432)
            .ok_or("failed getting host port")?,
        db
    );

    let client = PgDatabaseClient::connect(&postgres_uri, 5, Duration::from_secs(30)).await?;
    client.run_migrations().await?;

    Ok(PgContainer {
        client,
        _container: container,
    })
}

pub async fn add_organization(client: &PgDatabaseClient, name: &str) -> OrganizationRow {
    client
        .on_demand()
        .add_organization(NewOrganizationRow {
            create_time: Utc::now(),
            name: name.to_string(),
            logo_url: None,
        })
        .await
        .expect("add organization")
}

pub async fn add_campaign(
    client: &PgDatabaseClient,
    organization_id: Uuid,
    target_amount: Decimal,
) -> CampaignRow {
    let now = Utc::now();
    client
        .on_demand()
        .add_campaign(NewCampaignRow {
            create_time: now,
            update_time: now,
            name: "Clean water".to_string(),
            description: None,
            target_amount,
            organization_id,
            is_active: true,
        })
        .await
        .expect("add campaign")
}

pub async fn add_donation(
    client: &PgDatabaseClient,
    campaign_id: Uuid,
    donor_name: &str,
    amount: Decimal,
) -> DonationRow {
    client
        .on_demand()
        .add_donation(NewDonationRow {
            create_time: Utc::now(),
            campaign_id,
            donor_name: donor_name.to_string(),
            donor_email: None,
            donor_phone: None,
            amount,
            message: None,
        })
        .await
        .expect("add donation")
}

/// Writes `row` as confirmed at `confirm_time`.
pub async fn confirm_donation(
    client: &PgDatabaseClient,
    row: DonationRow,
    confirm_time: chrono::DateTime<Utc>,
) -> DonationRow {
    let row = row.apply_update(
        DonationChanges {
            payment_status: Some(PaymentStatus::Confirmed),
            payment_proof_url: None,
        },
        confirm_time,
    );
    client
        .on_demand()
        .update_donation(row)
        .await
        .expect("update donation")
        .expect("donation exists")
}
