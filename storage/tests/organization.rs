mod common;

use common::*;
use crowdfund_storage::{
    database::{client::DatabaseClient, store::TransactionalStore},
    models::organization::OrganizationChanges,
    stores::organization::OrganizationStore,
    Error,
};
use rust_decimal::Decimal;
use testcontainers::clients::Cli;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires docker"]
async fn lists_organizations_in_creation_order() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::default();
    let pg = setup_pg_container(&cli).await?;

    let first = add_organization(&pg.client, "First").await;
    let second = add_organization(&pg.client, "Second").await;

    let rows = pg.client.on_demand().list_organizations().await?;
    let ids: Vec<Uuid> = rows.iter().map(|row| row.organization_id).collect();
    assert_eq!(ids, vec![first.organization_id, second.organization_id]);
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn updates_and_clears_fields() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::default();
    let pg = setup_pg_container(&cli).await?;
    let store = pg.client.on_demand();

    let row = add_organization(&pg.client, "Red Cross").await;
    let row = store
        .update_organization(row.apply_update(OrganizationChanges {
            name: None,
            logo_url: Some(Some("https://example.org/logo.png".to_string())),
        }))
        .await?
        .expect("organization exists");
    assert_eq!(row.logo_url.as_deref(), Some("https://example.org/logo.png"));

    let row = store
        .update_organization(row.apply_update(OrganizationChanges {
            name: Some("Blue Cross".to_string()),
            logo_url: Some(None),
        }))
        .await?
        .expect("organization exists");
    assert_eq!(row.name, "Blue Cross");
    assert_eq!(row.logo_url, None);

    let mut missing = row.clone();
    missing.organization_id = Uuid::new_v4();
    assert_eq!(store.update_organization(missing).await?, None);
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn delete_reports_whether_removed() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::default();
    let pg = setup_pg_container(&cli).await?;
    let store = pg.client.on_demand();

    let row = add_organization(&pg.client, "Short lived").await;
    assert!(store.delete_organization(row.organization_id).await?);
    assert!(!store.delete_organization(row.organization_id).await?);
    assert_eq!(store.find_organization_by_id(row.organization_id).await?, None);
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn delete_with_campaigns_violates_foreign_key() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::default();
    let pg = setup_pg_container(&cli).await?;

    let organization = add_organization(&pg.client, "Busy").await;
    add_campaign(&pg.client, organization.organization_id, Decimal::new(100000, 2)).await;

    let result = pg
        .client
        .on_demand()
        .delete_organization(organization.organization_id)
        .await;
    assert!(matches!(result, Err(Error::ForeignKeyViolation(_))));
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn concurrent_organization_updates_keep_both_fields() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::default();
    let pg = setup_pg_container(&cli).await?;

    let organization_id = add_organization(&pg.client, "Red Cross").await.organization_id;

    let first = pg.client.begin().await?;
    let row = first
        .find_organization_by_id(organization_id)
        .await?
        .expect("organization exists");
    let second = pg.client.begin().await?;

    let (first_committed, second_updated) = tokio::join!(
        async move {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            first
                .update_organization(row.apply_update(OrganizationChanges {
                    name: Some("Blue Cross".to_string()),
                    logo_url: None,
                }))
                .await?;
            first.commit().await
        },
        async move {
            let row = second
                .find_organization_by_id(organization_id)
                .await?
                .expect("organization exists");
            let updated = second
                .update_organization(row.apply_update(OrganizationChanges {
                    name: None,
                    logo_url: Some(Some("https://example.org/logo.png".to_string())),
                }))
                .await?;
            second.commit().await?;
            Ok::<_, Error>(updated)
        },
    );
    first_committed?;
    second_updated?.expect("organization exists");

    let stored = pg
        .client
        .on_demand()
        .find_organization_by_id(organization_id)
        .await?
        .expect("organization exists");
    assert_eq!(stored.name, "Blue Cross");
    assert_eq!(stored.logo_url.as_deref(), Some("https://example.org/logo.png"));
    Ok(())
}
