use chrono::Utc;
use crowdfund_api::crowdfund::{
    donation_service_client::DonationServiceClient,
    donation_service_server::DonationServiceServer, health_service_client::HealthServiceClient,
    health_service_server::HealthServiceServer, Amount, CheckRequest, CreateDonationRequest,
    PaymentStatus as PaymentStatusProto,
};
use crowdfund_server::services::{donation::DonationServiceImpl, health::HealthServiceImpl};
use crowdfund_storage::models::{
    campaign::CampaignRow,
    donation::{DonationRow, PaymentStatus},
};
use crowdfund_storage_mocks::*;
use rust_decimal::Decimal;
use std::{sync::Arc, time::Duration};
use tonic::{transport::Server, Code, Request};
use uuid::Uuid;

#[tokio::test]
async fn create_donation_over_grpc() -> Result<(), anyhow::Error> {
    let campaign_id = Uuid::new_v4();

    let mut database = MockDatabaseClient::new();
    let mut txn = MockStore::new();
    txn.expect_find_campaign_by_id()
        .times(1)
        .return_once(move |id| {
            let now = Utc::now();
            Ok(Some(CampaignRow {
                campaign_id: id,
                create_time: now,
                update_time: now,
                name: "Clean water".to_string(),
                description: None,
                target_amount: Decimal::new(1000, 0),
                current_amount: Decimal::ZERO,
                organization_id: Uuid::new_v4(),
                is_active: true,
            }))
        });
    txn.expect_add_donation().times(1).return_once(|new_row| {
        Ok(DonationRow {
            donation_id: Uuid::new_v4(),
            create_time: new_row.create_time,
            campaign_id: new_row.campaign_id,
            donor_name: new_row.donor_name,
            donor_email: new_row.donor_email,
            donor_phone: new_row.donor_phone,
            amount: new_row.amount,
            message: new_row.message,
            payment_status: PaymentStatus::Pending,
            payment_proof_url: None,
            confirm_time: None,
        })
    });
    txn.expect_commit().times(1).return_once(|| Ok(()));
    database.expect_begin().times(1).return_once(|| Ok(txn));

    let donation_service = DonationServiceServer::new(DonationServiceImpl::new(Arc::new(database)));
    let addr = "127.0.0.1:54321";
    let server = tokio::spawn(async move {
        Server::builder()
            .add_service(HealthServiceServer::new(HealthServiceImpl::new()))
            .add_service(donation_service)
            .serve(addr.parse().unwrap())
            .await
            .expect("failed to start test server");
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut health = HealthServiceClient::connect(format!("http://{0}", addr)).await?;
    let check = health.check(Request::new(CheckRequest {})).await?.into_inner();
    assert_eq!(check.status, "ok");

    let mut client = DonationServiceClient::connect(format!("http://{0}", addr)).await?;
    let donation = client
        .create_donation(Request::new(CreateDonationRequest {
            campaign_id: campaign_id.to_string(),
            donor_name: "John Doe".to_string(),
            donor_email: None,
            donor_phone: Some("+62 812 0000 0000".to_string()),
            amount: Some(Amount {
                units: 25,
                nanos: 500_000_000,
            }),
            message: None,
        }))
        .await?
        .into_inner();
    assert_eq!(donation.campaign_id, campaign_id.to_string());
    assert_eq!(donation.payment_status(), PaymentStatusProto::Pending);
    assert_eq!(
        donation.amount,
        Some(Amount {
            units: 25,
            nanos: 500_000_000
        })
    );

    // Rejected before reaching storage.
    let status = client
        .create_donation(Request::new(CreateDonationRequest {
            campaign_id: "not-a-uuid".to_string(),
            donor_name: "John Doe".to_string(),
            amount: Some(Amount { units: 1, nanos: 0 }),
            ..Default::default()
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    server.abort();
    Ok(())
}
