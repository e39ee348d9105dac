use crowdfund_api::crowdfund::{
    campaign_service_server::CampaignServiceServer,
    donation_service_server::DonationServiceServer, health_service_server::HealthServiceServer,
    organization_service_server::OrganizationServiceServer,
};
use crowdfund_server::{
    config::load_config,
    services::{
        campaign::CampaignServiceImpl, donation::DonationServiceImpl, health::HealthServiceImpl,
        organization::OrganizationServiceImpl,
    },
};
use crowdfund_storage::sqlx::{
    client::PgDatabaseClient,
    store::{PgOnDemandStore, PgTransactionalStore},
};
use log::{error, info};
use std::sync::Arc;
use tonic::transport::Server;
use tower::ServiceBuilder;

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed listening for SIGTERM: {:?}", e);
                std::future::pending::<()>().await
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed listening for ctrl-c: {:?}", e);
            }
        }
        _ = terminate => {}
    }
    info!("Received shutdown signal, draining requests");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    info!("Loading config");
    let config = load_config()?;

    info!("Connecting to database");
    let database = Arc::new(
        PgDatabaseClient::connect(
            &config.postgres.uri,
            config.postgres.max_connections,
            config.postgres.connect_timeout(),
        )
        .await?,
    );

    info!("Running migrations (if any)");
    database.run_migrations().await?;

    let middleware = ServiceBuilder::new()
        .timeout(config.request_timeout())
        .into_inner();

    // Services:
    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(crowdfund_api::FILE_DESCRIPTOR_SET)
        .build()?;
    let organization_service =
        OrganizationServiceImpl::<_, PgOnDemandStore, PgTransactionalStore>::new(database.clone());
    let campaign_service =
        CampaignServiceImpl::<_, PgOnDemandStore, PgTransactionalStore>::new(database.clone());
    let donation_service =
        DonationServiceImpl::<_, PgOnDemandStore, PgTransactionalStore>::new(database.clone());

    let addr = format!("0.0.0.0:{0}", config.port).parse()?;
    info!("Starting server: {:?}", addr);
    Server::builder()
        .layer(middleware)
        .add_service(reflection_service)
        .add_service(HealthServiceServer::new(HealthServiceImpl::new()))
        .add_service(OrganizationServiceServer::new(organization_service))
        .add_service(CampaignServiceServer::new(campaign_service))
        .add_service(DonationServiceServer::new(donation_service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
