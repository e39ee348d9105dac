use crate::protobuf::into::IntoProto;
use async_trait::async_trait;
use chrono::Utc;
use crowdfund_api::crowdfund::{health_service_server::HealthService, CheckRequest, CheckResponse};
use tonic::{Request, Response, Status};

#[derive(Default)]
pub struct HealthServiceImpl {}

impl HealthServiceImpl {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl HealthService for HealthServiceImpl {
    async fn check(&self, _: Request<CheckRequest>) -> Result<Response<CheckResponse>, Status> {
        Ok(Response::new(CheckResponse {
            status: "ok".to_string(),
            time: Some(Utc::now().into_proto()?),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn check_reports_ok() {
        let response = HealthServiceImpl::new()
            .check(Request::new(CheckRequest {}))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status, "ok");
        assert!(response.time.is_some());
    }
}
