use crate::protobuf::{from::ProtoFrom, into::IntoProto};
use crowdfund_api::crowdfund::Organization;
use crowdfund_storage::models::organization::OrganizationRow;
use tonic::Status;

impl ProtoFrom<OrganizationRow> for Organization {
    fn proto_from(row: OrganizationRow) -> Result<Self, Status> {
        Ok(Organization {
            organization_id: row.organization_id.into_proto()?,
            create_time: Some(row.create_time.into_proto()?),
            name: row.name,
            logo_url: row.logo_url,
        })
    }
}
