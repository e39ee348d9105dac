use crate::protobuf::{from::ProtoFrom, into::IntoProto};
use crowdfund_api::crowdfund::{Campaign, CampaignWithStats};
use crowdfund_storage::models::campaign::{CampaignRow, CampaignWithStatsRow};
use tonic::Status;

impl ProtoFrom<CampaignRow> for Campaign {
    fn proto_from(row: CampaignRow) -> Result<Self, Status> {
        Ok(Campaign {
            campaign_id: row.campaign_id.into_proto()?,
            create_time: Some(row.create_time.into_proto()?),
            update_time: Some(row.update_time.into_proto()?),
            name: row.name,
            description: row.description,
            target_amount: Some(row.target_amount.into_proto()?),
            current_amount: Some(row.current_amount.into_proto()?),
            organization_id: row.organization_id.into_proto()?,
            is_active: row.is_active,
        })
    }
}

impl ProtoFrom<CampaignWithStatsRow> for CampaignWithStats {
    fn proto_from(row: CampaignWithStatsRow) -> Result<Self, Status> {
        let progress_percentage = row.progress_percentage();
        Ok(CampaignWithStats {
            campaign: Some(row.campaign.into_proto()?),
            organization_name: row.organization_name,
            total_donors: row.total_donors,
            confirmed_donors: row.confirmed_donors,
            progress_percentage,
        })
    }
}
