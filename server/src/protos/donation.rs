use crate::protobuf::{
    from::{FromProto, ProtoFrom},
    into::IntoProto,
};
use crowdfund_api::crowdfund::{self, Donation};
use crowdfund_status::invalid_argument;
use crowdfund_storage::models::donation::{DonationRow, PaymentStatus};
use tonic::Status;

impl ProtoFrom<PaymentStatus> for crowdfund::PaymentStatus {
    fn proto_from(value: PaymentStatus) -> Result<Self, Status> {
        Ok(match value {
            PaymentStatus::Pending => crowdfund::PaymentStatus::Pending,
            PaymentStatus::Confirmed => crowdfund::PaymentStatus::Confirmed,
            PaymentStatus::Failed => crowdfund::PaymentStatus::Failed,
        })
    }
}

/// Wire enum value -> PaymentStatus. UNSPECIFIED and unknown values are
/// rejected.
impl FromProto<i32> for PaymentStatus {
    fn from_proto(proto: i32) -> Result<Self, Status> {
        match crowdfund::PaymentStatus::from_i32(proto) {
            Some(crowdfund::PaymentStatus::Pending) => Ok(PaymentStatus::Pending),
            Some(crowdfund::PaymentStatus::Confirmed) => Ok(PaymentStatus::Confirmed),
            Some(crowdfund::PaymentStatus::Failed) => Ok(PaymentStatus::Failed),
            Some(crowdfund::PaymentStatus::Unspecified) => {
                Err(invalid_argument!("payment status must be specified"))
            }
            None => Err(invalid_argument!("unknown payment status: {}", proto)),
        }
    }
}

impl ProtoFrom<DonationRow> for Donation {
    fn proto_from(row: DonationRow) -> Result<Self, Status> {
        let payment_status: crowdfund::PaymentStatus = row.payment_status.into_proto()?;
        Ok(Donation {
            donation_id: row.donation_id.into_proto()?,
            create_time: Some(row.create_time.into_proto()?),
            campaign_id: row.campaign_id.into_proto()?,
            donor_name: row.donor_name,
            donor_email: row.donor_email,
            donor_phone: row.donor_phone,
            amount: Some(row.amount.into_proto()?),
            message: row.message,
            payment_status: payment_status.into(),
            payment_proof_url: row.payment_proof_url,
            confirm_time: row.confirm_time.map(IntoProto::into_proto).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn payment_status_from_wire_value() {
        assert_eq!(
            PaymentStatus::from_proto(crowdfund::PaymentStatus::Confirmed as i32).unwrap(),
            PaymentStatus::Confirmed
        );
        assert!(PaymentStatus::from_proto(crowdfund::PaymentStatus::Unspecified as i32).is_err());
        assert!(PaymentStatus::from_proto(42).is_err());
    }

    #[test]
    fn donation_from_row() {
        let confirm_time = Utc::now();
        let row = DonationRow {
            donation_id: Uuid::new_v4(),
            create_time: confirm_time,
            campaign_id: Uuid::new_v4(),
            donor_name: "Ana".to_string(),
            donor_email: Some("ana@example.org".to_string()),
            donor_phone: None,
            amount: Decimal::new(1250, 2),
            message: None,
            payment_status: PaymentStatus::Confirmed,
            payment_proof_url: None,
            confirm_time: Some(confirm_time),
        };
        let donation = Donation::proto_from(row.clone()).unwrap();
        assert_eq!(donation.donation_id, row.donation_id.to_string());
        assert_eq!(donation.payment_status(), crowdfund::PaymentStatus::Confirmed);
        assert_eq!(donation.amount.map(|a| (a.units, a.nanos)), Some((12, 500_000_000)));
        assert!(donation.confirm_time.is_some());
    }
}
