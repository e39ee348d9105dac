use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[derive(Clone, Debug, FromRow, PartialEq)]
pub struct DonationRow {
    pub donation_id: Uuid,
    pub create_time: DateTime<Utc>,
    pub campaign_id: Uuid,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: Decimal,
    pub message: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_proof_url: Option<String>,
    /// Set exactly when `payment_status` is confirmed.
    pub confirm_time: Option<DateTime<Utc>>,
}

/// A new donation. Donations are always created pending.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDonationRow {
    pub create_time: DateTime<Utc>,
    pub campaign_id: Uuid,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: Decimal,
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DonationChanges {
    pub payment_status: Option<PaymentStatus>,
    pub payment_proof_url: Option<Option<String>>,
}

impl DonationRow {
    /// Overwrites the changed fields. Moving to confirmed stamps
    /// `confirm_time` with `now`, moving anywhere else clears it.
    pub fn apply_update(mut self, changes: DonationChanges, now: DateTime<Utc>) -> Self {
        if let Some(payment_status) = changes.payment_status {
            self.payment_status = payment_status;
            self.confirm_time = match payment_status {
                PaymentStatus::Confirmed => Some(now),
                PaymentStatus::Pending | PaymentStatus::Failed => None,
            };
        }
        if let Some(payment_proof_url) = changes.payment_proof_url {
            self.payment_proof_url = payment_proof_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_row() -> DonationRow {
        DonationRow {
            donation_id: Uuid::new_v4(),
            create_time: Utc::now(),
            campaign_id: Uuid::new_v4(),
            donor_name: "Budi".to_string(),
            donor_email: None,
            donor_phone: None,
            amount: Decimal::new(5000000, 2),
            message: Some("semangat".to_string()),
            payment_status: PaymentStatus::Pending,
            payment_proof_url: None,
            confirm_time: None,
        }
    }

    #[test]
    fn confirming_stamps_confirm_time() {
        let now = Utc::now();
        let row = pending_row().apply_update(
            DonationChanges {
                payment_status: Some(PaymentStatus::Confirmed),
                payment_proof_url: Some(Some("https://example.org/proof.jpg".to_string())),
            },
            now,
        );
        assert_eq!(row.payment_status, PaymentStatus::Confirmed);
        assert_eq!(row.confirm_time, Some(now));
        assert_eq!(
            row.payment_proof_url.as_deref(),
            Some("https://example.org/proof.jpg")
        );
    }

    #[test]
    fn reconfirming_restamps_confirm_time() {
        let first = Utc::now();
        let second = first + chrono::Duration::minutes(1);
        let confirmed = DonationChanges {
            payment_status: Some(PaymentStatus::Confirmed),
            ..Default::default()
        };
        let row = pending_row()
            .apply_update(confirmed.clone(), first)
            .apply_update(confirmed, second);
        assert_eq!(row.confirm_time, Some(second));
    }

    #[test]
    fn leaving_confirmed_clears_confirm_time() {
        let now = Utc::now();
        let confirmed = pending_row().apply_update(
            DonationChanges {
                payment_status: Some(PaymentStatus::Confirmed),
                ..Default::default()
            },
            now,
        );
        for status in [PaymentStatus::Pending, PaymentStatus::Failed] {
            let row = confirmed.clone().apply_update(
                DonationChanges {
                    payment_status: Some(status),
                    ..Default::default()
                },
                now,
            );
            assert_eq!(row.payment_status, status);
            assert_eq!(row.confirm_time, None);
        }
    }

    #[test]
    fn changing_only_proof_keeps_status() {
        let row = pending_row().apply_update(
            DonationChanges {
                payment_status: None,
                payment_proof_url: Some(Some("https://example.org/p.png".to_string())),
            },
            Utc::now(),
        );
        assert_eq!(row.payment_status, PaymentStatus::Pending);
        assert_eq!(row.confirm_time, None);
    }
}
