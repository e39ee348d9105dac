use crate::protobuf::from::{FromProto, ProtoFrom};
use crowdfund_api::crowdfund::Amount;
use crowdfund_status::{internal, invalid_argument};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use tonic::Status;

const NANOS_PER_UNIT: i32 = 1_000_000_000;

/// Decimal places amounts are stored with.
pub const AMOUNT_SCALE: u32 = 2;

/// Amount -> Decimal
///
/// `nanos` must be within (-1e9, 1e9) and must not carry the opposite sign
/// of `units`. For example -1.75 is `units` = -1 and `nanos` = -750,000,000.
impl FromProto<Amount> for Decimal {
    fn from_proto(proto: Amount) -> Result<Self, Status> {
        if proto.nanos <= -NANOS_PER_UNIT || proto.nanos >= NANOS_PER_UNIT {
            return Err(invalid_argument!(
                "nanos must be between -999,999,999 and 999,999,999, got {}",
                proto.nanos
            ));
        }
        if (proto.units > 0 && proto.nanos < 0) || (proto.units < 0 && proto.nanos > 0) {
            return Err(invalid_argument!(
                "units ({}) and nanos ({}) have opposite signs",
                proto.units,
                proto.nanos
            ));
        }
        Ok(Decimal::from(proto.units) + Decimal::new(proto.nanos.into(), 9))
    }
}

/// Decimal -> Amount
impl ProtoFrom<Decimal> for Amount {
    fn proto_from(value: Decimal) -> Result<Self, Status> {
        let whole = value.trunc();
        let units = whole
            .to_i64()
            .ok_or_else(|| internal!("amount {} does not fit in units", value))?;
        let nanos = ((value - whole) * Decimal::from(NANOS_PER_UNIT))
            .round()
            .to_i32()
            .ok_or_else(|| internal!("amount {} does not fit in nanos", value))?;
        Ok(Amount { units, nanos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdfund_status::Code;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn decimal_from_amount() {
        let value = Decimal::from_proto(Amount {
            units: 1,
            nanos: 750_000_000,
        })
        .unwrap();
        assert_eq!(value, dec("1.75"));

        let value = Decimal::from_proto(Amount {
            units: 0,
            nanos: -500_000_000,
        })
        .unwrap();
        assert_eq!(value, dec("-0.5"));
    }

    #[test]
    fn amount_from_decimal() {
        let amount = Amount::proto_from(dec("-1.75")).unwrap();
        assert_eq!(amount.units, -1);
        assert_eq!(amount.nanos, -750_000_000);

        let amount = Amount::proto_from(dec("250000.00")).unwrap();
        assert_eq!(amount.units, 250_000);
        assert_eq!(amount.nanos, 0);
    }

    #[test]
    fn rejects_mixed_signs() {
        let status = Decimal::from_proto(Amount {
            units: 5,
            nanos: -1,
        })
        .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[test]
    fn rejects_nanos_out_of_range() {
        for nanos in [NANOS_PER_UNIT, -NANOS_PER_UNIT, i32::MAX, i32::MIN] {
            let status = Decimal::from_proto(Amount { units: 0, nanos }).unwrap_err();
            assert_eq!(status.code(), Code::InvalidArgument);
        }
    }
}
