use crate::validate;
use tonic::Status;

pub trait ProtoFrom<T>
where
    Self: Sized,
{
    fn proto_from(value: T) -> Result<Self, Status>;
}

pub trait FromProto<P>
where
    Self: Sized,
{
    fn from_proto(proto: P) -> Result<Self, Status>;

    /// Same as `from_proto`, blaming `field_name` when the proto is invalid.
    fn from_proto_field(proto: P, field_name: &str) -> Result<Self, Status> {
        Self::from_proto(proto).map_err(|status| validate::field_error(field_name, status))
    }
}
